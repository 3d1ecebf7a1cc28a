// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Cisco Systems, Inc. and its affiliates
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Source-address lookup for the chosen NIC.

use std::net::Ipv4Addr;

use nix::ifaddrs::getifaddrs;

use crate::error::{Error, Result};

/// Return the first IPv4 address bound to the named interface.
///
/// An absent interface and an interface without an IPv4 address are the
/// same failure from the fuzzer's point of view.
pub fn interface_ipv4(name: &str) -> Result<Ipv4Addr> {
    for ifaddr in getifaddrs().map_err(Error::Ifaddrs)? {
        if ifaddr.interface_name != name {
            continue;
        }
        if let Some(sin) = ifaddr.address.as_ref().and_then(|a| a.as_sockaddr_in()) {
            return Ok(sin.ip());
        }
    }
    Err(Error::InterfaceAddress(name.to_string()))
}
