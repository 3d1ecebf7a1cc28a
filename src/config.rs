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

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::mode::FuzzMode;
use crate::netif;

/// A validated fuzzing configuration.
///
/// Construction is the validation step: once a `FuzzConfig` exists the
/// addresses are real IPv4 literals and the port is non-zero. It is
/// immutable for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzConfig {
    /// What to fuzz
    pub mode: FuzzMode,
    /// Source address, resolved from the chosen NIC
    pub src_ip: Ipv4Addr,
    /// Target address
    pub dst_ip: Ipv4Addr,
    /// Target port, non-zero
    pub dst_port: u16,
}

impl FuzzConfig {
    /// Build a configuration from CLI-shaped inputs.
    ///
    /// Resolves `ifname` to its IPv4 address, parses the target literal,
    /// and rejects a zero port.
    pub fn new(mode: FuzzMode, ifname: &str, target_ip: &str, dst_port: u16) -> Result<Self> {
        let src_ip = netif::interface_ipv4(ifname)?;
        let dst_ip = target_ip
            .parse::<Ipv4Addr>()
            .map_err(|_| Error::InvalidAddress(target_ip.to_string()))?;
        Self::from_addrs(mode, src_ip, dst_ip, dst_port)
    }

    /// Build a configuration from already-resolved addresses.
    pub fn from_addrs(
        mode: FuzzMode,
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
        dst_port: u16,
    ) -> Result<Self> {
        if dst_port == 0 {
            return Err(Error::ZeroPort);
        }
        Ok(Self {
            mode,
            src_ip,
            dst_ip,
            dst_port,
        })
    }
}

impl fmt::Display for FuzzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** FUZZING CONFIGURATION")?;
        writeln!(f, "-- Src IP:      {}", self.src_ip)?;
        writeln!(f, "-- Target IP:   {}", self.dst_ip)?;
        writeln!(f, "-- Target Port: {}", self.dst_port)?;
        writeln!(f, "-- Mode:        {}", self.mode)?;
        write!(f, "**")
    }
}
