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
//
// SPDX-License-Identifier: Apache-2.0

//! The raw send path.
//!
//! One IPv4 raw socket with `IP_HDRINCL` set, so the kernel forwards our
//! handcrafted headers untouched. Opening it needs CAP_NET_RAW (or root)
//! on Linux. The descriptor closes when the sender drops.

use std::net::{Ipv4Addr, SocketAddrV4};

use nix::libc;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::{Error, Result};

/// Transport protocol numbers a raw socket may be opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendProtocol {
    Tcp,
    Raw,
    Udp,
    Icmp,
}

impl SendProtocol {
    fn to_protocol(self) -> Protocol {
        match self {
            SendProtocol::Tcp => Protocol::TCP,
            SendProtocol::Raw => Protocol::from(libc::IPPROTO_RAW),
            SendProtocol::Udp => Protocol::UDP,
            SendProtocol::Icmp => Protocol::ICMPV4,
        }
    }
}

impl TryFrom<i32> for SendProtocol {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            libc::IPPROTO_TCP => Ok(SendProtocol::Tcp),
            libc::IPPROTO_RAW => Ok(SendProtocol::Raw),
            libc::IPPROTO_UDP => Ok(SendProtocol::Udp),
            libc::IPPROTO_ICMP => Ok(SendProtocol::Icmp),
            other => Err(Error::InvalidProtocol(other)),
        }
    }
}

/// An open raw socket that owns its descriptor for the run.
#[derive(Debug)]
pub struct RawSender {
    socket: Socket,
}

impl RawSender {
    /// Open an IPv4 raw socket for `protocol` and enable `IP_HDRINCL`.
    pub fn open(protocol: SendProtocol) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(protocol.to_protocol()))
            .map_err(Error::SocketOpen)?;
        socket
            .set_header_included_v4(true)
            .map_err(Error::SocketOpen)?;
        Ok(Self { socket })
    }

    /// Send one assembled packet toward `dst`.
    ///
    /// The port in the address is zero; routing only needs the host, the
    /// real destination port sits inside the packet bytes.
    pub fn send(&self, packet: &[u8], dst: Ipv4Addr) -> Result<usize> {
        let addr = SockAddr::from(SocketAddrV4::new(dst, 0));
        self.socket.send_to(packet, &addr).map_err(|e| {
            tracing::error!(error = %e, %dst, "sendto failed");
            Error::SendFailed(e)
        })
    }
}
