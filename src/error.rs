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

//! Error taxonomy for the fuzzer.
//!
//! Configuration and init errors abort before anything touches the wire;
//! send errors break the current run and surface after teardown. Nothing
//! is retried.

use std::io;

use thiserror::Error;

/// Errors produced by configuration, setup, and the send path.
#[derive(Debug, Error)]
pub enum Error {
    /// Mode integer was neither 0 (IP options) nor 1 (TCP options).
    #[error("invalid fuzzing mode: {0} (expected 0 for IP options, 1 for TCP options)")]
    InvalidMode(usize),

    /// The target port must be non-zero.
    #[error("target port must be non-zero")]
    ZeroPort,

    /// A string that should have been a dotted IPv4 literal wasn't.
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),

    /// The named interface does not exist or carries no IPv4 address.
    #[error("no IPv4 address on interface {0:?}")]
    InterfaceAddress(String),

    /// Enumerating interface addresses failed at the OS level.
    #[error("interface address query failed: {0}")]
    Ifaddrs(#[from] nix::Error),

    /// The XorShift64 state may never be seeded with zero.
    #[error("PRNG seed must be non-zero")]
    ZeroSeed,

    /// Raw socket protocol outside the supported set (TCP, RAW, UDP, ICMP).
    #[error("unsupported raw socket protocol number: {0}")]
    InvalidProtocol(i32),

    /// Opening the raw socket or setting IP_HDRINCL failed.
    #[error("failed to open raw socket: {0}")]
    SocketOpen(#[source] io::Error),

    /// sendto failed; the run is aborted, the process is not.
    #[error("failed to send packet: {0}")]
    SendFailed(#[source] io::Error),

    /// The caller-provided packet buffer cannot hold the assembled packet.
    #[error("packet buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Option blobs must be padded to a 32-bit boundary before assembly.
    #[error("options length {0} is not a multiple of 4")]
    UnalignedOptions(usize),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
