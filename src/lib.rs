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

//! A generational network fuzzer for IPv4 and TCP options fields.
//!
//! `optfuzz` emits raw IPv4 packets against a chosen target: TCP SYN
//! segments carrying fuzzed TCP options, or IPv4 datagrams carrying
//! fuzzed IPv4 options. A mutation state machine sweeps the legitimate
//! option catalogs once, then walks a fixed schedule of invalid-encoding
//! classes (random kinds, lying length bytes, zero lengths), all driven
//! by a single XorShift64 PRNG so a run is reproducible from its seed.
//!
//! # Examples
//!
//! ```no_run
//! use optfuzz::{FuzzConfig, FuzzMode, Fuzzer};
//!
//! // fuzz TCP options against 10.0.0.1:8080, sourcing from eth0
//! let config = FuzzConfig::new(FuzzMode::TcpOptions, "eth0", "10.0.0.1", 8080).unwrap();
//! let sent = Fuzzer::new(config).with_seed(0xdeadbeef).run().unwrap();
//! println!("{sent} packets sent");
//! ```

mod catalog;
mod cli;
mod config;
mod error;
mod fuzzer;
mod generator;
mod mode;
pub mod netif;
pub mod packet;
mod rng;
mod sender;

pub use catalog::{ip_option_name, tcp_option_name, OptionSpec, IP_OPTIONS, TCP_OPTIONS};
pub use cli::Cli;
pub use config::FuzzConfig;
pub use error::{Error, Result};
pub use fuzzer::Fuzzer;
pub use generator::{
    Generator, IpPhase, LengthMutation, Mutation, OptionBlob, Phase, Step, TcpPhase,
    INVALID_COUNT_DEFAULT, OPTIONS_BUF_LEN,
};
pub use mode::FuzzMode;
pub use rng::XorShift64;
pub use sender::{RawSender, SendProtocol};
