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

//! Catalogs of legitimate TCP and IPv4 options.
//!
//! Each entry carries the 8-bit kind/type identifier plus the length rule
//! the RFCs mandate for it. The valid sweep walks these tables in order;
//! the randomized phases sample kinds from them.
//!
//! sources: RFC 793/9293 and IANA "TCP Option Kind Numbers",
//! RFC 791/1108/2113/4782 and IANA "IP Option Numbers"

use phf::phf_map;

/// Upper bound for an option area, per the 4-bit IHL / data-offset fields.
pub const OPTIONS_LEN_MAX: u8 = 40;

/// One catalog entry: an option identifier and its length rule.
///
/// `max_len == 0` means the option has the fixed length `min_len`;
/// otherwise the legal lengths span `min_len..=max_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// The option's kind (TCP) or type (IPv4) byte
    pub kind: u8,
    /// Minimum legal length, or the fixed length when `max_len == 0`
    pub min_len: u8,
    /// Maximum legal length; 0 marks a fixed-length option
    pub max_len: u8,
}

impl OptionSpec {
    const fn fixed(kind: u8, len: u8) -> Self {
        Self {
            kind,
            min_len: len,
            max_len: 0,
        }
    }

    const fn variable(kind: u8, min_len: u8, max_len: u8) -> Self {
        Self {
            kind,
            min_len,
            max_len,
        }
    }

    /// Whether this option has exactly one legal length.
    pub fn is_fixed(&self) -> bool {
        self.max_len == 0
    }
}

/// Legitimate TCP options, in sweep order.
pub const TCP_OPTIONS: [OptionSpec; 14] = [
    OptionSpec::fixed(0, 1),            // EOL
    OptionSpec::fixed(1, 1),            // NOP
    OptionSpec::fixed(2, 4),            // MSS
    OptionSpec::fixed(3, 3),            // window scale
    OptionSpec::fixed(4, 2),            // SACK permitted
    OptionSpec::variable(5, 10, 40),    // SACK, 1-4 blocks
    OptionSpec::fixed(8, 10),           // timestamps
    OptionSpec::fixed(18, 3),           // trailer checksum
    OptionSpec::fixed(27, 8),           // quick-start response
    OptionSpec::fixed(28, 4),           // user timeout
    OptionSpec::fixed(29, 4),           // TCP-AO
    OptionSpec::fixed(30, 4),           // multipath TCP
    OptionSpec::variable(34, 4, 16),    // TCP fast open cookie
    OptionSpec::variable(69, 1, 40),    // encryption negotiation
];

/// Legitimate IPv4 options, in sweep order.
pub const IP_OPTIONS: [OptionSpec; 13] = [
    OptionSpec::fixed(0, 1),            // EOOL
    OptionSpec::fixed(1, 1),            // NOP
    OptionSpec::fixed(130, 11),         // SEC (RFC 791)
    OptionSpec::variable(131, 3, 40),   // loose source route
    OptionSpec::variable(68, 4, 40),    // timestamp
    OptionSpec::variable(133, 3, 40),   // extended security
    OptionSpec::variable(134, 6, 40),   // CIPSO
    OptionSpec::variable(7, 3, 40),     // record route
    OptionSpec::variable(137, 3, 40),   // strict source route
    OptionSpec::fixed(11, 4),           // MTU probe
    OptionSpec::fixed(12, 4),           // MTU reply
    OptionSpec::fixed(148, 4),          // router alert
    OptionSpec::fixed(25, 8),           // quick-start
];

static TCP_OPTION_NAMES: phf::Map<u8, &'static str> = phf_map! {
    0_u8 => "EOL",
    1_u8 => "NOP",
    2_u8 => "MSS",
    3_u8 => "WScale",
    4_u8 => "SACK-Permitted",
    5_u8 => "SACK",
    8_u8 => "Timestamps",
    18_u8 => "Trailer-Checksum",
    27_u8 => "Quick-Start",
    28_u8 => "User-Timeout",
    29_u8 => "TCP-AO",
    30_u8 => "Multipath",
    34_u8 => "Fast-Open",
    69_u8 => "Enc-Negotiation",
};

static IP_OPTION_NAMES: phf::Map<u8, &'static str> = phf_map! {
    0_u8 => "EOOL",
    1_u8 => "NOP",
    130_u8 => "SEC",
    131_u8 => "LSR",
    68_u8 => "TS",
    133_u8 => "ESEC",
    134_u8 => "CIPSO",
    7_u8 => "RR",
    137_u8 => "SSR",
    11_u8 => "MTUP",
    12_u8 => "MTUR",
    148_u8 => "RTRALT",
    25_u8 => "QS",
};

/// Human-readable name of a TCP option kind, for trace output.
pub fn tcp_option_name(kind: u8) -> &'static str {
    TCP_OPTION_NAMES.get(&kind).copied().unwrap_or("unknown")
}

/// Human-readable name of an IPv4 option type, for trace output.
pub fn ip_option_name(kind: u8) -> &'static str {
    IP_OPTION_NAMES.get(&kind).copied().unwrap_or("unknown")
}
