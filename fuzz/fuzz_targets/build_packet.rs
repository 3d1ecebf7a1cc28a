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

//! Feed arbitrary option blobs and addresses through both packet
//! builders: they must either assemble a consistent packet or reject the
//! input with a typed error, never panic.

#![no_main]

use std::net::Ipv4Addr;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use optfuzz::{packet, XorShift64};

#[derive(Arbitrary, Debug)]
struct Input {
    opts: Vec<u8>,
    src: [u8; 4],
    dst: [u8; 4],
    port: u16,
    seed: u64,
}

fuzz_target!(|input: Input| {
    let mut prng = match XorShift64::new(input.seed) {
        Ok(prng) => prng,
        Err(_) => return,
    };
    let src = Ipv4Addr::from(input.src);
    let dst = Ipv4Addr::from(input.dst);
    // a 4-bit IHL / data-offset field caps the option area at 40 bytes;
    // anything longer violates the builders' caller contract
    let opts = &input.opts[..input.opts.len().min(40)];

    let mut buffer = [0u8; packet::SEND_BUF_LEN];
    if let Ok(len) = packet::build_tcp(&mut buffer, opts, src, dst, input.port, &mut prng) {
        assert_eq!(len, 40 + opts.len());
        assert_eq!(u16::from_be_bytes([buffer[2], buffer[3]]) as usize, len);
    }
    if let Ok(len) = packet::build_ip(&mut buffer, opts, src, dst, input.port, &mut prng) {
        assert_eq!(len, 40 + opts.len());
        assert_eq!(buffer[0] & 0x0f, ((20 + opts.len()) / 4) as u8);
    }
});
