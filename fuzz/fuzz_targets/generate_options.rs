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

//! Drive the full mutation schedule from arbitrary seeds and check the
//! blob invariants: 32-bit alignment, buffer discipline, and a terminating
//! schedule.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use optfuzz::{FuzzMode, Generator, OptionBlob, Step, XorShift64, OPTIONS_BUF_LEN};

#[derive(Arbitrary, Debug)]
struct Input {
    seed: u64,
    tcp_mode: bool,
    invalid_count: u8,
}

fuzz_target!(|input: Input| {
    let mut prng = match XorShift64::new(input.seed) {
        Ok(prng) => prng,
        Err(_) => return,
    };
    let mode = if input.tcp_mode {
        FuzzMode::TcpOptions
    } else {
        FuzzMode::IpOptions
    };

    let mut generator = Generator::new(mode).with_invalid_count(u64::from(input.invalid_count));
    let mut blob = OptionBlob::new();
    let mut emitted = 0u64;

    while generator.next_options(&mut prng, &mut blob) == Step::Continue {
        assert_eq!(blob.total_len % 4, 0);
        assert!((blob.total_len as usize) <= OPTIONS_BUF_LEN);
        emitted += 1;
    }

    let catalog = if input.tcp_mode { 14 } else { 13 };
    assert_eq!(emitted, catalog + 6 * u64::from(input.invalid_count));
    assert_eq!(generator.next_options(&mut prng, &mut blob), Step::Done);
});
