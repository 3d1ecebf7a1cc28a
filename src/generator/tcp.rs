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

//! TCP option emission.
//!
//! Blob layout: `bytes[0]` is the kind, `bytes[1]` the length byte, the
//! payload fill starts at `bytes[2]`, and NOP padding is written from
//! offset `length` up to the next 32-bit boundary. The length byte is a
//! fuzzed field like any other, so `total_len` (what actually reaches the
//! wire) is tracked separately and never derived from it.

use crate::catalog::{tcp_option_name, OPTIONS_LEN_MAX, TCP_OPTIONS};
use crate::rng::XorShift64;

use super::phase::{LengthMutation, Mutation, TcpPhase};
use super::{fill_payload, sample_length, write_padding, Generator, OptionBlob, PAD_BYTE_TCP};

/// SACK blocks are 10 bytes: two 32-bit sequence edges plus kind/length.
const SACK_BLOCK_LEN: u8 = 10;

impl Generator {
    pub(super) fn emit_tcp(&self, phase: TcpPhase, prng: &mut XorShift64, blob: &mut OptionBlob) {
        match phase.mutation() {
            Some(mutation) => emit_tcp_mutated(mutation, prng, blob),
            None if phase == TcpPhase::Valid => self.emit_tcp_valid(prng, blob),
            None => unreachable!("emission requested on an exhausted schedule"),
        }
    }

    /// Emit the catalog entry at the current cycle with a legal length.
    fn emit_tcp_valid(&self, prng: &mut XorShift64, blob: &mut OptionBlob) {
        let spec = &TCP_OPTIONS[self.cycle as usize];
        blob.bytes[0] = spec.kind;

        let len = if spec.is_fixed() {
            spec.min_len
        } else {
            match spec.kind {
                // SACK: one to four whole blocks
                5 => SACK_BLOCK_LEN * ((prng.next_u64() % 4) as u8 + 1),
                // fast open cookie / encryption negotiation: any legal length
                34 | 69 => sample_length(prng, spec),
                _ => {
                    // only reachable if the catalog gains a variable-length
                    // entry without a fill rule
                    tracing::error!(
                        kind = spec.kind,
                        "no length rule for variable-length TCP option, emitting empty blob"
                    );
                    0
                }
            }
        };
        blob.bytes[1] = len;

        fill_payload(prng, &mut blob.bytes, len);
        blob.total_len = len + write_padding(&mut blob.bytes, len, PAD_BYTE_TCP);

        tracing::debug!(
            kind = spec.kind,
            name = tcp_option_name(spec.kind),
            len,
            total_len = blob.total_len,
            "valid TCP option"
        );
    }
}

/// Emit one randomized TCP option blob for the given mutation class.
fn emit_tcp_mutated(mutation: Mutation, prng: &mut XorShift64, blob: &mut OptionBlob) {
    blob.bytes[0] = if mutation.randomize_kind {
        (prng.next_u64() & 0xff) as u8
    } else {
        let idx = (prng.next_u64() % TCP_OPTIONS.len() as u64) as usize;
        TCP_OPTIONS[idx].kind
    };

    let len = (prng.next_u64() % OPTIONS_LEN_MAX as u64) as u8 + 1;
    blob.bytes[1] = len;

    fill_payload(prng, &mut blob.bytes, len);
    blob.total_len = len + write_padding(&mut blob.bytes, len, PAD_BYTE_TCP);

    // the length byte is overridden after padding accounting so the wire
    // length stays aligned while the field itself lies
    match mutation.length {
        LengthMutation::Valid => {}
        LengthMutation::Zero => blob.bytes[1] = 0,
        LengthMutation::Invalid => {
            blob.bytes[1] = (prng.next_u64() % OPTIONS_LEN_MAX as u64) as u8 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Step;
    use crate::mode::FuzzMode;

    fn valid_sweep_blob(index: usize) -> OptionBlob {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut generator = Generator::new(FuzzMode::TcpOptions);
        let mut blob = OptionBlob::new();
        for _ in 0..=index {
            assert_eq!(generator.next_options(&mut prng, &mut blob), Step::Continue);
        }
        blob
    }

    #[test]
    fn test_mss_valid_emission() {
        // catalog index 2: MSS, kind 2, fixed length 4
        let blob = valid_sweep_blob(2);
        assert_eq!(blob.bytes[0], 0x02);
        assert_eq!(blob.bytes[1], 0x04);
        assert_eq!(blob.total_len, 4);
    }

    #[test]
    fn test_window_scale_valid_emission() {
        // catalog index 3: WScale, kind 3, fixed length 3, one NOP pad byte
        let blob = valid_sweep_blob(3);
        assert_eq!(blob.bytes[0], 0x03);
        assert_eq!(blob.bytes[1], 0x03);
        assert_eq!(blob.total_len, 4);
        assert_eq!(blob.bytes[3], 0x01);
    }

    #[test]
    fn test_sack_length_is_whole_blocks() {
        // catalog index 5: SACK
        let blob = valid_sweep_blob(5);
        assert_eq!(blob.bytes[0], 0x05);
        assert_eq!(blob.bytes[1] % SACK_BLOCK_LEN, 0);
        assert!((1..=4).contains(&(blob.bytes[1] / SACK_BLOCK_LEN)));
    }

    #[test]
    fn test_fast_open_length_in_range() {
        // catalog index 12: fast open cookie, lengths 4..=16
        let blob = valid_sweep_blob(12);
        assert_eq!(blob.bytes[0], 34);
        assert!((4..=16).contains(&blob.bytes[1]));
    }

    #[test]
    fn test_mutated_kind_comes_from_catalog_when_not_randomized() {
        let mut prng = XorShift64::new(99).unwrap();
        let mut blob = OptionBlob::new();
        let mutation = Mutation {
            randomize_kind: false,
            length: LengthMutation::Valid,
        };
        for _ in 0..64 {
            emit_tcp_mutated(mutation, &mut prng, &mut blob);
            assert!(TCP_OPTIONS.iter().any(|s| s.kind == blob.bytes[0]));
            assert!((1..=OPTIONS_LEN_MAX).contains(&blob.bytes[1]));
        }
    }

    #[test]
    fn test_mutated_blob_alignment_with_lying_length() {
        let mut prng = XorShift64::new(7).unwrap();
        let mut blob = OptionBlob::new();
        let mutation = Mutation {
            randomize_kind: true,
            length: LengthMutation::Invalid,
        };
        for _ in 0..64 {
            emit_tcp_mutated(mutation, &mut prng, &mut blob);
            assert_eq!(blob.total_len % 4, 0);
            assert!(blob.total_len >= 4);
        }
    }
}
