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

//! IPv4 option emission.
//!
//! Same blob layout as the TCP side, with two differences: the option
//! area pads with EOOL (0x00) instead of NOP, and the catalog sweep has
//! to compensate for EOOL/NOP themselves, which are single-byte options
//! whose "length byte" slot is spent on the wire.

use crate::catalog::{ip_option_name, IP_OPTIONS, OPTIONS_LEN_MAX};
use crate::rng::XorShift64;

use super::phase::{IpPhase, LengthMutation, Mutation};
use super::{fill_payload, sample_length, write_padding, Generator, OptionBlob, PAD_BYTE_IP};

impl Generator {
    pub(super) fn emit_ip(&self, phase: IpPhase, prng: &mut XorShift64, blob: &mut OptionBlob) {
        match phase.mutation() {
            Some(mutation) => emit_ip_mutated(mutation, prng, blob),
            None if phase == IpPhase::Valid => self.emit_ip_valid(prng, blob),
            None => unreachable!("emission requested on an exhausted schedule"),
        }
    }

    /// Emit the catalog entry at the current cycle with a legal length.
    fn emit_ip_valid(&self, prng: &mut XorShift64, blob: &mut OptionBlob) {
        let spec = &IP_OPTIONS[self.cycle as usize];
        blob.bytes[0] = spec.kind;

        let len = if spec.is_fixed() {
            spec.min_len
        } else {
            sample_length(prng, spec)
        };
        blob.bytes[1] = len;

        fill_payload(prng, &mut blob.bytes, len);

        // EOOL and NOP are a bare type byte; the length slot the generic
        // layout reserves still occupies the wire, so count it
        let wire_len = if spec.min_len == 1 { len + 1 } else { len };
        blob.total_len = wire_len + write_padding(&mut blob.bytes, wire_len, PAD_BYTE_IP);

        tracing::debug!(
            option_type = spec.kind,
            name = ip_option_name(spec.kind),
            len,
            total_len = blob.total_len,
            "valid IP option"
        );
    }
}

/// Emit one randomized IPv4 option blob for the given mutation class.
fn emit_ip_mutated(mutation: Mutation, prng: &mut XorShift64, blob: &mut OptionBlob) {
    blob.bytes[0] = if mutation.randomize_kind {
        (prng.next_u64() & 0xff) as u8
    } else {
        let idx = (prng.next_u64() % IP_OPTIONS.len() as u64) as usize;
        IP_OPTIONS[idx].kind
    };

    let len = (prng.next_u64() % OPTIONS_LEN_MAX as u64) as u8 + 1;
    blob.bytes[1] = len;

    fill_payload(prng, &mut blob.bytes, len);
    blob.total_len = len + write_padding(&mut blob.bytes, len, PAD_BYTE_IP);

    match mutation.length {
        LengthMutation::Valid => {}
        LengthMutation::Zero => blob.bytes[1] = 0,
        LengthMutation::Invalid => {
            blob.bytes[1] = (prng.next_u64() % OPTIONS_LEN_MAX as u64) as u8 + 1;
        }
    }
}
