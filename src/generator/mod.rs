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

//! Option-blob generator module.
//!
//! This module contains the mutation state machine that produces one
//! option blob per call, organized into focused submodules:
//!
//! - `phase`: the ordered mutation schedule and its `advance` function
//! - `tcp`: TCP option emission (catalog sweep + randomized classes)
//! - `ip`: IPv4 option emission (catalog sweep + randomized classes)
//!
//! The generator owns no entropy of its own; the caller threads one
//! [`XorShift64`] through every call so the whole stimulus stream stays a
//! pure function of the seed.

mod ip;
mod phase;
mod tcp;

pub use phase::{IpPhase, LengthMutation, Mutation, Phase, TcpPhase};

// ---8<--- module declarations above; Generator definition and imports below ---8<---
use crate::catalog::OptionSpec;
use crate::mode::FuzzMode;
use crate::rng::XorShift64;

/// Default per-phase quota for the randomized mutation classes.
pub const INVALID_COUNT_DEFAULT: u64 = 10_000;

/// Capacity of an option blob: kind + length bytes, a 40-byte option
/// area, and slack for the trailing alignment padding.
pub const OPTIONS_BUF_LEN: usize = 44;

/// TCP option areas are padded with NOP bytes.
const PAD_BYTE_TCP: u8 = 0x01;

/// IPv4 option areas are padded with EOOL bytes.
const PAD_BYTE_IP: u8 = 0x00;

/// A caller-owned buffer the generator writes one option blob into.
///
/// `total_len` is the number of wire bytes (payload plus padding) and is
/// always a multiple of four, so the blob drops straight into a header's
/// option area.
#[derive(Debug, Clone)]
pub struct OptionBlob {
    /// Raw blob bytes; only `..total_len` reach the wire
    pub bytes: [u8; OPTIONS_BUF_LEN],
    /// Wire length of the blob, padding included
    pub total_len: u8,
}

impl OptionBlob {
    pub fn new() -> Self {
        Self {
            bytes: [0; OPTIONS_BUF_LEN],
            total_len: 0,
        }
    }

    /// The bytes that go on the wire.
    pub fn as_wire(&self) -> &[u8] {
        &self.bytes[..self.total_len as usize]
    }
}

impl Default for OptionBlob {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one generator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A blob was written; keep pumping
    Continue,
    /// The schedule is exhausted; no blob was written
    Done,
}

/// The mutation state machine.
///
/// Walks the mode's phase schedule: first a sweep emitting one packet per
/// catalog entry, then the randomized mutation classes at
/// [`INVALID_COUNT_DEFAULT`] packets each (override with
/// [`with_invalid_count`]). Once the schedule is exhausted every further
/// call returns [`Step::Done`].
///
/// # Examples
///
/// ```no_run
/// use optfuzz::{FuzzMode, Generator, OptionBlob, Step, XorShift64};
///
/// let mut prng = XorShift64::new(0xdeadbeef).unwrap();
/// let mut generator = Generator::new(FuzzMode::TcpOptions);
/// let mut blob = OptionBlob::new();
/// while generator.next_options(&mut prng, &mut blob) == Step::Continue {
///     assert_eq!(blob.total_len % 4, 0);
/// }
/// ```
///
/// [`with_invalid_count`]: Generator::with_invalid_count
#[derive(Debug, Clone)]
pub struct Generator {
    mode: FuzzMode,
    phase: Phase,
    cycle: u64,
    invalid_count: u64,
}

impl Generator {
    /// Create a generator positioned at the first phase of `mode`.
    pub fn new(mode: FuzzMode) -> Self {
        Self {
            mode,
            phase: Phase::first(mode),
            cycle: 0,
            invalid_count: INVALID_COUNT_DEFAULT,
        }
    }

    /// Override the per-phase quota of the randomized mutation classes.
    pub fn with_invalid_count(mut self, count: u64) -> Self {
        self.invalid_count = count;
        self
    }

    /// The mode this generator was initialized for.
    pub fn mode(&self) -> FuzzMode {
        self.mode
    }

    /// The phase the next emission will come from.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Write the next option blob into `blob`.
    ///
    /// Returns [`Step::Done`] without touching `blob` once the schedule is
    /// exhausted, and on every call after that.
    pub fn next_options(&mut self, prng: &mut XorShift64, blob: &mut OptionBlob) -> Step {
        let phase = self.phase;
        match phase {
            _ if phase.is_done() => return Step::Done,
            Phase::Tcp(p) => self.emit_tcp(p, prng, blob),
            Phase::Ip(p) => self.emit_ip(p, prng, blob),
        }
        (self.phase, self.cycle) = phase.advance(self.cycle, self.invalid_count);
        Step::Continue
    }
}

/// Fill `len` payload bytes behind the kind and length bytes, one PRNG
/// draw per byte.
fn fill_payload(prng: &mut XorShift64, bytes: &mut [u8; OPTIONS_BUF_LEN], len: u8) {
    for i in 0..len as usize {
        bytes[2 + i] = (prng.next_u64() & 0xff) as u8;
    }
}

/// Pad the blob out to a 32-bit boundary starting at `offset`.
///
/// Returns the number of pad bytes written.
fn write_padding(bytes: &mut [u8; OPTIONS_BUF_LEN], offset: u8, pad_byte: u8) -> u8 {
    let pad = (4 - (offset % 4)) % 4;
    for i in 0..pad as usize {
        bytes[offset as usize + i] = pad_byte;
    }
    pad
}

/// Sample a legal length for a variable-length catalog entry.
fn sample_length(prng: &mut XorShift64, spec: &OptionSpec) -> u8 {
    let span = (spec.max_len - spec.min_len + 1) as u64;
    (prng.next_u64() % span) as u8 + spec.min_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{IP_OPTIONS, TCP_OPTIONS};

    fn drain(mode: FuzzMode, invalid_count: u64) -> Vec<OptionBlob> {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut generator = Generator::new(mode).with_invalid_count(invalid_count);
        let mut blob = OptionBlob::new();
        let mut blobs = Vec::new();
        while generator.next_options(&mut prng, &mut blob) == Step::Continue {
            blobs.push(blob.clone());
        }
        blobs
    }

    #[test]
    fn test_tcp_schedule_emission_count() {
        let blobs = drain(FuzzMode::TcpOptions, 5);
        assert_eq!(blobs.len(), TCP_OPTIONS.len() + 6 * 5);
    }

    #[test]
    fn test_ip_schedule_emission_count() {
        let blobs = drain(FuzzMode::IpOptions, 5);
        assert_eq!(blobs.len(), IP_OPTIONS.len() + 6 * 5);
    }

    #[test]
    fn test_done_is_sticky() {
        let mut prng = XorShift64::new(1).unwrap();
        let mut generator = Generator::new(FuzzMode::TcpOptions).with_invalid_count(1);
        let mut blob = OptionBlob::new();
        while generator.next_options(&mut prng, &mut blob) == Step::Continue {}
        for _ in 0..3 {
            assert_eq!(generator.next_options(&mut prng, &mut blob), Step::Done);
        }
    }

    #[test]
    fn test_every_blob_is_32bit_aligned() {
        for mode in [FuzzMode::TcpOptions, FuzzMode::IpOptions] {
            for blob in drain(mode, 50) {
                assert_eq!(blob.total_len % 4, 0, "mode {mode:?}");
                assert!((blob.total_len as usize) <= OPTIONS_BUF_LEN);
            }
        }
    }

    #[test]
    fn test_valid_sweep_covers_catalog_in_order() {
        let blobs = drain(FuzzMode::TcpOptions, 1);
        for (i, spec) in TCP_OPTIONS.iter().enumerate() {
            assert_eq!(blobs[i].bytes[0], spec.kind);
        }
        let blobs = drain(FuzzMode::IpOptions, 1);
        for (i, spec) in IP_OPTIONS.iter().enumerate() {
            assert_eq!(blobs[i].bytes[0], spec.kind);
        }
    }

    #[test]
    fn test_invalid_phases_respect_quota() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut generator = Generator::new(FuzzMode::TcpOptions).with_invalid_count(7);
        let mut blob = OptionBlob::new();

        // drain the valid sweep
        for _ in 0..TCP_OPTIONS.len() {
            assert_eq!(generator.next_options(&mut prng, &mut blob), Step::Continue);
        }
        let entered = generator.phase();
        assert_eq!(entered, Phase::Tcp(TcpPhase::ValidKindValidLength));

        // the phase flips exactly at its quota
        for _ in 0..6 {
            generator.next_options(&mut prng, &mut blob);
            assert_eq!(generator.phase(), entered);
        }
        generator.next_options(&mut prng, &mut blob);
        assert_eq!(
            generator.phase(),
            Phase::Tcp(TcpPhase::InvalidKindValidLength)
        );
    }

    #[test]
    fn test_zero_length_phase_forces_length_byte() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut generator = Generator::new(FuzzMode::TcpOptions).with_invalid_count(4);
        let mut blob = OptionBlob::new();
        let mut saw_zero_phase = false;
        loop {
            let phase = generator.phase();
            if generator.next_options(&mut prng, &mut blob) == Step::Done {
                break;
            }
            if matches!(
                phase,
                Phase::Tcp(TcpPhase::ValidKindZeroLength | TcpPhase::InvalidKindZeroLength)
            ) {
                saw_zero_phase = true;
                assert_eq!(blob.bytes[1], 0);
                assert!(blob.total_len > 0);
                assert_eq!(blob.total_len % 4, 0);
            }
        }
        assert!(saw_zero_phase);
    }

    #[test]
    fn test_ip_zero_length_phase_forces_length_byte() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut generator = Generator::new(FuzzMode::IpOptions).with_invalid_count(4);
        let mut blob = OptionBlob::new();
        let mut saw_zero_phase = false;
        loop {
            let phase = generator.phase();
            if generator.next_options(&mut prng, &mut blob) == Step::Done {
                break;
            }
            if matches!(
                phase,
                Phase::Ip(IpPhase::InvalidZeroLength | IpPhase::InvalidRandomTypeZeroLength)
            ) {
                saw_zero_phase = true;
                assert_eq!(blob.bytes[1], 0);
                assert!(blob.total_len > 0);
            }
        }
        assert!(saw_zero_phase);
    }
}
