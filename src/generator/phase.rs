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

//! The mutation schedule.
//!
//! A run walks an ordered list of phases. The first phase sweeps the
//! catalog once, one packet per legitimate option; every later phase emits
//! a fixed quota of randomized packets for one mutation class, then the
//! schedule advances. `advance` is total: once the last phase completes
//! the schedule parks in `Done` and stays there.

use crate::catalog::{IP_OPTIONS, TCP_OPTIONS};
use crate::mode::FuzzMode;

/// What happens to the emitted length byte after padding is accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMutation {
    /// Leave the sampled length in place
    Valid,
    /// Force the length byte to zero
    Zero,
    /// Resample the length byte, independent of the true payload length
    Invalid,
}

/// Parameters of one randomized mutation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// Draw the kind/type byte from the PRNG instead of the catalog
    pub randomize_kind: bool,
    /// Length-byte treatment
    pub length: LengthMutation,
}

/// TCP mutation classes, traversed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpPhase {
    Valid,
    ValidKindValidLength,
    InvalidKindValidLength,
    ValidKindInvalidLength,
    InvalidKindInvalidLength,
    ValidKindZeroLength,
    InvalidKindZeroLength,
    Done,
}

impl TcpPhase {
    fn next(self) -> Self {
        use TcpPhase::*;
        match self {
            Valid => ValidKindValidLength,
            ValidKindValidLength => InvalidKindValidLength,
            InvalidKindValidLength => ValidKindInvalidLength,
            ValidKindInvalidLength => InvalidKindInvalidLength,
            InvalidKindInvalidLength => ValidKindZeroLength,
            ValidKindZeroLength => InvalidKindZeroLength,
            InvalidKindZeroLength | Done => Done,
        }
    }

    /// The mutation parameters of this phase; `None` for the catalog sweep
    /// and for `Done`.
    pub fn mutation(self) -> Option<Mutation> {
        use TcpPhase::*;
        let (randomize_kind, length) = match self {
            Valid | Done => return None,
            ValidKindValidLength => (false, LengthMutation::Valid),
            InvalidKindValidLength => (true, LengthMutation::Valid),
            ValidKindInvalidLength => (false, LengthMutation::Invalid),
            InvalidKindInvalidLength => (true, LengthMutation::Invalid),
            ValidKindZeroLength => (false, LengthMutation::Zero),
            InvalidKindZeroLength => (true, LengthMutation::Zero),
        };
        Some(Mutation {
            randomize_kind,
            length,
        })
    }

    fn name(self) -> &'static str {
        use TcpPhase::*;
        match self {
            Valid => "valid options sweep",
            ValidKindValidLength => "valid kind, valid length",
            InvalidKindValidLength => "invalid kind, valid length",
            ValidKindInvalidLength => "valid kind, invalid length",
            InvalidKindInvalidLength => "invalid kind, invalid length",
            ValidKindZeroLength => "valid kind, zero length",
            InvalidKindZeroLength => "invalid kind, zero length",
            Done => "done",
        }
    }
}

/// IPv4 mutation classes, traversed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpPhase {
    Valid,
    InvalidValidLength,
    InvalidInvalidLength,
    InvalidZeroLength,
    InvalidRandomTypeValidLength,
    InvalidRandomTypeZeroLength,
    InvalidRandomTypeInvalidLength,
    Done,
}

impl IpPhase {
    fn next(self) -> Self {
        use IpPhase::*;
        match self {
            Valid => InvalidValidLength,
            InvalidValidLength => InvalidInvalidLength,
            InvalidInvalidLength => InvalidZeroLength,
            InvalidZeroLength => InvalidRandomTypeValidLength,
            InvalidRandomTypeValidLength => InvalidRandomTypeZeroLength,
            InvalidRandomTypeZeroLength => InvalidRandomTypeInvalidLength,
            InvalidRandomTypeInvalidLength | Done => Done,
        }
    }

    /// The mutation parameters of this phase; `None` for the catalog sweep
    /// and for `Done`.
    pub fn mutation(self) -> Option<Mutation> {
        use IpPhase::*;
        let (randomize_kind, length) = match self {
            Valid | Done => return None,
            InvalidValidLength => (false, LengthMutation::Valid),
            InvalidInvalidLength => (false, LengthMutation::Invalid),
            InvalidZeroLength => (false, LengthMutation::Zero),
            InvalidRandomTypeValidLength => (true, LengthMutation::Valid),
            InvalidRandomTypeZeroLength => (true, LengthMutation::Zero),
            InvalidRandomTypeInvalidLength => (true, LengthMutation::Invalid),
        };
        Some(Mutation {
            randomize_kind,
            length,
        })
    }

    fn name(self) -> &'static str {
        use IpPhase::*;
        match self {
            Valid => "valid options sweep",
            InvalidValidLength => "catalog type, valid length",
            InvalidInvalidLength => "catalog type, invalid length",
            InvalidZeroLength => "catalog type, zero length",
            InvalidRandomTypeValidLength => "random type, valid length",
            InvalidRandomTypeZeroLength => "random type, zero length",
            InvalidRandomTypeInvalidLength => "random type, invalid length",
            Done => "done",
        }
    }
}

/// The current position in a mode's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tcp(TcpPhase),
    Ip(IpPhase),
}

impl Phase {
    /// The first phase of the given mode's schedule.
    pub fn first(mode: FuzzMode) -> Self {
        match mode {
            FuzzMode::TcpOptions => Phase::Tcp(TcpPhase::Valid),
            FuzzMode::IpOptions => Phase::Ip(IpPhase::Valid),
        }
    }

    /// Whether the schedule is exhausted.
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            Phase::Tcp(TcpPhase::Done) | Phase::Ip(IpPhase::Done)
        )
    }

    /// Number of packets this phase emits before the schedule advances.
    pub fn quota(&self, invalid_count: u64) -> u64 {
        match self {
            Phase::Tcp(TcpPhase::Valid) => TCP_OPTIONS.len() as u64,
            Phase::Ip(IpPhase::Valid) => IP_OPTIONS.len() as u64,
            Phase::Tcp(TcpPhase::Done) | Phase::Ip(IpPhase::Done) => 0,
            _ => invalid_count,
        }
    }

    /// Step the schedule after one emission.
    ///
    /// Returns the phase and cycle of the next emission. Total over all
    /// inputs; applied to `Done` it stays `Done`.
    pub fn advance(self, cycle: u64, invalid_count: u64) -> (Phase, u64) {
        let next_cycle = cycle + 1;
        if next_cycle < self.quota(invalid_count) {
            return (self, next_cycle);
        }
        let next = match self {
            Phase::Tcp(p) => Phase::Tcp(p.next()),
            Phase::Ip(p) => Phase::Ip(p.next()),
        };
        (next, 0)
    }

    /// Human-readable phase name for progress output.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Tcp(p) => p.name(),
            Phase::Ip(p) => p.name(),
        }
    }
}
