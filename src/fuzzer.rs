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

//! The fuzzing orchestrator.
//!
//! Owns the generate -> build -> send loop: one raw socket, one PRNG, one
//! generator, pumped synchronously until the mutation schedule is
//! exhausted or the send path fails. Everything the run needs lives for
//! exactly the run; the socket closes when the loop returns.

use std::thread;
use std::time::Duration;

use crate::config::FuzzConfig;
use crate::generator::{Generator, OptionBlob, Step, INVALID_COUNT_DEFAULT};
use crate::mode::FuzzMode;
use crate::packet::{self, SEND_BUF_LEN};
use crate::rng::XorShift64;
use crate::sender::{RawSender, SendProtocol};
use crate::Result;

/// Pause between sends so a local target isn't denial-of-serviced.
const SEND_DELAY_DEFAULT: Duration = Duration::from_micros(50);

/// Emit a progress line every this many packets.
const PROGRESS_INTERVAL: u64 = 1000;

/// A configured fuzzing session.
///
/// # Examples
///
/// ```no_run
/// use optfuzz::{Fuzzer, FuzzConfig, FuzzMode};
///
/// let config = FuzzConfig::new(FuzzMode::TcpOptions, "eth0", "10.0.0.1", 8080)?;
/// let sent = Fuzzer::new(config).with_seed(42).run()?;
/// println!("done, {sent} packets");
/// # Ok::<(), optfuzz::Error>(())
/// ```
#[derive(Debug)]
pub struct Fuzzer {
    config: FuzzConfig,
    seed: Option<u64>,
    invalid_count: u64,
    send_delay: Duration,
}

impl Fuzzer {
    /// Create a fuzzer for a validated configuration.
    pub fn new(config: FuzzConfig) -> Self {
        Self {
            config,
            seed: None,
            invalid_count: INVALID_COUNT_DEFAULT,
            send_delay: SEND_DELAY_DEFAULT,
        }
    }

    /// Seed the PRNG explicitly instead of from the wall clock.
    ///
    /// Two runs with the same seed, mode and quota emit byte-identical
    /// packet streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the per-phase quota of the randomized mutation classes.
    pub fn with_invalid_count(mut self, count: u64) -> Self {
        self.invalid_count = count;
        self
    }

    /// Override the pacing delay between sends.
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    /// Run the whole mutation schedule.
    ///
    /// Opens the raw socket, seeds the PRNG, and pumps the loop until the
    /// generator reports the schedule exhausted. Returns the number of
    /// packets sent. The first build or send failure aborts the run; the
    /// socket is closed either way.
    pub fn run(&self) -> Result<u64> {
        // both modes carry a TCP segment inside the datagram, so the
        // kernel sees protocol 6 either way
        let sender = RawSender::open(SendProtocol::Tcp)?;

        let mut prng = match self.seed {
            Some(seed) => XorShift64::new(seed)?,
            None => XorShift64::from_clock()?,
        };

        let mut generator = Generator::new(self.config.mode).with_invalid_count(self.invalid_count);
        let mut blob = OptionBlob::new();
        let mut buffer = [0u8; SEND_BUF_LEN];
        let mut sent: u64 = 0;

        let mut phase = generator.phase();
        println!("[FUZZER] entering phase: {}", phase.name());

        while generator.next_options(&mut prng, &mut blob) == Step::Continue {
            let len = match self.config.mode {
                FuzzMode::TcpOptions => packet::build_tcp(
                    &mut buffer,
                    blob.as_wire(),
                    self.config.src_ip,
                    self.config.dst_ip,
                    self.config.dst_port,
                    &mut prng,
                )?,
                FuzzMode::IpOptions => packet::build_ip(
                    &mut buffer,
                    blob.as_wire(),
                    self.config.src_ip,
                    self.config.dst_ip,
                    self.config.dst_port,
                    &mut prng,
                )?,
            };

            sender.send(&buffer[..len], self.config.dst_ip)?;
            sent += 1;

            if sent % PROGRESS_INTERVAL == 0 {
                println!("[FUZZER] {sent} packets sent");
            }
            if generator.phase() != phase {
                phase = generator.phase();
                if !phase.is_done() {
                    println!("[FUZZER] entering phase: {}", phase.name());
                }
            }

            thread::sleep(self.send_delay);
        }

        tracing::debug!(sent, "mutation schedule exhausted");
        Ok(sent)
    }
}
