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

use std::io::Write;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use optfuzz::{Cli, FuzzConfig, Fuzzer};
use tracing_subscriber::EnvFilter;

fn banner() {
    println!();
    println!("*** optfuzz - network options fuzzer");
    println!("*** for TCP and IPv4 options fields");
    println!();
}

/// Short countdown so a mistyped target can still be ctrl-C'd.
fn countdown() {
    print!("fuzzing in... ");
    for i in (1..=3).rev() {
        print!("{i} ");
        let _ = std::io::stdout().flush();
        std::thread::sleep(Duration::from_secs(1));
    }
    println!();
    println!();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    banner();

    let args = Cli::parse();

    // validation happens here; nothing has touched the network yet
    let config = FuzzConfig::new(args.mode, &args.interface, &args.target, args.port)?;
    println!("{config}");
    println!();

    let mut fuzzer = Fuzzer::new(config)
        .with_invalid_count(args.count)
        .with_send_delay(Duration::from_micros(args.delay_us));
    if let Some(seed) = args.seed {
        fuzzer = fuzzer.with_seed(seed);
    }

    countdown();

    let start = Instant::now();
    let sent = fuzzer.run()?;
    let elapsed = start.elapsed();

    println!();
    println!(
        "[FUZZER] finished: {} packets in {:.3} seconds",
        sent,
        elapsed.as_secs_f64()
    );

    Ok(())
}
