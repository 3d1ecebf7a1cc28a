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

use clap::Parser;

use crate::generator::INVALID_COUNT_DEFAULT;
use crate::mode::FuzzMode;

/// Parse and validate a fuzzing mode integer.
///
/// Accepts 0 (IP options) or 1 (TCP options).
fn parse_mode(s: &str) -> Result<FuzzMode, String> {
    let v = s
        .parse::<usize>()
        .map_err(|_| format!("invalid mode: {}", s))?;
    FuzzMode::try_from(v).map_err(|e| e.to_string())
}

/// Command-line interface for optfuzz.
///
/// The four flags of a run are mandatory; the remaining knobs default to
/// the values of an ordinary fuzzing session.
#[derive(Parser, Debug)]
#[command(name = "optfuzz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// fuzzing mode: 0 for IP options, 1 for TCP options
    #[arg(short = 'm', long = "mode", value_name = "MODE", value_parser = parse_mode)]
    pub mode: FuzzMode,

    /// target IPv4 address
    #[arg(short = 't', long = "target", value_name = "IP")]
    pub target: String,

    /// target port (must be non-zero)
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: u16,

    /// network interface providing the source address
    #[arg(short = 'i', long = "interface", value_name = "IFNAME")]
    pub interface: String,

    /// seed for the PRNG (for reproducible, byte-identical packet streams);
    /// defaults to wall-clock seconds
    #[arg(long)]
    pub seed: Option<u64>,

    /// number of packets per randomized mutation phase
    #[arg(long, default_value_t = INVALID_COUNT_DEFAULT)]
    pub count: u64,

    /// microseconds to pause between sends
    #[arg(long = "delay-us", default_value_t = 50)]
    pub delay_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_valid() {
        assert_eq!(parse_mode("0").unwrap(), FuzzMode::IpOptions);
        assert_eq!(parse_mode("1").unwrap(), FuzzMode::TcpOptions);
    }

    #[test]
    fn test_parse_mode_invalid() {
        assert!(parse_mode("2").is_err());
        assert!(parse_mode("abc").is_err());
        assert!(parse_mode("-1").is_err());
    }

    #[test]
    fn test_mandatory_flags() {
        let cli = Cli::try_parse_from([
            "optfuzz", "-m", "1", "-t", "10.0.0.1", "-p", "8080", "-i", "eth0",
        ])
        .unwrap();
        assert_eq!(cli.mode, FuzzMode::TcpOptions);
        assert_eq!(cli.target, "10.0.0.1");
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.interface, "eth0");
        assert_eq!(cli.seed, None);
        assert_eq!(cli.count, INVALID_COUNT_DEFAULT);
        assert_eq!(cli.delay_us, 50);
    }

    #[test]
    fn test_missing_flag_rejected() {
        assert!(Cli::try_parse_from(["optfuzz", "-m", "1", "-t", "10.0.0.1"]).is_err());
    }

    #[test]
    fn test_overridden_knobs() {
        let cli = Cli::try_parse_from([
            "optfuzz", "-m", "0", "-t", "10.0.0.1", "-p", "80", "-i", "lo", "--seed", "42",
            "--count", "100", "--delay-us", "0",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.count, 100);
        assert_eq!(cli.delay_us, 0);
    }
}
