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

use std::fmt;

use crate::error::Error;

/// Fuzzing modes supported by optfuzz.
///
/// Every mode-dependent decision in the pipeline dispatches on this tag:
/// - `IpOptions`: mutate the IPv4 header's option area, TCP header carried
///   behind the options
/// - `TcpOptions`: mutate the TCP header's option area inside a plain
///   20-byte IPv4 header
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FuzzMode {
    /// Fuzz the IPv4 options field
    IpOptions,
    /// Fuzz the TCP options field
    TcpOptions,
}

impl TryFrom<usize> for FuzzMode {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FuzzMode::IpOptions),
            1 => Ok(FuzzMode::TcpOptions),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

impl fmt::Display for FuzzMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuzzMode::IpOptions => write!(f, "IP Options Fuzzing"),
            FuzzMode::TcpOptions => write!(f, "TCP Options Fuzzing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_valid_integers() {
        assert_eq!(FuzzMode::try_from(0).unwrap(), FuzzMode::IpOptions);
        assert_eq!(FuzzMode::try_from(1).unwrap(), FuzzMode::TcpOptions);
    }

    #[test]
    fn test_mode_from_invalid_integers() {
        assert!(FuzzMode::try_from(2).is_err());
        assert!(FuzzMode::try_from(usize::MAX).is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(FuzzMode::IpOptions.to_string(), "IP Options Fuzzing");
        assert_eq!(FuzzMode::TcpOptions.to_string(), "TCP Options Fuzzing");
    }
}
