// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 rvpico contributors
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

//! Emulator configuration
//!
//! Loadable from a TOML file by the CLI runner; every field has a default
//! so a partial (or absent) file is fine:
//!
//! ```toml
//! max_cycles = 10000000
//! cycles_per_us = 1
//! ```

use crate::core::error::{EmulatorError, Result};
use serde::Deserialize;
use std::path::Path;

/// Tunable session parameters
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EmulatorConfig {
    /// Default cycle cap for `run`
    pub max_cycles: u64,

    /// CPU cycles per timer microsecond
    pub cycles_per_us: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            max_cycles: 10_000_000,
            cycles_per_us: 1,
        }
    }
}

impl EmulatorConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EmulatorError::InvalidConfig(e.to_string()))
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
