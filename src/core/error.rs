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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
///
/// Load errors are reported immediately and prevent session creation.
/// Bus and decode errors are fatal to the running session: the execution
/// controller converts them into a `Fault` outcome at the faulting
/// instruction and the session cannot be resumed.
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("Image file not found: {0}")]
    ImageNotFound(String),

    #[error("Image too large: {got} bytes (SRAM holds {limit})")]
    ImageTooLarge { got: usize, limit: usize },

    #[error("Entry address 0x{entry:08X} outside loaded image")]
    InvalidEntryAddress { entry: u32 },

    #[error("Bus fault: {width}-byte access at 0x{address:08X}")]
    BusFault { address: u32, width: u8 },

    #[error("Unimplemented peripheral register at 0x{address:08X}")]
    UnmappedPeripheral { address: u32 },

    #[error("Unsupported instruction: 0x{0:08X}")]
    UnsupportedInstruction(u32),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
