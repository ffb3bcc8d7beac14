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

//! Core emulation components
//!
//! This module contains all hardware emulation components:
//! - CPU (RV32IM subset)
//! - Memory bus
//! - GPIO controller (IO_BANK0 pin muxing)
//! - PWM controller (12 slices, 2 channels each)
//! - Timer (64-bit microsecond counter)
//! - System integration (execution session)

pub mod config;
pub mod cpu;
pub mod error;
pub mod gpio;
pub mod loader;
pub mod memory;
pub mod pwm;
pub mod snapshot;
pub mod system;
pub mod timer;

// Re-export commonly used types
pub use config::EmulatorConfig;
pub use cpu::{Cpu, CpuState};
pub use error::{EmulatorError, Result};
pub use gpio::GpioBank;
pub use loader::Image;
pub use memory::Bus;
pub use pwm::Pwm;
pub use snapshot::Snapshot;
pub use system::{Fault, FaultKind, RunOutcome, StepOutcome, System};
pub use timer::Timer;
