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

//! RP2350 (RISC-V) microcontroller emulator core library
//!
//! This library provides the core components for running small RISC-V
//! machine programs against an RP2350-style microcontroller model,
//! including the CPU (RV32IM subset), memory bus, and memory-mapped
//! peripherals (GPIO, PWM, timer).
//!
//! # Example
//!
//! ```
//! use rvpico::core::system::System;
//!
//! let mut system = System::new();
//!
//! // Load a machine-code image, then run it to the next EBREAK:
//! // system.load_image(&image, 0x2000_0000)?;
//! // let outcome = system.run(1_000_000);
//! ```

pub mod core;
