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

//! Test fixtures for common test scenarios

use rvpico::core::memory::Bus;
use rvpico::core::system::System;

use super::asm;

/// Create a System with the assembled program loaded at the start of SRAM
#[allow(dead_code)]
pub fn system_with_program(words: &[u32]) -> System {
    let mut system = System::new();
    system
        .load_image(&asm::image(words), Bus::SRAM_START)
        .expect("failed to load test program");
    system
}

/// Run the program to completion and return the system for inspection
///
/// Panics unless the program halts via EBREAK within `max_cycles`.
#[allow(dead_code)]
pub fn run_to_halt(words: &[u32], max_cycles: u64) -> System {
    use rvpico::core::system::RunOutcome;

    let mut system = system_with_program(words);
    match system.run(max_cycles) {
        RunOutcome::Halted { .. } => system,
        other => panic!("program did not halt: {:?}", other),
    }
}
