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

//! CPU test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: CPU initialization, reset, register access, PC handling
//! - `alu`: Register-immediate and register-register arithmetic, M extension
//! - `branch`: Branches, jumps and PC semantics
//! - `load_store`: Memory access instructions
//! - `system`: EBREAK, FENCE, fault behavior
//! - `props`: Property tests for the register file and wrap semantics

use super::Cpu;
use crate::core::memory::Bus;

mod alu;
mod props;

/// Build a CPU and a bus with `words` placed at the start of SRAM
fn setup(words: &[u32]) -> (Cpu, Bus) {
    let mut bus = Bus::new();
    for (i, word) in words.iter().enumerate() {
        bus.write32(Bus::SRAM_START + (i as u32) * 4, *word).unwrap();
    }
    (Cpu::new(), bus)
}

/// Step the CPU once, panicking on unexpected faults
fn step(cpu: &mut Cpu, bus: &mut Bus) {
    cpu.step(bus).expect("unexpected CPU fault");
}

/// Run `n` instructions
fn step_n(cpu: &mut Cpu, bus: &mut Bus, n: usize) {
    for _ in 0..n {
        step(cpu, bus);
    }
}
