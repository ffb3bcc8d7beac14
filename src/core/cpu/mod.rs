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

use crate::core::error::Result;
use crate::core::memory::Bus;

/// CPU (RV32IM) emulation implementation
///
/// # Specifications
/// - Architecture: RV32I base integer ISA + M extension (32-bit)
/// - Registers: 32 general-purpose registers (x0 hardwired to zero)
/// - Halt: EBREAK stops the core and leaves PC at the EBREAK itself
///
/// # Example
/// ```
/// use rvpico::core::cpu::Cpu;
///
/// let mut cpu = Cpu::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // x0 is always 0
/// ```
pub struct Cpu {
    /// General purpose registers (x0-x31)
    ///
    /// x0 is hardwired to always return 0
    regs: [u32; 32],

    /// Program counter
    pc: u32,

    /// Address of the instruction currently executing
    ///
    /// Kept so faults and EBREAK can report/restore the faulting PC after
    /// the sequential PC update has already happened.
    current_pc: u32,

    /// Current instruction (for debugging and fault reports)
    current_instruction: u32,

    /// Execution state
    state: CpuState,
}

/// Execution state of the core
///
/// The state machine only moves forward: once `Halted` or `Faulted`, only
/// a reset returns the core to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum CpuState {
    /// Fetching and executing instructions
    Running,
    /// Stopped by EBREAK; PC points at the EBREAK instruction
    Halted,
    /// Stopped by a bus or decode error; PC points at the faulting instruction
    Faulted,
}

// Module declarations
mod decode;
mod disassembler;
mod instructions;
#[cfg(test)]
mod tests;

// Re-exports
pub use disassembler::Disassembler;

impl Cpu {
    /// Create a new CPU instance with initial state
    ///
    /// The CPU is initialized with the following state:
    /// - All general purpose registers: 0
    /// - PC: 0x20000000 (start of SRAM)
    /// - State: Running
    ///
    /// # Returns
    /// Initialized CPU instance
    ///
    /// # Example
    /// ```
    /// use rvpico::core::cpu::{Cpu, CpuState};
    ///
    /// let cpu = Cpu::new();
    /// assert_eq!(cpu.state(), CpuState::Running);
    /// ```
    pub fn new() -> Self {
        Self {
            regs: [0u32; 32],
            pc: Bus::SRAM_START,
            current_pc: Bus::SRAM_START,
            current_instruction: 0,
            state: CpuState::Running,
        }
    }

    /// Reset CPU to initial state
    ///
    /// Resets all registers to zero, PC to the start of SRAM, and the
    /// state back to `Running`. This mimics power-on or hardware reset.
    pub fn reset(&mut self) {
        self.regs = [0u32; 32];
        self.pc = Bus::SRAM_START;
        self.current_pc = Bus::SRAM_START;
        self.current_instruction = 0;
        self.state = CpuState::Running;
    }

    /// Read from general purpose register
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    ///
    /// # Returns
    /// Register value. x0 always returns 0.
    ///
    /// # Example
    /// ```
    /// use rvpico::core::cpu::Cpu;
    ///
    /// let cpu = Cpu::new();
    /// assert_eq!(cpu.reg(0), 0); // x0 is always 0
    /// ```
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[index as usize]
        }
    }

    /// Write to general purpose register
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    /// - `value`: Value to write
    ///
    /// # Note
    /// Writes to x0 are ignored (x0 is always 0).
    ///
    /// # Example
    /// ```
    /// use rvpico::core::cpu::Cpu;
    ///
    /// let mut cpu = Cpu::new();
    /// cpu.set_reg(1, 0x12345678);
    /// assert_eq!(cpu.reg(1), 0x12345678);
    ///
    /// // Writes to x0 are ignored
    /// cpu.set_reg(0, 0xDEADBEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }

    /// Execute one instruction
    ///
    /// Performs one fetch/decode/execute cycle:
    /// 1. Fetch the instruction at PC over the bus
    /// 2. Advance PC by 4 (jumps and taken branches overwrite it)
    /// 3. Execute the instruction
    ///
    /// If the core is already `Halted` or `Faulted` this is a no-op.
    /// On a bus or decode error the core enters `Faulted` with PC restored
    /// to the faulting instruction, and the error is returned to the caller.
    ///
    /// # Arguments
    ///
    /// * `bus` - Memory bus for reading instructions and data
    ///
    /// # Returns
    ///
    /// The CPU state after the step
    pub fn step(&mut self, bus: &mut Bus) -> Result<CpuState> {
        if self.state != CpuState::Running {
            return Ok(self.state);
        }

        self.current_pc = self.pc;

        match self.fetch_execute(bus) {
            Ok(()) => Ok(self.state),
            Err(err) => {
                self.state = CpuState::Faulted;
                self.pc = self.current_pc;
                log::warn!(
                    "FAULT at PC=0x{:08X}, instruction=0x{:08X}: {}",
                    self.current_pc,
                    self.current_instruction,
                    err
                );
                Err(err)
            }
        }
    }

    fn fetch_execute(&mut self, bus: &mut Bus) -> Result<()> {
        self.current_instruction = bus.read32(self.current_pc)?;
        self.pc = self.current_pc.wrapping_add(4);
        self.execute_instruction(bus)
    }

    /// Get current PC value
    #[inline(always)]
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Set the PC (used when loading an image with an entry point)
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.current_pc = pc;
    }

    /// Get the current execution state
    #[inline(always)]
    pub fn state(&self) -> CpuState {
        self.state
    }

    /// Get the most recently fetched instruction word
    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Copy out all general purpose registers
    pub fn regs(&self) -> [u32; 32] {
        let mut out = self.regs;
        out[0] = 0;
        out
    }

    /// Dump all CPU registers for debugging
    ///
    /// Prints a formatted dump of all CPU state including:
    /// - Program counter (PC) and execution state
    /// - All 32 general-purpose registers
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rvpico::core::cpu::Cpu;
    ///
    /// let cpu = Cpu::new();
    /// cpu.dump_registers(); // Print all register values
    /// ```
    pub fn dump_registers(&self) {
        println!("CPU Registers:");
        println!("PC: 0x{:08X}  State: {:?}", self.pc, self.state);
        println!();

        // Print general-purpose registers in rows of 4
        for i in 0..32 {
            if i % 4 == 0 && i > 0 {
                println!();
            }
            print!("x{:<2}: 0x{:08X}  ", i, self.reg(i));
        }
        println!("\n");
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
