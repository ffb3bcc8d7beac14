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

use super::decode::{
    decode_b_type, decode_i_type, decode_j_type, decode_r_type, decode_s_type, decode_u_type,
};
use super::{Cpu, CpuState};
use crate::core::error::{EmulatorError, Result};
use crate::core::memory::Bus;

/// EBREAK encoding (the only SYSTEM instruction the core implements)
pub const EBREAK: u32 = 0x0010_0073;

impl Cpu {
    /// Decode and execute the current instruction
    ///
    /// This method dispatches the instruction to the appropriate handler
    /// based on its major opcode (lower 7 bits).
    ///
    /// # Arguments
    ///
    /// * `bus` - Memory bus for memory operations
    ///
    /// # Returns
    ///
    /// Ok(()) on success, or an error if the encoding is not part of the
    /// implemented RV32IM subset
    pub(super) fn execute_instruction(&mut self, bus: &mut Bus) -> Result<()> {
        let instruction = self.current_instruction;

        // Extract major opcode (lower 7 bits)
        let opcode = instruction & 0x7F;

        match opcode {
            0b0110111 => self.op_lui(instruction),         // LUI
            0b0010111 => self.op_auipc(instruction),       // AUIPC
            0b1101111 => self.op_jal(instruction),         // JAL
            0b1100111 => self.op_jalr(instruction),        // JALR
            0b1100011 => self.op_branch(instruction),      // BEQ/BNE/BLT/BGE/BLTU/BGEU
            0b0000011 => self.op_load(instruction, bus),   // LB/LH/LW/LBU/LHU
            0b0100011 => self.op_store(instruction, bus),  // SB/SH/SW
            0b0010011 => self.op_alu_imm(instruction),     // ADDI..SRAI
            0b0110011 => self.op_alu_reg(instruction),     // ADD..AND + M extension
            0b0001111 => Ok(()),                           // FENCE: no-op (single hart)
            0b1110011 => self.op_system(instruction),      // EBREAK
            _ => Err(EmulatorError::UnsupportedInstruction(instruction)),
        }
    }

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rd, imm
    /// Operation: rd = imm << 12
    fn op_lui(&mut self, instruction: u32) -> Result<()> {
        let (rd, imm) = decode_u_type(instruction);
        self.set_reg(rd, imm);
        Ok(())
    }

    /// AUIPC: Add Upper Immediate to PC
    ///
    /// Format: auipc rd, imm
    /// Operation: rd = pc + (imm << 12), pc of the AUIPC itself
    fn op_auipc(&mut self, instruction: u32) -> Result<()> {
        let (rd, imm) = decode_u_type(instruction);
        self.set_reg(rd, self.current_pc.wrapping_add(imm));
        Ok(())
    }

    /// JAL: Jump And Link
    ///
    /// Format: jal rd, offset
    /// Operation: rd = pc + 4; pc = pc + offset
    fn op_jal(&mut self, instruction: u32) -> Result<()> {
        let (rd, imm) = decode_j_type(instruction);
        self.set_reg(rd, self.current_pc.wrapping_add(4));
        self.pc = self.current_pc.wrapping_add(imm);
        Ok(())
    }

    /// JALR: Jump And Link Register
    ///
    /// Format: jalr rd, offset(rs1)
    /// Operation: rd = pc + 4; pc = (rs1 + offset) & !1
    ///
    /// The link value is read before rd is written, so `jalr ra, 0(ra)`
    /// behaves correctly.
    fn op_jalr(&mut self, instruction: u32) -> Result<()> {
        let (rd, _funct3, rs1, imm) = decode_i_type(instruction);
        let target = self.reg(rs1).wrapping_add(imm) & !1;
        self.set_reg(rd, self.current_pc.wrapping_add(4));
        self.pc = target;
        Ok(())
    }

    /// Conditional branches: BEQ, BNE, BLT, BGE, BLTU, BGEU
    ///
    /// Format: b<cond> rs1, rs2, offset
    /// Operation: if cond(rs1, rs2) then pc = pc + offset
    ///
    /// The offset is relative to the branch instruction itself.
    fn op_branch(&mut self, instruction: u32) -> Result<()> {
        let (funct3, rs1, rs2, imm) = decode_b_type(instruction);
        let a = self.reg(rs1);
        let b = self.reg(rs2);

        let taken = match funct3 {
            0b000 => a == b,                       // BEQ
            0b001 => a != b,                       // BNE
            0b100 => (a as i32) < (b as i32),      // BLT
            0b101 => (a as i32) >= (b as i32),     // BGE
            0b110 => a < b,                        // BLTU
            0b111 => a >= b,                       // BGEU
            _ => return Err(EmulatorError::UnsupportedInstruction(instruction)),
        };

        if taken {
            self.pc = self.current_pc.wrapping_add(imm);
        }
        Ok(())
    }

    /// Loads: LB, LH, LW, LBU, LHU
    ///
    /// Format: l<width> rd, offset(rs1)
    /// Operation: rd = mem[rs1 + offset], sign- or zero-extended
    ///
    /// There is no load delay: the value is architecturally visible to the
    /// next instruction.
    fn op_load(&mut self, instruction: u32, bus: &mut Bus) -> Result<()> {
        let (rd, funct3, rs1, imm) = decode_i_type(instruction);
        let addr = self.reg(rs1).wrapping_add(imm);

        let value = match funct3 {
            0b000 => bus.read8(addr)? as i8 as i32 as u32,   // LB
            0b001 => bus.read16(addr)? as i16 as i32 as u32, // LH
            0b010 => bus.read32(addr)?,                      // LW
            0b100 => bus.read8(addr)? as u32,                // LBU
            0b101 => bus.read16(addr)? as u32,               // LHU
            _ => return Err(EmulatorError::UnsupportedInstruction(instruction)),
        };

        self.set_reg(rd, value);
        Ok(())
    }

    /// Stores: SB, SH, SW
    ///
    /// Format: s<width> rs2, offset(rs1)
    /// Operation: mem[rs1 + offset] = rs2 (low bits for SB/SH)
    fn op_store(&mut self, instruction: u32, bus: &mut Bus) -> Result<()> {
        let (funct3, rs1, rs2, imm) = decode_s_type(instruction);
        let addr = self.reg(rs1).wrapping_add(imm);
        let value = self.reg(rs2);

        match funct3 {
            0b000 => bus.write8(addr, value as u8)?,   // SB
            0b001 => bus.write16(addr, value as u16)?, // SH
            0b010 => bus.write32(addr, value)?,        // SW
            _ => return Err(EmulatorError::UnsupportedInstruction(instruction)),
        }
        Ok(())
    }

    /// Register-immediate ALU operations
    ///
    /// ADDI, SLTI, SLTIU, XORI, ORI, ANDI, SLLI, SRLI, SRAI.
    /// ADDI wraps on overflow; there are no arithmetic traps.
    fn op_alu_imm(&mut self, instruction: u32) -> Result<()> {
        let (rd, funct3, rs1, imm) = decode_i_type(instruction);
        let a = self.reg(rs1);

        let value = match funct3 {
            0b000 => a.wrapping_add(imm),                         // ADDI
            0b010 => ((a as i32) < (imm as i32)) as u32,          // SLTI
            0b011 => (a < imm) as u32,                            // SLTIU
            0b100 => a ^ imm,                                     // XORI
            0b110 => a | imm,                                     // ORI
            0b111 => a & imm,                                     // ANDI
            0b001 => {
                // SLLI: the upper immediate bits must be zero
                if imm >> 5 != 0 {
                    return Err(EmulatorError::UnsupportedInstruction(instruction));
                }
                a << (imm & 0x1F)
            }
            0b101 => match imm >> 5 {
                0b000_0000 => a >> (imm & 0x1F),                  // SRLI
                0b010_0000 => ((a as i32) >> (imm & 0x1F)) as u32, // SRAI
                _ => return Err(EmulatorError::UnsupportedInstruction(instruction)),
            },
            _ => unreachable!(),
        };

        self.set_reg(rd, value);
        Ok(())
    }

    /// Register-register ALU operations
    ///
    /// funct7 = 0b0000000: ADD, SLL, SLT, SLTU, XOR, SRL, OR, AND
    /// funct7 = 0b0100000: SUB, SRA
    /// funct7 = 0b0000001: M extension (MUL.. REMU)
    ///
    /// All arithmetic wraps; division never traps (RISC-V defines the
    /// divide-by-zero and overflow results instead).
    fn op_alu_reg(&mut self, instruction: u32) -> Result<()> {
        let (rd, funct3, rs1, rs2, funct7) = decode_r_type(instruction);
        let a = self.reg(rs1);
        let b = self.reg(rs2);

        let value = match (funct7, funct3) {
            (0b0000000, 0b000) => a.wrapping_add(b),               // ADD
            (0b0100000, 0b000) => a.wrapping_sub(b),               // SUB
            (0b0000000, 0b001) => a << (b & 0x1F),                 // SLL
            (0b0000000, 0b010) => ((a as i32) < (b as i32)) as u32, // SLT
            (0b0000000, 0b011) => (a < b) as u32,                  // SLTU
            (0b0000000, 0b100) => a ^ b,                           // XOR
            (0b0000000, 0b101) => a >> (b & 0x1F),                 // SRL
            (0b0100000, 0b101) => ((a as i32) >> (b & 0x1F)) as u32, // SRA
            (0b0000000, 0b110) => a | b,                           // OR
            (0b0000000, 0b111) => a & b,                           // AND

            (0b0000001, 0b000) => a.wrapping_mul(b), // MUL
            (0b0000001, 0b001) => {
                // MULH: signed x signed, upper 32 bits
                (((a as i32 as i64) * (b as i32 as i64)) >> 32) as u32
            }
            (0b0000001, 0b010) => {
                // MULHSU: signed x unsigned, upper 32 bits
                (((a as i32 as i64) * (b as i64)) >> 32) as u32
            }
            (0b0000001, 0b011) => {
                // MULHU: unsigned x unsigned, upper 32 bits
                (((a as u64) * (b as u64)) >> 32) as u32
            }
            (0b0000001, 0b100) => {
                // DIV: /0 => -1, overflow => dividend
                if b == 0 {
                    u32::MAX
                } else {
                    (a as i32).wrapping_div(b as i32) as u32
                }
            }
            (0b0000001, 0b101) => {
                // DIVU: /0 => all ones
                if b == 0 {
                    u32::MAX
                } else {
                    a / b
                }
            }
            (0b0000001, 0b110) => {
                // REM: /0 => dividend, overflow => 0
                if b == 0 {
                    a
                } else {
                    (a as i32).wrapping_rem(b as i32) as u32
                }
            }
            (0b0000001, 0b111) => {
                // REMU: /0 => dividend
                if b == 0 {
                    a
                } else {
                    a % b
                }
            }

            _ => return Err(EmulatorError::UnsupportedInstruction(instruction)),
        };

        self.set_reg(rd, value);
        Ok(())
    }

    /// SYSTEM opcode: only EBREAK is implemented
    ///
    /// EBREAK halts the core. PC is restored to the EBREAK instruction
    /// itself so an inspecting debugger sees where the program stopped.
    /// ECALL and CSR accesses are outside the implemented subset and
    /// fault like any other unknown encoding.
    fn op_system(&mut self, instruction: u32) -> Result<()> {
        if instruction == EBREAK {
            self.state = CpuState::Halted;
            self.pc = self.current_pc;
            log::debug!("EBREAK at PC=0x{:08X}", self.current_pc);
            Ok(())
        } else {
            Err(EmulatorError::UnsupportedInstruction(instruction))
        }
    }
}
