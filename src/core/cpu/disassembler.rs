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

//! RV32IM instruction disassembler for debugging
//!
//! Converts binary instruction encodings to human-readable assembly mnemonics.

use super::decode::{
    decode_b_type, decode_i_type, decode_j_type, decode_r_type, decode_s_type, decode_u_type,
};
use super::instructions::EBREAK;

/// Instruction disassembler
///
/// Converts 32-bit RV32IM instruction encodings to human-readable assembly
/// format. Used by the trace mode of the CLI runner.
///
/// # Example
/// ```
/// use rvpico::core::cpu::Disassembler;
///
/// let instruction = 0x00000013; // addi x0, x0, 0
/// let disasm = Disassembler::disassemble(instruction, 0x20000000);
/// assert_eq!(disasm, "nop");
/// ```
pub struct Disassembler;

impl Disassembler {
    /// Disassemble a single instruction to human-readable format
    ///
    /// # Arguments
    ///
    /// * `instruction` - The 32-bit instruction to disassemble
    /// * `pc` - Address of the instruction (used for branch/jump targets)
    ///
    /// # Returns
    ///
    /// String containing the disassembled instruction
    pub fn disassemble(instruction: u32, pc: u32) -> String {
        if instruction == EBREAK {
            return "ebreak".to_string();
        }
        if instruction == 0x0000_0013 {
            return "nop".to_string();
        }

        match instruction & 0x7F {
            0b0110111 => {
                let (rd, imm) = decode_u_type(instruction);
                format!("lui x{}, 0x{:05X}", rd, imm >> 12)
            }
            0b0010111 => {
                let (rd, imm) = decode_u_type(instruction);
                format!("auipc x{}, 0x{:05X}", rd, imm >> 12)
            }
            0b1101111 => {
                let (rd, imm) = decode_j_type(instruction);
                format!("jal x{}, 0x{:08X}", rd, pc.wrapping_add(imm))
            }
            0b1100111 => {
                let (rd, _, rs1, imm) = decode_i_type(instruction);
                format!("jalr x{}, {}(x{})", rd, imm as i32, rs1)
            }
            0b1100011 => {
                let (funct3, rs1, rs2, imm) = decode_b_type(instruction);
                let target = pc.wrapping_add(imm);
                let mnemonic = match funct3 {
                    0b000 => "beq",
                    0b001 => "bne",
                    0b100 => "blt",
                    0b101 => "bge",
                    0b110 => "bltu",
                    0b111 => "bgeu",
                    _ => return Self::unknown(instruction),
                };
                format!("{} x{}, x{}, 0x{:08X}", mnemonic, rs1, rs2, target)
            }
            0b0000011 => {
                let (rd, funct3, rs1, imm) = decode_i_type(instruction);
                let mnemonic = match funct3 {
                    0b000 => "lb",
                    0b001 => "lh",
                    0b010 => "lw",
                    0b100 => "lbu",
                    0b101 => "lhu",
                    _ => return Self::unknown(instruction),
                };
                format!("{} x{}, {}(x{})", mnemonic, rd, imm as i32, rs1)
            }
            0b0100011 => {
                let (funct3, rs1, rs2, imm) = decode_s_type(instruction);
                let mnemonic = match funct3 {
                    0b000 => "sb",
                    0b001 => "sh",
                    0b010 => "sw",
                    _ => return Self::unknown(instruction),
                };
                format!("{} x{}, {}(x{})", mnemonic, rs2, imm as i32, rs1)
            }
            0b0010011 => {
                let (rd, funct3, rs1, imm) = decode_i_type(instruction);
                match funct3 {
                    0b000 => format!("addi x{}, x{}, {}", rd, rs1, imm as i32),
                    0b010 => format!("slti x{}, x{}, {}", rd, rs1, imm as i32),
                    0b011 => format!("sltiu x{}, x{}, {}", rd, rs1, imm as i32),
                    0b100 => format!("xori x{}, x{}, {}", rd, rs1, imm as i32),
                    0b110 => format!("ori x{}, x{}, {}", rd, rs1, imm as i32),
                    0b111 => format!("andi x{}, x{}, {}", rd, rs1, imm as i32),
                    0b001 => format!("slli x{}, x{}, {}", rd, rs1, imm & 0x1F),
                    0b101 => {
                        if imm >> 5 == 0b010_0000 {
                            format!("srai x{}, x{}, {}", rd, rs1, imm & 0x1F)
                        } else {
                            format!("srli x{}, x{}, {}", rd, rs1, imm & 0x1F)
                        }
                    }
                    _ => Self::unknown(instruction),
                }
            }
            0b0110011 => {
                let (rd, funct3, rs1, rs2, funct7) = decode_r_type(instruction);
                let mnemonic = match (funct7, funct3) {
                    (0b0000000, 0b000) => "add",
                    (0b0100000, 0b000) => "sub",
                    (0b0000000, 0b001) => "sll",
                    (0b0000000, 0b010) => "slt",
                    (0b0000000, 0b011) => "sltu",
                    (0b0000000, 0b100) => "xor",
                    (0b0000000, 0b101) => "srl",
                    (0b0100000, 0b101) => "sra",
                    (0b0000000, 0b110) => "or",
                    (0b0000000, 0b111) => "and",
                    (0b0000001, 0b000) => "mul",
                    (0b0000001, 0b001) => "mulh",
                    (0b0000001, 0b010) => "mulhsu",
                    (0b0000001, 0b011) => "mulhu",
                    (0b0000001, 0b100) => "div",
                    (0b0000001, 0b101) => "divu",
                    (0b0000001, 0b110) => "rem",
                    (0b0000001, 0b111) => "remu",
                    _ => return Self::unknown(instruction),
                };
                format!("{} x{}, x{}, x{}", mnemonic, rd, rs1, rs2)
            }
            0b0001111 => "fence".to_string(),
            _ => Self::unknown(instruction),
        }
    }

    fn unknown(instruction: u32) -> String {
        format!(".word 0x{:08X}", instruction)
    }
}
