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

/// Decode R-type instruction
///
/// R-type instructions are used for register-to-register operations.
///
/// Format: | funct7 (7) | rs2 (5) | rs1 (5) | funct3 (3) | rd (5) | opcode (7) |
///
/// # Arguments
///
/// * `instr` - The 32-bit instruction
///
/// # Returns
///
/// Tuple of (rd, funct3, rs1, rs2, funct7)
#[inline(always)]
pub(super) fn decode_r_type(instr: u32) -> (u8, u8, u8, u8, u8) {
    let rd = ((instr >> 7) & 0x1F) as u8;
    let funct3 = ((instr >> 12) & 0x7) as u8;
    let rs1 = ((instr >> 15) & 0x1F) as u8;
    let rs2 = ((instr >> 20) & 0x1F) as u8;
    let funct7 = ((instr >> 25) & 0x7F) as u8;
    (rd, funct3, rs1, rs2, funct7)
}

/// Decode I-type instruction
///
/// I-type instructions are used for register-immediate operations, loads,
/// and JALR. The 12-bit immediate is sign-extended to 32 bits.
///
/// Format: | imm[11:0] (12) | rs1 (5) | funct3 (3) | rd (5) | opcode (7) |
///
/// # Arguments
///
/// * `instr` - The 32-bit instruction
///
/// # Returns
///
/// Tuple of (rd, funct3, rs1, imm)
#[inline(always)]
pub(super) fn decode_i_type(instr: u32) -> (u8, u8, u8, u32) {
    let rd = ((instr >> 7) & 0x1F) as u8;
    let funct3 = ((instr >> 12) & 0x7) as u8;
    let rs1 = ((instr >> 15) & 0x1F) as u8;
    let imm = ((instr as i32) >> 20) as u32;
    (rd, funct3, rs1, imm)
}

/// Decode S-type instruction
///
/// S-type instructions are stores. The 12-bit immediate is split across
/// two fields and sign-extended to 32 bits.
///
/// Format: | imm[11:5] (7) | rs2 (5) | rs1 (5) | funct3 (3) | imm[4:0] (5) | opcode (7) |
///
/// # Arguments
///
/// * `instr` - The 32-bit instruction
///
/// # Returns
///
/// Tuple of (funct3, rs1, rs2, imm)
#[inline(always)]
pub(super) fn decode_s_type(instr: u32) -> (u8, u8, u8, u32) {
    let funct3 = ((instr >> 12) & 0x7) as u8;
    let rs1 = ((instr >> 15) & 0x1F) as u8;
    let rs2 = ((instr >> 20) & 0x1F) as u8;
    let imm = ((((instr & 0xFE00_0000) as i32) >> 20) as u32) | ((instr >> 7) & 0x1F);
    (funct3, rs1, rs2, imm)
}

/// Decode B-type instruction
///
/// B-type instructions are conditional branches. The immediate encodes a
/// signed byte offset in multiples of 2, relative to the branch itself.
///
/// Format: | imm[12|10:5] (7) | rs2 (5) | rs1 (5) | funct3 (3) | imm[4:1|11] (5) | opcode (7) |
///
/// # Arguments
///
/// * `instr` - The 32-bit instruction
///
/// # Returns
///
/// Tuple of (funct3, rs1, rs2, imm)
#[inline(always)]
pub(super) fn decode_b_type(instr: u32) -> (u8, u8, u8, u32) {
    let funct3 = ((instr >> 12) & 0x7) as u8;
    let rs1 = ((instr >> 15) & 0x1F) as u8;
    let rs2 = ((instr >> 20) & 0x1F) as u8;
    let imm = ((((instr & 0x8000_0000) as i32) >> 19) as u32)
        | ((instr & 0x80) << 4)
        | ((instr >> 20) & 0x7E0)
        | ((instr >> 7) & 0x1E);
    (funct3, rs1, rs2, imm)
}

/// Decode U-type instruction
///
/// U-type instructions (LUI, AUIPC) carry a 20-bit immediate that fills
/// the upper bits of the result; the low 12 bits are zero.
///
/// Format: | imm[31:12] (20) | rd (5) | opcode (7) |
///
/// # Arguments
///
/// * `instr` - The 32-bit instruction
///
/// # Returns
///
/// Tuple of (rd, imm)
#[inline(always)]
pub(super) fn decode_u_type(instr: u32) -> (u8, u32) {
    let rd = ((instr >> 7) & 0x1F) as u8;
    let imm = instr & 0xFFFF_F000;
    (rd, imm)
}

/// Decode J-type instruction
///
/// J-type is used by JAL. The immediate encodes a signed byte offset in
/// multiples of 2, relative to the jump itself.
///
/// Format: | imm[20|10:1|11|19:12] (20) | rd (5) | opcode (7) |
///
/// # Arguments
///
/// * `instr` - The 32-bit instruction
///
/// # Returns
///
/// Tuple of (rd, imm)
#[inline(always)]
pub(super) fn decode_j_type(instr: u32) -> (u8, u32) {
    let rd = ((instr >> 7) & 0x1F) as u8;
    let imm = ((((instr & 0x8000_0000) as i32) >> 11) as u32)
        | (instr & 0xFF000)
        | ((instr >> 9) & 0x800)
        | ((instr >> 20) & 0x7FE);
    (rd, imm)
}
