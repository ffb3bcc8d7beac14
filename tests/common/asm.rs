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

//! Minimal RV32IM assembler for building test programs
//!
//! Branch and jump offsets are byte offsets relative to the instruction
//! itself, exactly as the hardware computes them.

fn r_type(funct7: u32, rs2: u8, rs1: u8, funct3: u32, rd: u8) -> u32 {
    (funct7 << 25)
        | ((rs2 as u32) << 20)
        | ((rs1 as u32) << 15)
        | (funct3 << 12)
        | ((rd as u32) << 7)
        | 0b0110011
}

fn i_type(imm: i32, rs1: u8, funct3: u32, rd: u8, opcode: u32) -> u32 {
    ((imm as u32 & 0xFFF) << 20)
        | ((rs1 as u32) << 15)
        | (funct3 << 12)
        | ((rd as u32) << 7)
        | opcode
}

fn s_type(imm: i32, rs2: u8, rs1: u8, funct3: u32) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7F) << 25)
        | ((rs2 as u32) << 20)
        | ((rs1 as u32) << 15)
        | (funct3 << 12)
        | ((imm & 0x1F) << 7)
        | 0b0100011
}

fn b_type(offset: i32, rs2: u8, rs1: u8, funct3: u32) -> u32 {
    let imm = offset as u32;
    (((imm >> 12) & 0x1) << 31)
        | (((imm >> 5) & 0x3F) << 25)
        | ((rs2 as u32) << 20)
        | ((rs1 as u32) << 15)
        | (funct3 << 12)
        | (((imm >> 1) & 0xF) << 8)
        | (((imm >> 11) & 0x1) << 7)
        | 0b1100011
}

#[allow(dead_code)]
pub fn lui(rd: u8, imm20: u32) -> u32 {
    (imm20 << 12) | ((rd as u32) << 7) | 0b0110111
}

#[allow(dead_code)]
pub fn auipc(rd: u8, imm20: u32) -> u32 {
    (imm20 << 12) | ((rd as u32) << 7) | 0b0010111
}

#[allow(dead_code)]
pub fn jal(rd: u8, offset: i32) -> u32 {
    let imm = offset as u32;
    (((imm >> 20) & 0x1) << 31)
        | (((imm >> 1) & 0x3FF) << 21)
        | (((imm >> 11) & 0x1) << 20)
        | (((imm >> 12) & 0xFF) << 12)
        | ((rd as u32) << 7)
        | 0b1101111
}

#[allow(dead_code)]
pub fn jalr(rd: u8, rs1: u8, imm: i32) -> u32 {
    i_type(imm, rs1, 0b000, rd, 0b1100111)
}

#[allow(dead_code)]
pub fn beq(rs1: u8, rs2: u8, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b000)
}

#[allow(dead_code)]
pub fn bne(rs1: u8, rs2: u8, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b001)
}

#[allow(dead_code)]
pub fn blt(rs1: u8, rs2: u8, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b100)
}

#[allow(dead_code)]
pub fn bge(rs1: u8, rs2: u8, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b101)
}

#[allow(dead_code)]
pub fn bltu(rs1: u8, rs2: u8, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b110)
}

#[allow(dead_code)]
pub fn addi(rd: u8, rs1: u8, imm: i32) -> u32 {
    i_type(imm, rs1, 0b000, rd, 0b0010011)
}

#[allow(dead_code)]
pub fn andi(rd: u8, rs1: u8, imm: i32) -> u32 {
    i_type(imm, rs1, 0b111, rd, 0b0010011)
}

#[allow(dead_code)]
pub fn add(rd: u8, rs1: u8, rs2: u8) -> u32 {
    r_type(0b0000000, rs2, rs1, 0b000, rd)
}

#[allow(dead_code)]
pub fn sub(rd: u8, rs1: u8, rs2: u8) -> u32 {
    r_type(0b0100000, rs2, rs1, 0b000, rd)
}

#[allow(dead_code)]
pub fn mul(rd: u8, rs1: u8, rs2: u8) -> u32 {
    r_type(0b0000001, rs2, rs1, 0b000, rd)
}

#[allow(dead_code)]
pub fn lw(rd: u8, rs1: u8, offset: i32) -> u32 {
    i_type(offset, rs1, 0b010, rd, 0b0000011)
}

#[allow(dead_code)]
pub fn lbu(rd: u8, rs1: u8, offset: i32) -> u32 {
    i_type(offset, rs1, 0b100, rd, 0b0000011)
}

#[allow(dead_code)]
pub fn sw(rs2: u8, rs1: u8, offset: i32) -> u32 {
    s_type(offset, rs2, rs1, 0b010)
}

#[allow(dead_code)]
pub fn sh(rs2: u8, rs1: u8, offset: i32) -> u32 {
    s_type(offset, rs2, rs1, 0b001)
}

#[allow(dead_code)]
pub fn sb(rs2: u8, rs1: u8, offset: i32) -> u32 {
    s_type(offset, rs2, rs1, 0b000)
}

#[allow(dead_code)]
pub fn nop() -> u32 {
    addi(0, 0, 0)
}

#[allow(dead_code)]
pub fn ebreak() -> u32 {
    0x0010_0073
}

/// Flatten assembled words into a loadable little-endian image
#[allow(dead_code)]
pub fn image(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
