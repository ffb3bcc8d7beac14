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

use super::{setup, step};
use crate::core::error::EmulatorError;
use crate::core::memory::Bus;

/// Run a single ALU instruction with x1/x2 preloaded and return x3
fn alu_rr(word: u32, rs1: u32, rs2: u32) -> u32 {
    let (mut cpu, mut bus) = setup(&[word]);
    cpu.set_reg(1, rs1);
    cpu.set_reg(2, rs2);
    step(&mut cpu, &mut bus);
    cpu.reg(3)
}

/// Run a single register-immediate instruction with x1 preloaded and return x2
fn alu_ri(word: u32, rs1: u32) -> u32 {
    let (mut cpu, mut bus) = setup(&[word]);
    cpu.set_reg(1, rs1);
    step(&mut cpu, &mut bus);
    cpu.reg(2)
}

#[test]
fn test_lui() {
    // lui x5, 0x12345
    let (mut cpu, mut bus) = setup(&[0x1234_52B7]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.reg(5), 0x1234_5000);
}

#[test]
fn test_auipc() {
    // auipc x5, 0x12345
    let (mut cpu, mut bus) = setup(&[0x1234_5297]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.reg(5), Bus::SRAM_START.wrapping_add(0x1234_5000));
}

#[test]
fn test_addi_positive_and_negative() {
    // addi x1, x0, 5
    let (mut cpu, mut bus) = setup(&[0x0050_0093]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.reg(1), 5);

    // addi x1, x0, -1
    let (mut cpu, mut bus) = setup(&[0xFFF0_0093]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.reg(1), 0xFFFF_FFFF);
}

#[test]
fn test_addi_wraps() {
    // addi x2, x1, 1 with x1 = u32::MAX
    assert_eq!(alu_ri(0x0010_8113, u32::MAX), 0);
}

#[test]
fn test_slti_sltiu() {
    // slti x3, x1, 0
    let (mut cpu, mut bus) = setup(&[0x0000_A193]);
    cpu.set_reg(1, (-5i32) as u32);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.reg(3), 1);

    // sltiu x4, x0, 1 (seqz idiom: x0 < 1 unsigned)
    let (mut cpu, mut bus) = setup(&[0x0010_3213]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.reg(4), 1);
}

#[test]
fn test_logic_immediates() {
    // xori x2, x1, -1 (bitwise not)
    assert_eq!(alu_ri(0xFFF0_C113, 0x0F0F_0F0F), 0xF0F0_F0F0);
    // ori x2, x1, 0x0F0
    assert_eq!(alu_ri(0x0F00_E113, 0x0000_0F00), 0x0000_0FF0);
    // andi x2, x1, 0x0FF
    assert_eq!(alu_ri(0x0FF0_F113, 0x0000_0FAB), 0x0000_00AB);
}

#[test]
fn test_shift_immediates() {
    // slli x2, x1, 4
    assert_eq!(alu_ri(0x0040_9113, 0x0000_00FF), 0x0000_0FF0);
    // srli x2, x1, 4
    assert_eq!(alu_ri(0x0040_D113, 0x8000_0000), 0x0800_0000);
    // srai x2, x1, 4
    assert_eq!(alu_ri(0x4040_D113, 0x8000_0000), 0xF800_0000);
}

#[test]
fn test_slli_reserved_bits_fault() {
    // slli with funct7 = 0b0100000 is not a valid encoding
    let (mut cpu, mut bus) = setup(&[0x4040_9113]);
    assert!(matches!(
        cpu.step(&mut bus),
        Err(EmulatorError::UnsupportedInstruction(0x4040_9113))
    ));
}

#[test]
fn test_add_sub() {
    // add x3, x1, x2
    assert_eq!(alu_rr(0x0020_81B3, 10, 20), 30);
    assert_eq!(alu_rr(0x0020_81B3, u32::MAX, 1), 0);
    // sub x3, x1, x2
    assert_eq!(alu_rr(0x4020_81B3, 10, 20), (-10i32) as u32);
    assert_eq!(alu_rr(0x4020_81B3, 0, 1), u32::MAX);
}

#[test]
fn test_register_logic_and_shifts() {
    // sll x3, x1, x2 (shift amount is low 5 bits of rs2)
    assert_eq!(alu_rr(0x0020_91B3, 1, 33), 2);
    // slt x3, x1, x2
    assert_eq!(alu_rr(0x0020_A1B3, (-1i32) as u32, 1), 1);
    // sltu x3, x1, x2 ((-1) is u32::MAX unsigned)
    assert_eq!(alu_rr(0x0020_B1B3, (-1i32) as u32, 1), 0);
    // xor x3, x1, x2
    assert_eq!(alu_rr(0x0020_C1B3, 0xFF00, 0x0FF0), 0xF0F0);
    // srl x3, x1, x2
    assert_eq!(alu_rr(0x0020_D1B3, 0x8000_0000, 31), 1);
    // sra x3, x1, x2
    assert_eq!(alu_rr(0x4020_D1B3, 0x8000_0000, 31), u32::MAX);
    // or x3, x1, x2
    assert_eq!(alu_rr(0x0020_E1B3, 0xF000, 0x000F), 0xF00F);
    // and x3, x1, x2
    assert_eq!(alu_rr(0x0020_F1B3, 0xFF00, 0x0FF0), 0x0F00);
}

#[test]
fn test_mul_family() {
    // mul x3, x1, x2
    assert_eq!(alu_rr(0x0220_81B3, 7, 6), 42);
    assert_eq!(alu_rr(0x0220_81B3, (-2i32) as u32, 3), (-6i32) as u32);

    // mulh x3, x1, x2: upper 32 bits of signed product
    assert_eq!(alu_rr(0x0220_91B3, (-2i32) as u32, 3), u32::MAX);
    // mulhsu x3, x1, x2: rs1 signed, rs2 unsigned
    assert_eq!(alu_rr(0x0220_A1B3, (-2i32) as u32, 3), u32::MAX);
    // mulhu x3, x1, x2: unsigned; 0xFFFF_FFFE * 3 = 0x2_FFFF_FFFA
    assert_eq!(alu_rr(0x0220_B1B3, 0xFFFF_FFFE, 3), 2);
}

#[test]
fn test_div_truncates_toward_zero() {
    // div x3, x1, x2
    assert_eq!(alu_rr(0x0220_C1B3, (-7i32) as u32, 2), (-3i32) as u32);
    // rem x3, x1, x2
    assert_eq!(alu_rr(0x0220_E1B3, (-7i32) as u32, 2), (-1i32) as u32);
}

#[test]
fn test_div_by_zero_has_no_trap() {
    // div x3, x1, x2 with x2 = 0 yields -1
    assert_eq!(alu_rr(0x0220_C1B3, 42, 0), u32::MAX);
    // divu likewise yields all-ones
    assert_eq!(alu_rr(0x0220_D1B3, 42, 0), u32::MAX);
    // rem/remu by zero yield the dividend
    assert_eq!(alu_rr(0x0220_E1B3, 42, 0), 42);
    assert_eq!(alu_rr(0x0220_F1B3, 42, 0), 42);
}

#[test]
fn test_div_overflow() {
    let min = i32::MIN as u32;
    // i32::MIN / -1 overflows: quotient is the dividend, remainder is 0
    assert_eq!(alu_rr(0x0220_C1B3, min, u32::MAX), min);
    assert_eq!(alu_rr(0x0220_E1B3, min, u32::MAX), 0);
}

#[test]
fn test_divu_remu() {
    assert_eq!(alu_rr(0x0220_D1B3, 0xFFFF_FFFF, 2), 0x7FFF_FFFF);
    assert_eq!(alu_rr(0x0220_F1B3, 0xFFFF_FFFF, 2), 1);
}

#[test]
fn test_invalid_funct7_faults() {
    // add-shaped word with funct7 = 0b1111111
    let (mut cpu, mut bus) = setup(&[0xFE20_81B3]);
    assert!(matches!(
        cpu.step(&mut bus),
        Err(EmulatorError::UnsupportedInstruction(0xFE20_81B3))
    ));
}
