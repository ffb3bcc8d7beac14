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
use crate::core::cpu::Cpu;
use proptest::prelude::*;

/// Execute one R-type ALU word with x1/x2 preloaded and return x3
fn alu_rr(word: u32, rs1: u32, rs2: u32) -> u32 {
    let (mut cpu, mut bus) = setup(&[word]);
    cpu.set_reg(1, rs1);
    cpu.set_reg(2, rs2);
    step(&mut cpu, &mut bus);
    cpu.reg(3)
}

proptest! {
    #[test]
    fn prop_x0_stays_zero(value in any::<u32>()) {
        let mut cpu = Cpu::new();
        cpu.set_reg(0, value);
        prop_assert_eq!(cpu.reg(0), 0);
    }

    #[test]
    fn prop_register_roundtrip(index in 1u8..32, value in any::<u32>()) {
        let mut cpu = Cpu::new();
        cpu.set_reg(index, value);
        prop_assert_eq!(cpu.reg(index), value);
    }

    #[test]
    fn prop_add_wraps(a in any::<u32>(), b in any::<u32>()) {
        // add x3, x1, x2
        prop_assert_eq!(alu_rr(0x0020_81B3, a, b), a.wrapping_add(b));
    }

    #[test]
    fn prop_sub_wraps(a in any::<u32>(), b in any::<u32>()) {
        // sub x3, x1, x2
        prop_assert_eq!(alu_rr(0x4020_81B3, a, b), a.wrapping_sub(b));
    }

    #[test]
    fn prop_sltu_matches_comparison(a in any::<u32>(), b in any::<u32>()) {
        // sltu x3, x1, x2
        prop_assert_eq!(alu_rr(0x0020_B1B3, a, b), (a < b) as u32);
    }

    #[test]
    fn prop_mul_never_traps(a in any::<u32>(), b in any::<u32>()) {
        // mul x3, x1, x2
        prop_assert_eq!(alu_rr(0x0220_81B3, a, b), a.wrapping_mul(b));
    }

    #[test]
    fn prop_div_rem_identity(a in any::<u32>(), b in 1u32..) {
        // For non-zero divisors, divu/remu satisfy a = q*b + r
        let q = alu_rr(0x0220_D1B3, a, b); // divu
        let r = alu_rr(0x0220_F1B3, a, b); // remu
        prop_assert_eq!(q.wrapping_mul(b).wrapping_add(r), a);
    }
}
