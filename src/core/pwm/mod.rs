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

//! PWM controller emulation
//!
//! 12 independent slices, each with two output channels (A and B) and a
//! register block at stride 0x14:
//!
//! | Offset | Register | Description                                  |
//! |--------|----------|----------------------------------------------|
//! | +0x00  | CSR      | Control and status (bit 0 = enable)          |
//! | +0x04  | DIV      | Clock divider, 8.4 fixed point (reset 0x010) |
//! | +0x08  | CTR      | Counter                                      |
//! | +0x0C  | CC       | Compare: level A bits 15:0, level B 31:16    |
//! | +0x10  | TOP      | Counter wrap value (reset 0xFFFF)            |
//!
//! The global `EN` register at 0xF0 aliases the CSR enable bits of all
//! slices, written as a single mask. Compare levels are stored and
//! reported through the snapshot; no waveform is synthesized because no
//! observer consumes one.

use bitflags::bitflags;

bitflags! {
    /// PWM slice control and status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Csr: u32 {
        /// Enable the slice
        const EN = 1 << 0;
        /// Phase-correct (count up then down)
        const PH_CORRECT = 1 << 1;
        /// Invert output A
        const A_INV = 1 << 2;
        /// Invert output B
        const B_INV = 1 << 3;
        /// Retard the phase of the counter by 1 count
        const PH_RET = 1 << 6;
        /// Advance the phase of the counter by 1 count
        const PH_ADV = 1 << 7;
    }
}

/// A single PWM slice
#[derive(Debug, Clone, Copy)]
pub struct PwmSlice {
    /// Control and status register
    pub csr: Csr,
    /// Clock divider (8.4 fixed point)
    pub div: u32,
    /// Counter
    pub ctr: u32,
    /// Counter compare (level A low half, level B high half)
    pub cc: u32,
    /// Counter wrap value
    pub top: u32,
    /// A GPIO pin is currently muxed to this slice
    pub configured: bool,
}

impl Default for PwmSlice {
    fn default() -> Self {
        Self {
            csr: Csr::empty(),
            div: Pwm::DIV_RESET,
            ctr: 0,
            cc: 0,
            top: Pwm::TOP_RESET,
            configured: false,
        }
    }
}

impl PwmSlice {
    /// Slice enabled via CSR or the global EN mask
    pub fn is_enabled(&self) -> bool {
        self.csr.contains(Csr::EN)
    }

    /// Channel A compare level
    pub fn level_a(&self) -> u16 {
        self.cc as u16
    }

    /// Channel B compare level
    pub fn level_b(&self) -> u16 {
        (self.cc >> 16) as u16
    }
}

/// PWM controller with 12 slices
pub struct Pwm {
    slices: [PwmSlice; Self::NUM_SLICES],
}

impl Pwm {
    /// Number of PWM slices
    pub const NUM_SLICES: usize = 12;

    /// Control and status register offset within a slice block
    pub const CHN_CSR: u16 = 0x000;
    /// Divider register offset within a slice block
    pub const CHN_DIV: u16 = 0x004;
    /// Counter register offset within a slice block
    pub const CHN_CTR: u16 = 0x008;
    /// Counter compare register offset within a slice block
    pub const CHN_CC: u16 = 0x00C;
    /// Counter wrap register offset within a slice block
    pub const CHN_TOP: u16 = 0x010;

    /// Offset to the next slice's register block
    pub const SLICE_STRIDE: u16 = 0x014;

    /// Global enable register (aliases the CSR_EN bits of all slices)
    pub const EN: u16 = 0x0F0;

    /// Last per-slice register offset
    const SLICE_END: u16 = Self::NUM_SLICES as u16 * Self::SLICE_STRIDE - 4;

    /// DIV reset value: integer part 1, fractional part 0
    pub const DIV_RESET: u32 = 1 << 4;

    /// TOP reset value
    pub const TOP_RESET: u32 = 0xFFFF;

    /// Create a new PWM controller with all slices at reset
    pub fn new() -> Self {
        Self {
            slices: [PwmSlice::default(); Self::NUM_SLICES],
        }
    }

    /// Reset all slices to power-on state
    pub fn reset(&mut self) {
        self.slices = [PwmSlice::default(); Self::NUM_SLICES];
    }

    /// Read a register in the PWM block
    ///
    /// Returns `None` for offsets outside the implemented register set.
    pub fn read_register(&self, offset: u16) -> Option<u32> {
        match offset {
            0..=Self::SLICE_END => {
                let slice = &self.slices[(offset / Self::SLICE_STRIDE) as usize];
                match offset % Self::SLICE_STRIDE {
                    Self::CHN_CSR => Some(slice.csr.bits()),
                    Self::CHN_DIV => Some(slice.div),
                    Self::CHN_CTR => Some(slice.ctr),
                    Self::CHN_CC => Some(slice.cc),
                    Self::CHN_TOP => Some(slice.top),
                    _ => None,
                }
            }
            Self::EN => Some(self.enabled_mask() as u32),
            _ => None,
        }
    }

    /// Write a register in the PWM block
    ///
    /// Returns `None` for offsets outside the implemented register set.
    pub fn write_register(&mut self, offset: u16, value: u32) -> Option<()> {
        match offset {
            0..=Self::SLICE_END => {
                let slice = &mut self.slices[(offset / Self::SLICE_STRIDE) as usize];
                match offset % Self::SLICE_STRIDE {
                    Self::CHN_CSR => slice.csr = Csr::from_bits_truncate(value),
                    Self::CHN_DIV => slice.div = value & 0xFFF,
                    Self::CHN_CTR => slice.ctr = value & 0xFFFF,
                    Self::CHN_CC => slice.cc = value,
                    Self::CHN_TOP => slice.top = value & 0xFFFF,
                    _ => return None,
                }
                Some(())
            }
            Self::EN => {
                // One bit per slice, written as a single mask
                for (i, slice) in self.slices.iter_mut().enumerate() {
                    slice.csr.set(Csr::EN, value & (1 << i) != 0);
                }
                Some(())
            }
            _ => None,
        }
    }

    /// Bit mask of slices currently enabled
    pub fn enabled_mask(&self) -> u16 {
        let mut mask = 0;
        for (i, slice) in self.slices.iter().enumerate() {
            if slice.is_enabled() {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Bit mask of slices with at least one GPIO pin muxed to them
    pub fn configured_mask(&self) -> u16 {
        let mut mask = 0;
        for (i, slice) in self.slices.iter().enumerate() {
            if slice.configured {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Replace the configured flags from a GPIO attachment mask
    ///
    /// Called by the GPIO controller whenever a pin function changes.
    pub fn set_configured_mask(&mut self, mask: u16) {
        for (i, slice) in self.slices.iter_mut().enumerate() {
            slice.configured = mask & (1 << i) != 0;
        }
    }

    /// Access a slice by index (snapshot support)
    pub fn slice(&self, index: usize) -> &PwmSlice {
        &self.slices[index]
    }

    /// All slices (snapshot support)
    pub fn slices(&self) -> &[PwmSlice; Self::NUM_SLICES] {
        &self.slices
    }
}

impl Default for Pwm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_values() {
        let pwm = Pwm::new();
        assert_eq!(pwm.read_register(Pwm::CHN_DIV), Some(Pwm::DIV_RESET));
        assert_eq!(pwm.read_register(Pwm::CHN_TOP), Some(Pwm::TOP_RESET));
        assert_eq!(pwm.read_register(Pwm::EN), Some(0));
    }

    #[test]
    fn test_cc_levels() {
        let mut pwm = Pwm::new();
        // Slice 0: level A = 1, level B = 3
        pwm.write_register(Pwm::CHN_CC, (3 << 16) | 1).unwrap();
        assert_eq!(pwm.slice(0).level_a(), 1);
        assert_eq!(pwm.slice(0).level_b(), 3);
    }

    #[test]
    fn test_slice_addressing() {
        let mut pwm = Pwm::new();
        // Slice 2 CC lives at 2*0x14 + 0xC = 0x34
        pwm.write_register(0x34, 0x1234_5678).unwrap();
        assert_eq!(pwm.slice(2).cc, 0x1234_5678);
        assert_eq!(pwm.slice(0).cc, 0);
        assert_eq!(pwm.read_register(0x34), Some(0x1234_5678));
    }

    #[test]
    fn test_global_en_mask() {
        let mut pwm = Pwm::new();
        pwm.write_register(Pwm::EN, 0xFFFF_FFFF).unwrap();
        assert_eq!(pwm.enabled_mask(), 0x0FFF);
        assert!(pwm.slice(0).is_enabled());
        assert!(pwm.slice(11).is_enabled());

        // Mask writes also disable
        pwm.write_register(Pwm::EN, 0b101).unwrap();
        assert_eq!(pwm.enabled_mask(), 0b101);
    }

    #[test]
    fn test_csr_enable_bit() {
        let mut pwm = Pwm::new();
        pwm.write_register(Pwm::CHN_CSR, 1).unwrap();
        assert!(pwm.slice(0).is_enabled());
        assert_eq!(pwm.read_register(Pwm::EN), Some(1));
    }

    #[test]
    fn test_unmapped_offset() {
        let mut pwm = Pwm::new();
        assert_eq!(pwm.read_register(0x200), None);
        assert_eq!(pwm.write_register(0x200, 0), None);
    }
}
