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

//! GPIO controller (IO_BANK0) emulation
//!
//! Each of the 30 user GPIO pins has a pair of registers at stride 8:
//!
//! | Offset      | Register    | Access |
//! |-------------|-------------|--------|
//! | pin*8 + 0x0 | GPIO_STATUS | R      |
//! | pin*8 + 0x4 | GPIO_CTRL   | R/W    |
//!
//! `GPIO_CTRL` bits 4:0 select the pin function. Selecting the PWM
//! function attaches the pin to its PWM slice (`(pin / 2) % 12`, even
//! pins are channel A, odd pins channel B) and marks that slice as
//! configured for level writes.

use crate::core::pwm::Pwm;
use std::cell::RefCell;
use std::rc::Rc;

/// Pin function selected by GPIO_CTRL bits 4:0
///
/// Only the function values the peripheral bank models are named; any
/// other funcsel value reads back as written but routes nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FunctionSelect {
    Spi,
    Uart,
    I2c,
    Pwm,
    Sio,
    /// Reset state: pin connected to nothing
    None,
}

impl FunctionSelect {
    /// Decode the funcsel field of a GPIO_CTRL value
    pub fn from_ctrl(ctrl: u32) -> Self {
        match ctrl & 0x1F {
            1 => FunctionSelect::Spi,
            2 => FunctionSelect::Uart,
            3 => FunctionSelect::I2c,
            4 => FunctionSelect::Pwm,
            5 => FunctionSelect::Sio,
            _ => FunctionSelect::None,
        }
    }
}

/// A single GPIO pin
#[derive(Debug, Clone, Copy)]
struct Pin {
    /// Raw GPIO_CTRL register value
    ctrl: u32,
}

impl Default for Pin {
    fn default() -> Self {
        Self {
            ctrl: GpioBank::CTRL_RESET,
        }
    }
}

/// GPIO controller (IO_BANK0)
///
/// Owns the per-pin control registers and pushes the set of
/// PWM-attached slices to the PWM controller whenever a pin function
/// changes.
pub struct GpioBank {
    pins: [Pin; Self::NUM_PINS],

    /// PWM controller, wired by the System
    pwm: Option<Rc<RefCell<Pwm>>>,
}

impl GpioBank {
    /// Number of user GPIO pins
    pub const NUM_PINS: usize = 30;

    /// GPIO_STATUS register offset within a pin's register pair
    pub const GPIO_STATUS: u16 = 0x00;

    /// GPIO_CTRL register offset within a pin's register pair
    pub const GPIO_CTRL: u16 = 0x04;

    /// Stride between consecutive pins' register pairs
    pub const GPIO_STEP: u16 = 0x08;

    /// Last valid register offset in the block
    const GPIO_END: u16 = Self::NUM_PINS as u16 * Self::GPIO_STEP - 4;

    /// GPIO_CTRL reset value (funcsel = none)
    pub const CTRL_RESET: u32 = 0x1F;

    /// Create a new GPIO controller with all pins at reset (funcsel none)
    pub fn new() -> Self {
        Self {
            pins: [Pin::default(); Self::NUM_PINS],
            pwm: None,
        }
    }

    /// Reset all pins to funcsel none and clear PWM attachments
    pub fn reset(&mut self) {
        self.pins = [Pin::default(); Self::NUM_PINS];
        self.sync_pwm_attachment();
    }

    /// Attach the PWM controller for funcsel-driven slice configuration
    pub fn set_pwm(&mut self, pwm: Rc<RefCell<Pwm>>) {
        self.pwm = Some(pwm);
    }

    /// Read a register in the IO_BANK0 block
    ///
    /// Returns `None` for offsets outside the implemented register set.
    pub fn read_register(&self, offset: u16) -> Option<u32> {
        if offset > Self::GPIO_END {
            return None;
        }
        let index = (offset / Self::GPIO_STEP) as usize;

        match offset % Self::GPIO_STEP {
            Self::GPIO_STATUS => Some(0), // signal observation not modeled
            Self::GPIO_CTRL => Some(self.pins[index].ctrl),
            _ => None,
        }
    }

    /// Write a register in the IO_BANK0 block
    ///
    /// GPIO_STATUS is read-only; writes are ignored. Returns `None` for
    /// offsets outside the implemented register set.
    pub fn write_register(&mut self, offset: u16, value: u32) -> Option<()> {
        if offset > Self::GPIO_END {
            return None;
        }
        let index = (offset / Self::GPIO_STEP) as usize;

        match offset % Self::GPIO_STEP {
            Self::GPIO_STATUS => Some(()), // read only
            Self::GPIO_CTRL => {
                self.update_pin_ctrl(index, value);
                Some(())
            }
            _ => None,
        }
    }

    /// Overwrite a pin's CTRL register and re-sync PWM attachments
    ///
    /// A pin has exactly one function; a write replaces the previous
    /// selection entirely.
    pub fn update_pin_ctrl(&mut self, index: usize, value: u32) {
        self.pins[index].ctrl = value;
        log::debug!(
            "GPIO{} funcsel -> {:?}",
            index,
            FunctionSelect::from_ctrl(value)
        );
        self.sync_pwm_attachment();
    }

    /// Function currently selected on a pin
    pub fn pin_function(&self, index: usize) -> FunctionSelect {
        FunctionSelect::from_ctrl(self.pins[index].ctrl)
    }

    /// PWM slice a pin maps to
    #[inline(always)]
    pub fn pin_to_slice(pin: usize) -> usize {
        (pin / 2) % Pwm::NUM_SLICES
    }

    /// Function table for all pins (snapshot support)
    pub fn function_table(&self) -> Vec<FunctionSelect> {
        self.pins
            .iter()
            .map(|p| FunctionSelect::from_ctrl(p.ctrl))
            .collect()
    }

    /// Recompute which PWM slices have at least one pin muxed to them
    /// and push the mask to the PWM controller
    fn sync_pwm_attachment(&mut self) {
        let Some(pwm) = &self.pwm else {
            return;
        };

        let mut mask: u16 = 0;
        for (pin, p) in self.pins.iter().enumerate() {
            if FunctionSelect::from_ctrl(p.ctrl) == FunctionSelect::Pwm {
                mask |= 1 << Self::pin_to_slice(pin);
            }
        }
        pwm.borrow_mut().set_configured_mask(mask);
    }
}

impl Default for GpioBank {
    fn default() -> Self {
        Self::new()
    }
}
