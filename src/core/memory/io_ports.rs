// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 rvpico contributors

//! I/O Port Operations Module
//!
//! This module handles memory-mapped I/O routing for the peripheral
//! window. Three peripheral blocks are implemented:
//!
//! - **IO_BANK0** (0x40028000): GPIO pin function selection and status
//! - **PWM** (0x400A8000): 12 PWM slices plus the global enable register
//! - **TIMER0** (0x400B0000): 64-bit microsecond timer
//!
//! The peripheral is selected by `addr & 0xFFFFC000`. Bits 13:12 of the
//! address select the RP2350 atomic access alias:
//!
//! | Bits 13:12 | Operation            |
//! |------------|----------------------|
//! | 0x0        | normal write         |
//! | 0x1        | XOR on write         |
//! | 0x2        | bitmask set on write |
//! | 0x3        | bitmask clear on write |
//!
//! The register within the block is `addr & 0xFFF`. Accesses to an
//! unimplemented block or register are fatal faults.

use super::Bus;
use crate::core::error::{EmulatorError, Result};

impl Bus {
    /// IO_BANK0 block base address
    pub const IO_BANK0_BASE: u32 = 0x4002_8000;

    /// PWM block base address
    pub const PWM_BASE: u32 = 0x400A_8000;

    /// TIMER0 block base address
    pub const TIMER0_BASE: u32 = 0x400B_0000;

    /// Mask selecting the peripheral block (strips alias and offset bits)
    pub const IO_SELECT_MASK: u32 = 0xFFFF_C000;

    /// Atomic access alias bits within a peripheral block
    pub const IO_ATOMIC_MASK: u32 = 0x0000_3000;

    /// Read from I/O port (32-bit)
    ///
    /// Routes the read to the owning peripheral. Reads ignore the atomic
    /// alias bits; aliased addresses read back the normal register value.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Word-aligned address within the I/O window
    pub(super) fn read_io_port32(&self, paddr: u32) -> Result<u32> {
        let offset = (paddr & 0xFFF) as u16;

        match paddr & Self::IO_SELECT_MASK {
            Self::IO_BANK0_BASE => {
                if let Some(gpio) = &self.gpio {
                    let value = gpio
                        .borrow()
                        .read_register(offset)
                        .ok_or(EmulatorError::UnmappedPeripheral { address: paddr })?;
                    log::trace!("IO_BANK0 read at 0x{:08X} -> 0x{:08X}", paddr, value);
                    Ok(value)
                } else {
                    log::warn!("IO_BANK0 access before GPIO initialized");
                    Ok(0)
                }
            }
            Self::PWM_BASE => {
                if let Some(pwm) = &self.pwm {
                    let value = pwm
                        .borrow()
                        .read_register(offset)
                        .ok_or(EmulatorError::UnmappedPeripheral { address: paddr })?;
                    log::trace!("PWM read at 0x{:08X} -> 0x{:08X}", paddr, value);
                    Ok(value)
                } else {
                    log::warn!("PWM access before PWM initialized");
                    Ok(0)
                }
            }
            Self::TIMER0_BASE => {
                if let Some(timer) = &self.timer {
                    // Timer reads can have side effects (TIMELR latching,
                    // polled-read clock advance), hence borrow_mut.
                    let value = timer
                        .borrow_mut()
                        .read_register(offset)
                        .ok_or(EmulatorError::UnmappedPeripheral { address: paddr })?;
                    log::trace!("TIMER0 read at 0x{:08X} -> 0x{:08X}", paddr, value);
                    Ok(value)
                } else {
                    log::warn!("TIMER0 access before timer initialized");
                    Ok(0)
                }
            }
            _ => Err(EmulatorError::UnmappedPeripheral { address: paddr }),
        }
    }

    /// Write to I/O port (32-bit)
    ///
    /// Applies the atomic alias (XOR/SET/CLR do a read-modify-write of the
    /// target register), then routes the result to the owning peripheral.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Word-aligned address within the I/O window
    /// * `value` - Value to write (or operand for the atomic alias)
    pub(super) fn write_io_port32(&mut self, paddr: u32, value: u32) -> Result<()> {
        let value = match (paddr & Self::IO_ATOMIC_MASK) >> 12 {
            0b00 => value,
            op => {
                let current = self.read_io_port32(paddr & !Self::IO_ATOMIC_MASK)?;
                match op {
                    0b01 => current ^ value,
                    0b10 => current | value,
                    _ => current & !value,
                }
            }
        };

        let offset = (paddr & 0xFFF) as u16;

        match paddr & Self::IO_SELECT_MASK {
            Self::IO_BANK0_BASE => {
                if let Some(gpio) = &self.gpio {
                    log::trace!("IO_BANK0 write at 0x{:08X} <- 0x{:08X}", paddr, value);
                    gpio.borrow_mut()
                        .write_register(offset, value)
                        .ok_or(EmulatorError::UnmappedPeripheral { address: paddr })?;
                } else {
                    log::warn!("IO_BANK0 access before GPIO initialized");
                }
            }
            Self::PWM_BASE => {
                if let Some(pwm) = &self.pwm {
                    log::trace!("PWM write at 0x{:08X} <- 0x{:08X}", paddr, value);
                    pwm.borrow_mut()
                        .write_register(offset, value)
                        .ok_or(EmulatorError::UnmappedPeripheral { address: paddr })?;
                } else {
                    log::warn!("PWM access before PWM initialized");
                }
            }
            Self::TIMER0_BASE => {
                if let Some(timer) = &self.timer {
                    log::trace!("TIMER0 write at 0x{:08X} <- 0x{:08X}", paddr, value);
                    timer
                        .borrow_mut()
                        .write_register(offset, value)
                        .ok_or(EmulatorError::UnmappedPeripheral { address: paddr })?;
                } else {
                    log::warn!("TIMER0 access before timer initialized");
                }
            }
            _ => return Err(EmulatorError::UnmappedPeripheral { address: paddr }),
        }

        Ok(())
    }
}
