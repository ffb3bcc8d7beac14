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

//! Memory bus implementation
//!
//! The Bus is the central component for all memory operations in the
//! emulator. It routes read/write operations to SRAM or to the
//! memory-mapped peripheral window.
//!
//! # Memory Map
//!
//! | Address Range          | Region       | Size   | Access |
//! |------------------------|--------------|--------|--------|
//! | 0x20000000-0x20081FFF  | SRAM         | 520KB  | R/W    |
//! | 0x40000000-0x400FFFFF  | APB I/O      | 1MB    | R/W    |
//!
//! Within the I/O window, bits 13:12 of the address select the RP2350
//! atomic access alias (normal / XOR / SET / CLR) and the peripheral is
//! selected by `addr & 0xFFFFC000` (see `io_ports`).
//!
//! # Example
//!
//! ```
//! use rvpico::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//! bus.write32(0x20000000, 0x12345678).unwrap();
//! assert_eq!(bus.read32(0x20000000).unwrap(), 0x12345678);
//! ```

use crate::core::error::{EmulatorError, Result};
use crate::core::gpio::GpioBank;
use crate::core::pwm::Pwm;
use crate::core::timer::Timer;
use std::cell::RefCell;
use std::rc::Rc;

/// Memory bus managing all memory accesses
///
/// The Bus owns the SRAM image and holds references to the peripherals
/// reachable through the I/O window. Sub-word accesses to SRAM are
/// byte-granular with no alignment requirement; sub-word accesses to the
/// I/O window are widened to 32-bit register accesses.
pub struct Bus {
    /// Main SRAM (520KB)
    ///
    /// Address range: 0x20000000-0x20081FFF
    sram: Vec<u8>,

    /// GPIO controller (IO_BANK0), wired by the System
    pub(super) gpio: Option<Rc<RefCell<GpioBank>>>,

    /// PWM controller, wired by the System
    pub(super) pwm: Option<Rc<RefCell<Pwm>>>,

    /// Timer (TIMER0), wired by the System
    pub(super) timer: Option<Rc<RefCell<Timer>>>,
}

/// Memory region identification
///
/// Used to identify which memory region an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Main SRAM (520KB)
    Sram,
    /// Memory-mapped peripheral window
    Io,
    /// Unmapped region
    Unmapped,
}

mod io_ports;

impl Bus {
    /// SRAM size (520KB)
    pub const SRAM_SIZE: usize = 520 * 1024;

    /// SRAM address range
    pub const SRAM_START: u32 = 0x2000_0000;
    pub const SRAM_END: u32 = Self::SRAM_START + Self::SRAM_SIZE as u32 - 1;

    /// APB peripheral window address range
    pub const IO_START: u32 = 0x4000_0000;
    pub const IO_END: u32 = 0x400F_FFFF;

    /// Create a new Bus instance
    ///
    /// Initializes SRAM with zeros. Peripherals are attached later by the
    /// System via `set_gpio`/`set_pwm`/`set_timer`.
    ///
    /// # Example
    ///
    /// ```
    /// use rvpico::core::memory::Bus;
    ///
    /// let bus = Bus::new();
    /// ```
    pub fn new() -> Self {
        Self {
            sram: vec![0u8; Self::SRAM_SIZE],
            gpio: None,
            pwm: None,
            timer: None,
        }
    }

    /// Reset the bus to initial state
    ///
    /// Clears SRAM to zero, simulating a power-cycle. Attached peripherals
    /// are reset by the System, not here.
    pub fn reset(&mut self) {
        self.sram.fill(0);
    }

    /// Attach the GPIO controller
    pub fn set_gpio(&mut self, gpio: Rc<RefCell<GpioBank>>) {
        self.gpio = Some(gpio);
    }

    /// Attach the PWM controller
    pub fn set_pwm(&mut self, pwm: Rc<RefCell<Pwm>>) {
        self.pwm = Some(pwm);
    }

    /// Attach the timer
    pub fn set_timer(&mut self, timer: Rc<RefCell<Timer>>) {
        self.timer = Some(timer);
    }

    /// Copy an image into SRAM starting at `SRAM_START`
    ///
    /// The caller (the loader) has already validated the image size.
    pub(super) fn fill_sram(&mut self, data: &[u8]) {
        self.sram[..data.len()].copy_from_slice(data);
    }

    /// Identify memory region for an address
    ///
    /// # Example
    ///
    /// ```
    /// use rvpico::core::memory::{Bus, MemoryRegion};
    ///
    /// let bus = Bus::new();
    ///
    /// assert_eq!(bus.identify_region(0x20000000), MemoryRegion::Sram);
    /// assert_eq!(bus.identify_region(0x40028000), MemoryRegion::Io);
    /// assert_eq!(bus.identify_region(0x00000000), MemoryRegion::Unmapped);
    /// ```
    pub fn identify_region(&self, addr: u32) -> MemoryRegion {
        if (Self::SRAM_START..=Self::SRAM_END).contains(&addr) {
            MemoryRegion::Sram
        } else if (Self::IO_START..=Self::IO_END).contains(&addr) {
            MemoryRegion::Io
        } else {
            MemoryRegion::Unmapped
        }
    }

    /// Bounds-checked SRAM offset for an access of `len` bytes
    #[inline(always)]
    fn sram_offset(&self, addr: u32, len: usize) -> Result<usize> {
        let offset = (addr - Self::SRAM_START) as usize;
        if offset + len > Self::SRAM_SIZE {
            return Err(EmulatorError::BusFault {
                address: addr,
                width: len as u8,
            });
        }
        Ok(offset)
    }

    /// Read 8-bit value from memory
    ///
    /// 8-bit reads do not require alignment. Reads from the I/O window are
    /// widened to a 32-bit register read and the addressed byte lane is
    /// extracted.
    ///
    /// # Example
    ///
    /// ```
    /// use rvpico::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// bus.write8(0x20000000, 0x42).unwrap();
    /// assert_eq!(bus.read8(0x20000000).unwrap(), 0x42);
    /// ```
    pub fn read8(&self, addr: u32) -> Result<u8> {
        match self.identify_region(addr) {
            MemoryRegion::Sram => {
                let offset = self.sram_offset(addr, 1)?;
                Ok(self.sram[offset])
            }
            MemoryRegion::Io => {
                let word = self.read_io_port32(addr & !0x3)?;
                Ok((word >> ((addr & 0x3) * 8)) as u8)
            }
            MemoryRegion::Unmapped => Err(EmulatorError::BusFault {
                address: addr,
                width: 1,
            }),
        }
    }

    /// Read 16-bit value from memory (little-endian)
    ///
    /// SRAM reads are byte-granular with no alignment requirement.
    pub fn read16(&self, addr: u32) -> Result<u16> {
        match self.identify_region(addr) {
            MemoryRegion::Sram => {
                let offset = self.sram_offset(addr, 2)?;
                let bytes = [self.sram[offset], self.sram[offset + 1]];
                Ok(u16::from_le_bytes(bytes))
            }
            MemoryRegion::Io => {
                let word = self.read_io_port32(addr & !0x3)?;
                Ok((word >> ((addr & 0x3) * 8)) as u16)
            }
            MemoryRegion::Unmapped => Err(EmulatorError::BusFault {
                address: addr,
                width: 2,
            }),
        }
    }

    /// Read 32-bit value from memory (little-endian)
    ///
    /// SRAM reads are byte-granular with no alignment requirement. I/O
    /// reads are routed to the owning peripheral; some peripheral reads
    /// have side effects (timer latching).
    ///
    /// # Example
    ///
    /// ```
    /// use rvpico::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// bus.write32(0x20000000, 0x12345678).unwrap();
    /// assert_eq!(bus.read32(0x20000000).unwrap(), 0x12345678);
    /// ```
    pub fn read32(&self, addr: u32) -> Result<u32> {
        match self.identify_region(addr) {
            MemoryRegion::Sram => {
                let offset = self.sram_offset(addr, 4)?;
                let bytes = [
                    self.sram[offset],
                    self.sram[offset + 1],
                    self.sram[offset + 2],
                    self.sram[offset + 3],
                ];
                Ok(u32::from_le_bytes(bytes))
            }
            MemoryRegion::Io => self.read_io_port32(addr & !0x3),
            MemoryRegion::Unmapped => Err(EmulatorError::BusFault {
                address: addr,
                width: 4,
            }),
        }
    }

    /// Write 8-bit value to memory
    ///
    /// Writes to the I/O window are widened to a 32-bit register
    /// read-modify-write of the addressed byte lane, as the APB bridge
    /// does for sub-word stores. Atomic alias bits are ignored on the
    /// widened path.
    pub fn write8(&mut self, addr: u32, value: u8) -> Result<()> {
        match self.identify_region(addr) {
            MemoryRegion::Sram => {
                let offset = self.sram_offset(addr, 1)?;
                self.sram[offset] = value;
                Ok(())
            }
            MemoryRegion::Io => {
                let word_addr = addr & !0x3 & !Self::IO_ATOMIC_MASK;
                let shift = (addr & 0x3) * 8;
                let current = self.read_io_port32(word_addr)?;
                let merged = (current & !(0xFF << shift)) | ((value as u32) << shift);
                self.write_io_port32(word_addr, merged)
            }
            MemoryRegion::Unmapped => Err(EmulatorError::BusFault {
                address: addr,
                width: 1,
            }),
        }
    }

    /// Write 16-bit value to memory (little-endian)
    pub fn write16(&mut self, addr: u32, value: u16) -> Result<()> {
        match self.identify_region(addr) {
            MemoryRegion::Sram => {
                let offset = self.sram_offset(addr, 2)?;
                self.sram[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
                Ok(())
            }
            MemoryRegion::Io => {
                let word_addr = addr & !0x3 & !Self::IO_ATOMIC_MASK;
                let shift = (addr & 0x2) * 8;
                let current = self.read_io_port32(word_addr)?;
                let merged = (current & !(0xFFFF << shift)) | ((value as u32) << shift);
                self.write_io_port32(word_addr, merged)
            }
            MemoryRegion::Unmapped => Err(EmulatorError::BusFault {
                address: addr,
                width: 2,
            }),
        }
    }

    /// Write 32-bit value to memory (little-endian)
    ///
    /// I/O writes are routed to the owning peripheral after the atomic
    /// alias (normal / XOR / SET / CLR) has been applied.
    pub fn write32(&mut self, addr: u32, value: u32) -> Result<()> {
        match self.identify_region(addr) {
            MemoryRegion::Sram => {
                let offset = self.sram_offset(addr, 4)?;
                self.sram[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
                Ok(())
            }
            MemoryRegion::Io => self.write_io_port32(addr & !0x3, value),
            MemoryRegion::Unmapped => Err(EmulatorError::BusFault {
                address: addr,
                width: 4,
            }),
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
