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

//! Timer (TIMER0) emulation
//!
//! A 64-bit monotonically increasing microsecond counter with the
//! register layout of the hardware timer:
//!
//! | Offset | Register | Description                                     |
//! |--------|----------|-------------------------------------------------|
//! | 0x00   | TIMEHW   | Write bits 63:32 of time                        |
//! | 0x04   | TIMELW   | Write bits 31:0 of time                         |
//! | 0x08   | TIMEHR   | Read bits 63:32, latched by a TIMELR read       |
//! | 0x0C   | TIMELR   | Read bits 31:0, latches the high half           |
//! | 0x24   | TIMERAWH | Raw read of bits 63:32                          |
//! | 0x28   | TIMERAWL | Raw read of bits 31:0                           |
//! | 0x30   | PAUSE    | Bit 0 pauses the counter                        |
//! | 0x34   | LOCKED   | Bit 0 disables write access (one-way)           |
//!
//! The counter advances with retired instruction cycles at a
//! configurable cycles-per-microsecond ratio. In addition, each low-half
//! read (`TIMELR`/`TIMERAWL`) advances the counter one tick so a guest
//! polling loop always makes forward progress against the virtual clock,
//! regardless of the cycle ratio.

/// TIMEHW register offset: write to bits 63:32 of time
pub const TIMEHW: u16 = 0x00;
/// TIMELW register offset: write to bits 31:0 of time
pub const TIMELW: u16 = 0x04;
/// TIMEHR register offset: latched read of bits 63:32 of time
pub const TIMEHR: u16 = 0x08;
/// TIMELR register offset: read of bits 31:0 of time, latches TIMEHR
pub const TIMELR: u16 = 0x0C;
/// TIMERAWH register offset: raw read of bits 63:32 of time
pub const TIMERAWH: u16 = 0x24;
/// TIMERAWL register offset: raw read of bits 31:0 of time
pub const TIMERAWL: u16 = 0x28;
/// PAUSE register offset: set bit 0 high to pause the timer
pub const PAUSE: u16 = 0x30;
/// LOCKED register offset: set bit 0 to disable write access to the timer
pub const LOCKED: u16 = 0x34;

/// Microsecond timer (TIMER0)
pub struct Timer {
    /// Current time in microseconds
    counter: u64,

    /// High half latched by the last TIMELR read
    latched_high: u32,

    /// Counter paused (PAUSE bit 0)
    is_paused: bool,

    /// Write access disabled (LOCKED bit 0, cannot be cleared once set)
    is_locked: bool,

    /// CPU cycles per counted microsecond
    cycles_per_us: u64,

    /// Cycles accumulated toward the next microsecond
    cycle_acc: u64,
}

impl Timer {
    /// Create a new timer counting at `cycles_per_us` CPU cycles per tick
    ///
    /// A ratio of 0 is treated as 1.
    pub fn new(cycles_per_us: u64) -> Self {
        Self {
            counter: 0,
            latched_high: 0,
            is_paused: false,
            is_locked: false,
            cycles_per_us: cycles_per_us.max(1),
            cycle_acc: 0,
        }
    }

    /// Reset the timer to power-on state, keeping the configured ratio
    pub fn reset(&mut self) {
        self.counter = 0;
        self.latched_high = 0;
        self.is_paused = false;
        self.is_locked = false;
        self.cycle_acc = 0;
    }

    /// Current counter value in microseconds
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Advance the virtual clock by retired CPU cycles
    ///
    /// Called by the System once per executed instruction.
    pub fn tick(&mut self, cycles: u64) {
        if self.is_paused {
            return;
        }
        self.cycle_acc += cycles;
        self.counter += self.cycle_acc / self.cycles_per_us;
        self.cycle_acc %= self.cycles_per_us;
    }

    /// Advance the counter by at least `us` microseconds
    ///
    /// This is the host-side busy-wait: the session is single-threaded, so
    /// instead of spinning, the wait completes by moving the virtual clock
    /// forward and returning synchronously. Advances even while paused,
    /// since a real spin would otherwise never terminate.
    pub fn busy_wait_us(&mut self, us: u64) {
        self.counter += us;
    }

    /// Read a timer register
    ///
    /// `TIMELR` and `TIMERAWL` have side effects: they latch/advance (see
    /// module docs). Returns `None` for unimplemented offsets.
    pub fn read_register(&mut self, offset: u16) -> Option<u32> {
        match offset {
            TIMEHR => Some(self.latched_high),
            TIMELR => {
                self.advance_on_read();
                self.latched_high = (self.counter >> 32) as u32;
                Some(self.counter as u32)
            }
            TIMERAWH => Some((self.counter >> 32) as u32),
            TIMERAWL => {
                self.advance_on_read();
                Some(self.counter as u32)
            }
            PAUSE => Some(self.is_paused as u32),
            LOCKED => Some(self.is_locked as u32),
            TIMEHW | TIMELW => Some(0), // write-only
            _ => None,
        }
    }

    /// Write a timer register
    ///
    /// All writes are ignored once LOCKED is set. Returns `None` for
    /// unimplemented offsets.
    pub fn write_register(&mut self, offset: u16, value: u32) -> Option<()> {
        if self.is_locked {
            return Some(());
        }

        match offset {
            TIMEHW => {
                self.counter = (self.counter & 0x0000_0000_FFFF_FFFF) | ((value as u64) << 32);
            }
            TIMELW => {
                self.counter = (self.counter & 0xFFFF_FFFF_0000_0000) | (value as u64);
            }
            PAUSE => self.is_paused = value & 1 != 0,
            LOCKED => self.is_locked = value & 1 != 0,
            TIMEHR | TIMELR | TIMERAWH | TIMERAWL => {} // read only
            _ => return None,
        }
        Some(())
    }

    /// One extra tick per polled read so guest wait loops terminate
    fn advance_on_read(&mut self) {
        if !self.is_paused {
            self.counter += 1;
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(1)
    }
}
