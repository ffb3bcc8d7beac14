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

//! System integration module
//!
//! This module ties together all emulator components (CPU, memory bus,
//! GPIO, PWM, timer) into one execution session and provides the
//! run-to-halt / single-step control surface.

use super::config::EmulatorConfig;
use super::cpu::{Cpu, CpuState};
use super::error::{EmulatorError, Result};
use super::gpio::GpioBank;
use super::loader::Image;
use super::memory::Bus;
use super::pwm::Pwm;
use super::snapshot::Snapshot;
use super::timer::Timer;
use std::cell::RefCell;
use std::rc::Rc;

/// What stopped the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FaultKind {
    /// Access outside any mapped region
    BusFault { address: u32 },
    /// Access to an unimplemented peripheral block or register
    UnmappedPeripheral { address: u32 },
    /// Encoding outside the implemented instruction subset
    UnsupportedInstruction { opcode: u32 },
}

/// A fatal fault, pinned to the instruction that caused it
///
/// Faults are not recoverable within a session; `System::reset` recreates
/// power-on state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Fault {
    pub kind: FaultKind,
    /// Address of the faulting instruction
    pub pc: u32,
}

impl Fault {
    fn from_error(err: &EmulatorError, pc: u32) -> Self {
        let kind = match err {
            EmulatorError::BusFault { address, .. } => FaultKind::BusFault { address: *address },
            EmulatorError::UnmappedPeripheral { address } => {
                FaultKind::UnmappedPeripheral { address: *address }
            }
            EmulatorError::UnsupportedInstruction(opcode) => {
                FaultKind::UnsupportedInstruction { opcode: *opcode }
            }
            // Load and config errors never reach the execution path
            _ => FaultKind::BusFault { address: pc },
        };
        Self { kind, pc }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FaultKind::BusFault { address } => {
                write!(f, "bus fault at 0x{:08X} (PC=0x{:08X})", address, self.pc)
            }
            FaultKind::UnmappedPeripheral { address } => write!(
                f,
                "unimplemented peripheral register 0x{:08X} (PC=0x{:08X})",
                address, self.pc
            ),
            FaultKind::UnsupportedInstruction { opcode } => write!(
                f,
                "unsupported instruction 0x{:08X} (PC=0x{:08X})",
                opcode, self.pc
            ),
        }
    }
}

/// Result of a bounded `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program executed EBREAK
    Halted { cycles: u64 },
    /// A fatal fault stopped the session
    Faulted(Fault),
    /// The cycle cap was reached with the program still running;
    /// partial state is intact and inspectable
    CycleLimitExceeded { cycles: u64 },
}

/// Result of a single `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    Halted,
    Faulted(Fault),
}

/// Microcontroller system: one CPU, one bus, one peripheral bank
///
/// Sessions are fully independent; nothing is shared between two
/// `System` instances, so tests can run them in parallel.
///
/// # Example
/// ```
/// use rvpico::core::system::{RunOutcome, System};
///
/// let mut system = System::new();
/// // An image that is just EBREAK halts immediately.
/// system.load_image(&0x00100073u32.to_le_bytes(), 0x2000_0000).unwrap();
/// assert!(matches!(system.run(10), RunOutcome::Halted { .. }));
/// ```
pub struct System {
    /// CPU instance
    cpu: Cpu,
    /// Memory bus
    bus: Bus,
    /// GPIO controller (shared via Rc<RefCell> for memory-mapped access)
    gpio: Rc<RefCell<GpioBank>>,
    /// PWM controller (shared via Rc<RefCell> for memory-mapped access)
    pwm: Rc<RefCell<Pwm>>,
    /// Timer (shared via Rc<RefCell> for memory-mapped access)
    timer: Rc<RefCell<Timer>>,
    /// Total cycles executed
    cycles: u64,
    /// First fault of the session, reported by every later step
    fault: Option<Fault>,
}

impl System {
    /// Create a new System with default configuration
    pub fn new() -> Self {
        Self::with_config(&EmulatorConfig::default())
    }

    /// Create a new System instance
    ///
    /// Initializes all hardware components to their reset state and sets
    /// up the memory-mapped I/O connections between them.
    pub fn with_config(config: &EmulatorConfig) -> Self {
        let gpio = Rc::new(RefCell::new(GpioBank::new()));
        let pwm = Rc::new(RefCell::new(Pwm::new()));
        let timer = Rc::new(RefCell::new(Timer::new(config.cycles_per_us)));

        // GPIO funcsel changes configure PWM slices
        gpio.borrow_mut().set_pwm(pwm.clone());

        // Connect peripherals to the bus for memory-mapped I/O
        let mut bus = Bus::new();
        bus.set_gpio(gpio.clone());
        bus.set_pwm(pwm.clone());
        bus.set_timer(timer.clone());

        log::info!("System: all components initialized");

        Self {
            cpu: Cpu::new(),
            bus,
            gpio,
            pwm,
            timer,
            cycles: 0,
            fault: None,
        }
    }

    /// Reset the system to power-on state
    ///
    /// Clears SRAM, registers, peripherals, cycle count and any recorded
    /// fault. The timer keeps its configured cycle ratio.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.gpio.borrow_mut().reset();
        self.pwm.borrow_mut().reset();
        self.timer.borrow_mut().reset();
        self.cycles = 0;
        self.fault = None;
    }

    /// Load a machine-code image into SRAM and point the PC at `entry`
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw little-endian machine code
    /// * `entry` - Absolute entry address; must fall inside the image
    ///
    /// # Errors
    ///
    /// - `ImageTooLarge` if the image does not fit in SRAM
    /// - `InvalidEntryAddress` if `entry` is outside the image's mapped range
    pub fn load_image(&mut self, bytes: &[u8], entry: u32) -> Result<()> {
        let image = Image::from_bytes(bytes, entry)?;
        self.load(&image);
        Ok(())
    }

    /// Load a validated image
    pub fn load(&mut self, image: &Image) {
        self.bus.fill_sram(image.data());
        self.cpu.set_pc(image.entry());
        log::info!(
            "Loaded {} byte image, entry 0x{:08X}",
            image.data().len(),
            image.entry()
        );
    }

    /// Execute one instruction
    ///
    /// Once the session has halted or faulted, further steps are no-ops
    /// reporting the same outcome.
    pub fn step(&mut self) -> StepOutcome {
        match self.cpu.state() {
            CpuState::Halted => return StepOutcome::Halted,
            CpuState::Faulted => {
                // Reported fault persists for the rest of the session
                return StepOutcome::Faulted(self.fault.unwrap_or(Fault {
                    kind: FaultKind::BusFault {
                        address: self.cpu.pc(),
                    },
                    pc: self.cpu.pc(),
                }));
            }
            CpuState::Running => {}
        }

        match self.cpu.step(&mut self.bus) {
            Ok(state) => {
                self.cycles += 1;
                self.timer.borrow_mut().tick(1);
                match state {
                    CpuState::Halted => StepOutcome::Halted,
                    _ => StepOutcome::Running,
                }
            }
            Err(err) => {
                let fault = Fault::from_error(&err, self.cpu.pc());
                self.fault = Some(fault);
                StepOutcome::Faulted(fault)
            }
        }
    }

    /// Run until halt, fault, or the cycle cap
    ///
    /// The cap is mandatory: a program that never halts terminates the
    /// call with `CycleLimitExceeded` and all partial state intact.
    ///
    /// # Arguments
    ///
    /// * `max_cycles` - Maximum number of instructions to execute in this call
    pub fn run(&mut self, max_cycles: u64) -> RunOutcome {
        for _ in 0..max_cycles {
            match self.step() {
                StepOutcome::Running => {}
                StepOutcome::Halted => {
                    log::info!("Halted after {} cycles", self.cycles);
                    return RunOutcome::Halted {
                        cycles: self.cycles,
                    };
                }
                StepOutcome::Faulted(fault) => {
                    log::error!("{}", fault);
                    return RunOutcome::Faulted(fault);
                }
            }
        }

        log::info!("Cycle limit of {} reached", max_cycles);
        RunOutcome::CycleLimitExceeded {
            cycles: self.cycles,
        }
    }

    /// Advance the virtual clock by at least `us` microseconds
    ///
    /// Host-side busy wait: completes synchronously by moving the timer
    /// forward instead of spinning.
    pub fn busy_wait_us(&mut self, us: u64) {
        self.timer.borrow_mut().busy_wait_us(us);
    }

    /// Capture a read-only snapshot of the full machine state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.cpu,
            self.cycles,
            &self.gpio.borrow(),
            &self.pwm.borrow(),
            &self.timer.borrow(),
        )
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Get total cycles executed
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Get reference to CPU
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Get mutable reference to CPU
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Get reference to memory bus
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Get mutable reference to memory bus
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Get reference to the GPIO controller
    pub fn gpio(&self) -> Rc<RefCell<GpioBank>> {
        Rc::clone(&self.gpio)
    }

    /// Get reference to the PWM controller
    pub fn pwm(&self) -> Rc<RefCell<Pwm>> {
        Rc::clone(&self.pwm)
    }

    /// Get reference to the timer
    pub fn timer(&self) -> Rc<RefCell<Timer>> {
        Rc::clone(&self.timer)
    }

    /// Dump CPU registers and peripheral state for diagnostics
    pub fn dump_state(&self) {
        self.cpu.dump_registers();

        let pwm = self.pwm.borrow();
        println!("PWM slices (EN mask 0x{:03X}):", pwm.enabled_mask());
        for (i, slice) in pwm.slices().iter().enumerate() {
            if slice.is_enabled() || slice.configured {
                println!(
                    "  slice {:2}: en={} cfg={} A={} B={} top=0x{:04X}",
                    i,
                    slice.is_enabled() as u8,
                    slice.configured as u8,
                    slice.level_a(),
                    slice.level_b(),
                    slice.top
                );
            }
        }

        let gpio = self.gpio.borrow();
        for pin in 0..GpioBank::NUM_PINS {
            let func = gpio.pin_function(pin);
            if func != crate::core::gpio::FunctionSelect::None {
                println!("GPIO{:2}: {:?}", pin, func);
            }
        }

        println!("TIMER0: {} us", self.timer.borrow().counter());
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
