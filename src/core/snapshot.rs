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

//! Read-only machine state snapshots
//!
//! A `Snapshot` is a serializable copy of everything a host can inspect:
//! CPU registers, PC, execution state, cycle count, the GPIO function
//! table, the PWM slice states and the timer counter. It is decoupled
//! from the live components so hosts can persist or display it freely.

use serde::Serialize;

use super::cpu::{Cpu, CpuState};
use super::gpio::{FunctionSelect, GpioBank};
use super::pwm::Pwm;
use super::timer::Timer;

/// Serializable view of one PWM slice
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PwmSliceSnapshot {
    pub enabled: bool,
    /// A GPIO pin is muxed to this slice
    pub configured: bool,
    pub div: u32,
    pub ctr: u32,
    pub level_a: u16,
    pub level_b: u16,
    pub top: u32,
}

/// Read-only snapshot of the full machine state
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// General purpose registers x0-x31
    pub regs: [u32; 32],
    /// Program counter
    pub pc: u32,
    /// Execution state at capture time
    pub state: CpuState,
    /// Total cycles executed
    pub cycles: u64,
    /// Selected function per GPIO pin
    pub gpio_functions: Vec<FunctionSelect>,
    /// Per-slice PWM state
    pub pwm_slices: Vec<PwmSliceSnapshot>,
    /// Timer counter in microseconds
    pub timer_us: u64,
}

impl Snapshot {
    /// Capture the current state of all components
    pub(super) fn capture(
        cpu: &Cpu,
        cycles: u64,
        gpio: &GpioBank,
        pwm: &Pwm,
        timer: &Timer,
    ) -> Self {
        let pwm_slices = pwm
            .slices()
            .iter()
            .map(|slice| PwmSliceSnapshot {
                enabled: slice.is_enabled(),
                configured: slice.configured,
                div: slice.div,
                ctr: slice.ctr,
                level_a: slice.level_a(),
                level_b: slice.level_b(),
                top: slice.top,
            })
            .collect();

        Self {
            regs: cpu.regs(),
            pc: cpu.pc(),
            state: cpu.state(),
            cycles,
            gpio_functions: gpio.function_table(),
            pwm_slices,
            timer_us: timer.counter(),
        }
    }
}
