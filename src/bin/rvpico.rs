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

use clap::Parser;
use log::{error, info};
use rvpico::core::config::EmulatorConfig;
use rvpico::core::cpu::Disassembler;
use rvpico::core::error::Result;
use rvpico::core::loader::Image;
use rvpico::core::system::{RunOutcome, StepOutcome, System};

/// RP2350 (Hazard3 RISC-V) emulator
#[derive(Parser)]
#[command(name = "rvpico")]
#[command(about = "RP2350 RISC-V microcontroller emulator", long_about = None)]
struct Args {
    /// Path to a raw RV32IM machine code image
    image: String,

    /// Entry address inside the image
    #[arg(short, long, default_value = "0x20000000", value_parser = parse_address)]
    entry: u32,

    /// Maximum number of cycles to execute (overrides the config file)
    #[arg(short = 'n', long)]
    max_cycles: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Print each executed instruction
    #[arg(short, long)]
    trace: bool,

    /// Print the final machine state as JSON
    #[arg(short, long)]
    json: bool,
}

/// Parse a decimal or 0x-prefixed hexadecimal address
fn parse_address(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("invalid address: {s}"))
}

fn main() -> Result<()> {
    // Initialize logger with default level INFO
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("rvpico v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            EmulatorConfig::from_file(path)?
        }
        None => EmulatorConfig::default(),
    };
    let max_cycles = args.max_cycles.unwrap_or(config.max_cycles);

    info!("Loading image from: {}", args.image);
    let image = Image::from_file(&args.image, args.entry).map_err(|e| {
        error!("Failed to load image: {}", e);
        e
    })?;

    let mut system = System::with_config(&config);
    system.load(&image);

    info!("Starting emulation (cycle cap: {})...", max_cycles);

    let outcome = if args.trace {
        run_traced(&mut system, max_cycles)
    } else {
        system.run(max_cycles)
    };

    match outcome {
        RunOutcome::Halted { cycles } => {
            info!("Program halted after {} cycles", cycles);
            info!("Final PC: 0x{:08X}", system.pc());
        }
        RunOutcome::Faulted(fault) => {
            error!("{}", fault);
            system.dump_state();
        }
        RunOutcome::CycleLimitExceeded { cycles } => {
            info!("Cycle cap reached after {} cycles, PC=0x{:08X}", cycles, system.pc());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&system.snapshot())?);
    } else {
        system.dump_state();
    }

    Ok(())
}

/// Run with a per-instruction disassembly trace
fn run_traced(system: &mut System, max_cycles: u64) -> RunOutcome {
    for _ in 0..max_cycles {
        let pc = system.pc();
        if let Ok(word) = system.bus().read32(pc) {
            println!("0x{:08X}: {}", pc, Disassembler::disassemble(word, pc));
        }

        match system.step() {
            StepOutcome::Running => {}
            StepOutcome::Halted => {
                return RunOutcome::Halted {
                    cycles: system.cycles(),
                }
            }
            StepOutcome::Faulted(fault) => return RunOutcome::Faulted(fault),
        }
    }
    RunOutcome::CycleLimitExceeded {
        cycles: system.cycles(),
    }
}
