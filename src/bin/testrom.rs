//! Test ROM runner.
//!
//! Loads a ROM image, runs it and reports how it stopped. On failure the
//! registers and instruction count are printed and the whole address space is
//! written to a dump file for inspection.
//!
//! ```text
//! testrom path/to/test.bin --test-mode --trace
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emu6502::{Config, MemoryBus, CPU};

#[derive(Parser, Debug)]
#[command(name = "testrom", about = "Run a 6502 test ROM and dump machine state on failure")]
struct Args {
    /// ROM image to run (64KB unless --banked)
    rom: PathBuf,

    /// Map the ROM at 0x8000 with 4KB low RAM instead of a flat 64KB image
    #[arg(long, default_value_t = false)]
    banked: bool,

    /// Back 0x6000-0x7FFF with RAM (banked only)
    #[arg(long, default_value_t = false)]
    wram: bool,

    /// Start address in hex. Test ROM vectors trap, so the reset vector is
    /// ignored by default.
    #[arg(long, value_name = "ADDR", value_parser = parse_hex, default_value = "8000")]
    start: u16,

    /// Use the reset vector instead of --start
    #[arg(long, default_value_t = false)]
    reset_vector: bool,

    /// Stop cleanly on opcode $FF; running out of budget becomes a failure
    #[arg(long, default_value_t = false)]
    test_mode: bool,

    /// Maximum instructions to execute (0 = unbounded)
    #[arg(long, default_value_t = 0)]
    budget: u64,

    /// Write a trace line per instruction to --trace-file
    #[arg(long, default_value_t = false)]
    trace: bool,

    #[arg(long, value_name = "PATH", default_value = "debug.txt")]
    trace_file: PathBuf,

    /// Where the memory dump goes on failure
    #[arg(long, value_name = "PATH", default_value = "memory.txt")]
    dump_file: PathBuf,
}

fn parse_hex(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {:?}: {}", s, e))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let rom = match fs::read(&args.rom) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.rom.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let config = Config::default()
        .with_budget(args.budget)
        .with_test_mode(args.test_mode)
        .with_trace(args.trace);

    if args.banked {
        match CPU::banked_with_config(rom, args.wram, config) {
            Ok(cpu) => run(cpu, &args),
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        }
    } else {
        match CPU::flat_with_config(rom, config.with_stuck_detection(true)) {
            Ok(cpu) => run(cpu, &args),
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        }
    }
}

fn run<M: MemoryBus>(mut cpu: CPU<M>, args: &Args) -> ExitCode {
    if !args.reset_vector {
        cpu.set_pc(args.start);
    }

    let mut trace = None;
    if args.trace {
        match File::create(&args.trace_file) {
            Ok(file) => trace = Some(BufWriter::new(file)),
            Err(e) => {
                eprintln!("Failed to create {}: {}", args.trace_file.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut trace_error = None;
    let result = cpu.run_with(|cpu| {
        if let (Some(out), Some(line)) = (trace.as_mut(), cpu.last_trace()) {
            if trace_error.is_none() {
                trace_error = writeln!(out, "{}", line).err();
            }
        }
    });

    if let Some(out) = trace.as_mut() {
        if let Err(e) = out.flush() {
            trace_error.get_or_insert(e);
        }
    }
    if let Some(e) = trace_error {
        eprintln!("Failed to write trace: {}", e);
    }

    match result {
        Ok(halt) => {
            println!("{}", halt);
            println!("Ticks: {}", cpu.instruction_count());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            println!("{}", cpu.dump_registers());
            println!("Ticks: {}", cpu.instruction_count());

            match File::create(&args.dump_file) {
                Ok(file) => {
                    if let Err(e) = cpu.write_memory_dump(BufWriter::new(file)) {
                        eprintln!("{}", e);
                    }
                }
                Err(e) => eprintln!("Failed to create {}: {}", args.dump_file.display(), e),
            }
            ExitCode::FAILURE
        }
    }
}
