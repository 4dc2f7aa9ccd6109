//! WASM API for the 6502 emulator.
//!
//! Provides JavaScript-callable interfaces for machine construction, run
//! control and state inspection.

use crate::{BankedMemory, Config, ExecutionError, FlatMemory, Halt, MemoryBus, SizeError, CPU};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<SizeError> for JsError {
    fn from(err: SizeError) -> Self {
        JsError::new(&err.to_string())
    }
}

impl From<ExecutionError> for JsError {
    fn from(err: ExecutionError) -> Self {
        JsError::new(&err.to_string())
    }
}

enum Machine {
    Flat(CPU<FlatMemory>),
    Banked(CPU<BankedMemory>),
}

/// Runs `$body` with `$cpu` bound to whichever CPU the machine holds.
macro_rules! with_cpu {
    ($machine:expr, $cpu:ident => $body:expr) => {
        match $machine {
            Machine::Flat($cpu) => $body,
            Machine::Banked($cpu) => $body,
        }
    };
}

/// A flat or banked 6502 machine exposed to JavaScript.
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Builds a flat machine from a 64KB image.
    pub fn flat(image: Vec<u8>, budget: u32, test_mode: bool) -> Result<WasmMachine, JsError> {
        let config = Config::default()
            .with_budget(budget as u64)
            .with_test_mode(test_mode)
            .with_stuck_detection(true);
        let cpu = CPU::flat_with_config(image, config)?;

        Ok(WasmMachine {
            machine: Machine::Flat(cpu),
        })
    }

    /// Builds a banked machine from a ROM image.
    pub fn banked(rom: Vec<u8>, wram: bool, budget: u32) -> Result<WasmMachine, JsError> {
        let cpu = CPU::banked(rom, wram, budget as u64)?;

        Ok(WasmMachine {
            machine: Machine::Banked(cpu),
        })
    }

    /// Executes one instruction. Returns true once the machine is halted
    /// cleanly; failures are thrown.
    pub fn step(&mut self) -> Result<bool, JsError> {
        let halt = with_cpu!(&mut self.machine, cpu => cpu.step())?;
        Ok(halt.is_some())
    }

    /// Runs until a halt or the budget; returns the clean halt reason.
    pub fn run(&mut self) -> Result<String, JsError> {
        let halt: Halt = with_cpu!(&mut self.machine, cpu => cpu.run())?;
        Ok(halt.to_string())
    }

    /// Halt reason, or undefined while the machine can still run.
    #[wasm_bindgen(getter)]
    pub fn halt_reason(&self) -> Option<String> {
        with_cpu!(&self.machine, cpu => cpu.state().halt().map(|h| h.to_string()))
    }

    // Register getters

    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        with_cpu!(&self.machine, cpu => cpu.a())
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        with_cpu!(&self.machine, cpu => cpu.x())
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        with_cpu!(&self.machine, cpu => cpu.y())
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        with_cpu!(&self.machine, cpu => cpu.pc())
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        with_cpu!(&self.machine, cpu => cpu.sp())
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        with_cpu!(&self.machine, cpu => cpu.status().bits())
    }

    #[wasm_bindgen(getter)]
    pub fn instructions(&self) -> f64 {
        with_cpu!(&self.machine, cpu => cpu.instruction_count() as f64) // Convert u64 to f64 for JavaScript
    }

    pub fn set_pc(&mut self, addr: u16) {
        with_cpu!(&mut self.machine, cpu => cpu.set_pc(addr))
    }

    pub fn dump_registers(&self) -> String {
        with_cpu!(&self.machine, cpu => cpu.dump_registers())
    }

    // Memory access methods

    pub fn read_memory(&self, addr: u16) -> u8 {
        with_cpu!(&self.machine, cpu => cpu.memory().read(addr))
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        with_cpu!(&mut self.machine, cpu => cpu.write_byte(addr, value))
    }

    /// Copies `start..=end` into a fresh `Uint8Array`.
    pub fn memory_range(&self, start: u16, end: u16) -> js_sys::Uint8Array {
        let bytes = with_cpu!(&self.machine, cpu => cpu.read_range(start, end));
        js_sys::Uint8Array::from(bytes.as_slice())
    }
}
