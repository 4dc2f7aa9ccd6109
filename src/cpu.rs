//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: A plain [`Registers`] value (A, X, Y, PC, SP, status)
//! - **Instruction counter**: number of instructions executed so far
//! - **Address space**: any [`MemoryBus`] implementation, owned exclusively
//! - **Engine**: run configuration, run state, stuck detection and the
//!   diagnostic observations
//!
//! ## Execution Model
//!
//! The CPU executes instructions via:
//! - `step()`: Execute one instruction (or halt)
//! - `run()`: Step until a halt or until the instruction budget is consumed
//!
//! Halts are terminal. Once halted, every further `step()` or `run()` reports
//! the same reason without touching registers or memory.

use crate::engine::{Engine, Halt, RunState};
use crate::opcodes::OP_TEST_SENTINEL;
use crate::registers::Status;
use crate::trace::TraceLine;
use crate::{
    instructions, lookup, BankedMemory, Config, ExecutionError, FlatMemory, MemoryBus, Registers,
    SizeError, VECTOR_RESET,
};

/// 6502 CPU state and execution context.
///
/// Generic over the address space via the `MemoryBus` trait. Use
/// [`CPU::flat`] or [`CPU::banked`] to build one of the two standard machine
/// shapes, or [`CPU::with_config`] to bring your own bus.
///
/// # Type Parameters
///
/// * `M` - Memory bus implementation (must implement `MemoryBus` trait)
///
/// # Examples
///
/// ```
/// use emu6502::{CPU, FlatMemory, MemoryBus};
///
/// // Create memory and set reset vector
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Low byte
/// memory.write(0xFFFD, 0x80); // High byte (PC = 0x8000)
///
/// // Initialize CPU - loads PC from reset vector
/// let cpu = CPU::new(memory);
///
/// // Everything else starts at zero
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0x00);
/// assert_eq!(cpu.status().bits(), 0x00);
/// assert_eq!(cpu.instruction_count(), 0);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Architectural register state
    pub(crate) regs: Registers,

    /// Memory bus implementation
    memory: M,

    /// Run configuration, state and diagnostics
    engine: Engine,

    /// Total instructions executed
    instructions: u64,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU with the default configuration: no budget, no test
    /// mode, no stuck detection, no tracing.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, Config::default())
    }

    /// Creates a new CPU with the given memory bus and configuration.
    ///
    /// The program counter is loaded from the reset vector at 0xFFFC/0xFFFD
    /// (little-endian). A, X, Y, SP, the status register and the instruction
    /// counter all start at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{Config, CPU, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x34);
    /// mem.write(0xFFFD, 0x12);
    ///
    /// let cpu = CPU::with_config(mem, Config::default().with_budget(10));
    /// assert_eq!(cpu.pc(), 0x1234);
    /// assert_eq!(cpu.config().instruction_budget, 10);
    /// ```
    pub fn with_config(memory: M, config: Config) -> Self {
        let pc = memory.read_word(VECTOR_RESET);

        Self {
            regs: Registers {
                pc,
                ..Registers::default()
            },
            memory,
            engine: Engine::new(config),
            instructions: 0,
        }
    }

    /// Executes one instruction and advances the CPU state.
    ///
    /// Performs the fetch-decode-execute cycle:
    /// 1. Re-report the halt reason if already halted
    /// 2. Stuck check (if enabled)
    /// 3. Fetch opcode byte at current PC
    /// 4. In test mode, stop cleanly on the sentinel opcode 0xFF
    /// 5. Look up the instruction descriptor; unknown opcodes halt
    /// 6. Increment the instruction counter and execute the category
    /// 7. Record a trace line (if enabled)
    ///
    /// # Returns
    ///
    /// - `Ok(None)` if an instruction executed
    /// - `Ok(Some(halt))` if the CPU is halted cleanly
    /// - `Err(ExecutionError)` if the CPU is halted on a failure
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{CPU, ExecutionError, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0xEA); // NOP
    /// mem.write(0x8001, 0x02); // no such instruction
    ///
    /// let mut cpu = CPU::new(mem);
    ///
    /// assert_eq!(cpu.step(), Ok(None));
    /// assert_eq!(cpu.pc(), 0x8001);
    ///
    /// let err = ExecutionError::UnknownOpcode { opcode: 0x02, pc: 0x8001 };
    /// assert_eq!(cpu.step(), Err(err.clone()));
    /// // Halts are sticky
    /// assert_eq!(cpu.step(), Err(err));
    /// ```
    pub fn step(&mut self) -> Result<Option<Halt>, ExecutionError> {
        if let Some(halt) = self.engine.state.halt() {
            return halt.clone().into_result().map(Some);
        }
        self.engine.state = RunState::Running;

        let pc = self.regs.pc;

        if self.engine.config.detect_stuck && self.engine.stuck.observe(pc) {
            log::warn!("Stuck at ${:04X}", pc);
            return self.halt(Halt::Failed(ExecutionError::Stuck { pc })).map(Some);
        }

        // Fetch
        let opcode = self.read_byte(pc);

        if opcode == OP_TEST_SENTINEL && self.engine.config.test_mode {
            return self.halt(Halt::TestComplete).map(Some);
        }

        // Decode
        let Some(instruction) = lookup(opcode) else {
            log::warn!("OP Code not implemented: [${:04X}] ${:02X}", pc, opcode);
            return self
                .halt(Halt::Failed(ExecutionError::UnknownOpcode { opcode, pc }))
                .map(Some);
        };

        // Encoded bytes are captured before execution so self-modifying
        // stores do not alter the trace.
        let bytes = self.engine.config.trace.then(|| {
            (0..instruction.length() as u16)
                .map(|i| self.memory.read(pc.wrapping_add(i)))
                .collect::<Vec<u8>>()
        });

        // Execute
        self.instructions += 1;
        if let Err(err) = instructions::execute(self, instruction) {
            return self.halt(Halt::Failed(err)).map(Some);
        }

        if let Some(bytes) = bytes {
            let line = TraceLine::new(self.instructions, pc, bytes, instruction);
            log::trace!(target: "emu6502::trace", "{}", line);
            self.engine.last_trace = Some(line);
        }

        Ok(None)
    }

    /// Runs until the CPU halts or the configured instruction budget is
    /// consumed.
    ///
    /// The budget counts steps taken by this call; 0 means unbounded. When it
    /// runs out, test mode reports `BudgetExceeded` as a failure and normal
    /// mode stops cleanly with `BudgetReached`. A step that halts on its own
    /// wins over the budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{CPU, Halt};
    ///
    /// let mut image = vec![0xEA; 0x10000]; // NOP everywhere
    /// image[0xFFFC] = 0x00;
    /// image[0xFFFD] = 0x80;
    ///
    /// let mut cpu = CPU::flat(image, 100).unwrap();
    /// assert_eq!(cpu.run(), Ok(Halt::BudgetReached));
    /// assert_eq!(cpu.instruction_count(), 100);
    /// assert_eq!(cpu.pc(), 0x8064);
    /// ```
    pub fn run(&mut self) -> Result<Halt, ExecutionError> {
        self.run_with(|_| {})
    }

    /// Same as [`run`](CPU::run), calling `on_step` after every executed
    /// instruction.
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{Config, CPU, Halt};
    ///
    /// let mut image = vec![0xEA; 0x10000];
    /// image[0xFFFC] = 0x00;
    /// image[0xFFFD] = 0x80;
    ///
    /// let config = Config::default().with_budget(3).with_trace(true);
    /// let mut cpu = CPU::flat_with_config(image, config).unwrap();
    ///
    /// let mut lines = Vec::new();
    /// let halt = cpu.run_with(|cpu| lines.extend(cpu.last_trace().map(|l| l.to_string())));
    ///
    /// assert_eq!(halt, Ok(Halt::BudgetReached));
    /// assert_eq!(lines.len(), 3);
    /// assert_eq!(lines[2], "[000003] $8002: EA        NOP");
    /// ```
    pub fn run_with<F: FnMut(&Self)>(&mut self, mut on_step: F) -> Result<Halt, ExecutionError> {
        if let Some(halt) = self.engine.state.halt() {
            return halt.clone().into_result();
        }

        let budget = self.engine.config.instruction_budget;
        let mut executed: u64 = 0;

        loop {
            if let Some(halt) = self.step()? {
                return Ok(halt);
            }

            executed += 1;
            on_step(self);
            if budget != 0 && executed >= budget {
                let halt = if self.engine.config.test_mode {
                    Halt::Failed(ExecutionError::BudgetExceeded { budget })
                } else {
                    Halt::BudgetReached
                };
                return self.halt(halt);
            }
        }
    }

    fn halt(&mut self, halt: Halt) -> Result<Halt, ExecutionError> {
        log::debug!(
            "Halted at ${:04X} after {} instructions: {}",
            self.regs.pc,
            self.instructions,
            halt
        );
        self.engine.state = RunState::Halted(halt.clone());
        halt.into_result()
    }

    // ========== Memory Access ==========

    /// Reads a byte through the bus and records `addr` as the last address
    /// read.
    pub fn read_byte(&mut self, addr: u16) -> u8 {
        self.engine.last_read = addr;
        self.memory.read(addr)
    }

    /// Reads a little-endian word from `addr` and `addr + 1`.
    ///
    /// The last-read observation is left at `addr`.
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read_byte(addr) as u16;
        let hi = self.read_byte(addr.wrapping_add(1)) as u16;
        self.engine.last_read = addr;
        (hi << 8) | lo
    }

    /// Writes a byte through the bus. Ignored on read-only or unmapped
    /// addresses.
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
    }

    /// Writes a little-endian word to `addr` and `addr + 1`.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.memory.write(addr, lo);
        self.memory.write(addr.wrapping_add(1), hi);
    }

    /// Returns the bytes from `start` to `end` inclusive, or an empty vector
    /// when `end < start`. Does not disturb the last-read observation.
    pub fn read_range(&self, start: u16, end: u16) -> Vec<u8> {
        if end < start {
            return Vec::new();
        }
        (start..=end).map(|addr| self.memory.read(addr)).collect()
    }

    /// Returns a reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ========== Stack ==========

    /// Pushes a byte at `0x0100 | SP`, then decrements SP (wrapping).
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{CPU, FlatMemory, MemoryBus};
    ///
    /// let mut cpu = CPU::new(FlatMemory::new());
    /// cpu.set_sp(0xFF);
    ///
    /// cpu.push_word(0xBEEF);
    /// assert_eq!(cpu.sp(), 0xFD);
    /// assert_eq!(cpu.memory().read(0x01FF), 0xBE);
    /// assert_eq!(cpu.memory().read(0x01FE), 0xEF);
    ///
    /// assert_eq!(cpu.pull_word(), 0xBEEF);
    /// assert_eq!(cpu.sp(), 0xFF);
    /// ```
    pub fn push_byte(&mut self, value: u8) {
        let addr = self.regs.stack_address();
        self.memory.write(addr, value);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    /// Increments SP (wrapping), then reads the byte at `0x0100 | SP`.
    pub fn pull_byte(&mut self) -> u8 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let addr = self.regs.stack_address();
        self.read_byte(addr)
    }

    /// Pushes a word, high byte first.
    pub fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push_byte(hi);
        self.push_byte(lo);
    }

    /// Pulls a word, low byte first.
    pub fn pull_word(&mut self) -> u16 {
        let lo = self.pull_byte();
        let hi = self.pull_byte();
        u16::from_le_bytes([lo, hi])
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.regs.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.regs.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 + SP. The stack grows downward.
    pub fn sp(&self) -> u8 {
        self.regs.sp
    }

    /// Returns the status register.
    pub fn status(&self) -> Status {
        self.regs.status
    }

    /// Returns a copy of the full register set.
    pub fn registers(&self) -> Registers {
        self.regs
    }

    /// Returns the number of instructions executed since construction.
    pub fn instruction_count(&self) -> u64 {
        self.instructions
    }

    /// Returns the address of the most recent engine read.
    pub fn last_read_address(&self) -> u16 {
        self.engine.last_read
    }

    /// Returns the current run state.
    pub fn state(&self) -> &RunState {
        &self.engine.state
    }

    /// Returns the configuration the CPU was built with.
    pub fn config(&self) -> &Config {
        &self.engine.config
    }

    /// Returns the trace line of the most recently executed instruction, if
    /// tracing is enabled.
    pub fn last_trace(&self) -> Option<&TraceLine> {
        self.engine.last_trace.as_ref()
    }

    // ========== Register Setters ==========

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    /// Sets the X index register.
    pub fn set_x(&mut self, value: u8) {
        self.regs.x = value;
    }

    /// Sets the Y index register.
    pub fn set_y(&mut self, value: u8) {
        self.regs.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    /// Sets the stack pointer.
    pub fn set_sp(&mut self, value: u8) {
        self.regs.sp = value;
    }

    /// Replaces the status register.
    pub fn set_status(&mut self, status: Status) {
        self.regs.status = status;
    }

    /// Sets Z and N from `value`.
    pub fn set_zero_negative(&mut self, value: u8) {
        self.regs.set_zero_negative(value);
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.regs.status.contains(Status::NEGATIVE)
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.regs.status.contains(Status::OVERFLOW)
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.regs.status.contains(Status::DECIMAL)
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.regs.status.contains(Status::INTERRUPT)
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.regs.status.contains(Status::ZERO)
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.regs.status.contains(Status::CARRY)
    }
}

impl CPU<FlatMemory> {
    /// Builds a flat 64KB machine with stuck detection enabled.
    ///
    /// # Errors
    ///
    /// Returns `SizeError::FlatImage` unless `image` is exactly 65536 bytes.
    pub fn flat(image: Vec<u8>, budget: u64) -> Result<Self, SizeError> {
        let config = Config::default()
            .with_budget(budget)
            .with_stuck_detection(true);
        Self::flat_with_config(image, config)
    }

    /// Builds a flat 64KB machine with an explicit configuration.
    pub fn flat_with_config(image: Vec<u8>, config: Config) -> Result<Self, SizeError> {
        let memory = FlatMemory::from_image(image)?;
        Ok(Self::with_config(memory, config))
    }
}

impl CPU<BankedMemory> {
    /// Builds a bank-mapped machine with stuck detection disabled.
    ///
    /// Allocates the 4KB low RAM region and, if `wram` is set, the 8KB RAM
    /// window at 0x6000-0x7FFF.
    ///
    /// # Errors
    ///
    /// - `SizeError::EmptyRom` if `rom` is empty
    /// - `SizeError::NotPageAligned` if its length is not a multiple of 256
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{CPU, SizeError};
    ///
    /// assert_eq!(CPU::banked(vec![0; 300], false, 0).err(), Some(SizeError::NotPageAligned { len: 300 }));
    /// assert!(CPU::banked(vec![0; 0x4000], true, 0).is_ok());
    /// ```
    pub fn banked(rom: Vec<u8>, wram: bool, budget: u64) -> Result<Self, SizeError> {
        Self::banked_with_config(rom, wram, Config::default().with_budget(budget))
    }

    /// Builds a bank-mapped machine with an explicit configuration.
    pub fn banked_with_config(rom: Vec<u8>, wram: bool, config: Config) -> Result<Self, SizeError> {
        let memory = BankedMemory::new(rom, wram)?;
        log::info!(
            "ROM size: {} bytes (window RAM: {})",
            memory.rom_len(),
            if memory.has_window_ram() { "on" } else { "off" }
        );
        Ok(Self::with_config(memory, config))
    }
}
