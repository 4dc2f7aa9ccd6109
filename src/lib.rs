//! # 6502 Test ROM Emulator
//!
//! An instruction-stepping 6502 CPU emulator for running ROM images under a
//! test harness and inspecting the resulting register and memory state.
//!
//! The crate models the register set and status flags, two address-space
//! shapes (a flat 64KB image and a bank-mapped layout with low RAM, an
//! optional RAM window and ROM), a table-driven instruction dispatcher and a
//! run loop with termination policies: an instruction budget, stuck-PC
//! detection and a test sentinel opcode.
//!
//! ## Quick Start
//!
//! ```rust
//! use emu6502::{Config, Halt, CPU};
//!
//! // Flat 64KB image: LDA #$2A, then the test sentinel
//! let mut image = vec![0u8; 0x10000];
//! image[0xFFFC] = 0x00; // Reset vector low byte
//! image[0xFFFD] = 0x80; // Reset vector high byte
//! image[0x8000] = 0xA9;
//! image[0x8001] = 0x2A;
//! image[0x8002] = 0xFF;
//!
//! let config = Config::default().with_test_mode(true);
//! let mut cpu = CPU::flat_with_config(image, config).unwrap();
//!
//! assert_eq!(cpu.run(), Ok(Halt::TestComplete));
//! assert_eq!(cpu.a(), 0x2A);
//! assert!(!cpu.flag_z());
//! ```
//!
//! ## Modules
//!
//! - `cpu` - CPU state, the fetch-decode-execute loop and accessors
//! - `registers` - Register snapshot, status flags, branch offset decoding
//! - `memory` - MemoryBus trait, flat and banked address spaces
//! - `addressing` - Addressing modes and the effective address resolver
//! - `opcodes` - Instruction descriptors and the dispatch table
//! - `engine` - Run configuration, halt reasons and stuck detection
//! - `trace` - Trace lines and register/memory dumps

pub mod addressing;
pub mod cpu;
pub mod engine;
pub mod memory;
pub mod opcodes;
pub mod registers;
pub mod trace;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use addressing::{AddressingMode, Operand};
pub use cpu::CPU;
pub use engine::{Config, Halt, RunState};
pub use memory::{BankedMemory, FlatMemory, MemoryBus};
pub use opcodes::{lookup, Category, Instruction, OPCODE_TABLE};
pub use registers::{Registers, Status};
pub use trace::{flags_to_string, TraceLine};

/// Non-maskable interrupt vector. Defined for completeness, never dispatched.
pub const VECTOR_NMI: u16 = 0xFFFA;

/// Reset vector; the initial PC is read from here at construction.
pub const VECTOR_RESET: u16 = 0xFFFC;

/// IRQ/BRK vector. Defined for completeness, never dispatched.
pub const VECTOR_IRQ: u16 = 0xFFFE;

/// Errors raised while building an address space from a ROM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// Flat images must be exactly 64KB.
    FlatImage {
        /// Length of the rejected image
        len: usize,
    },

    /// Banked ROM images must be a multiple of 256 bytes.
    NotPageAligned {
        /// Length of the rejected image
        len: usize,
    },

    /// Banked ROM image has no bytes.
    EmptyRom,
}

impl std::fmt::Display for SizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SizeError::FlatImage { len } => {
                write!(f, "ROM must be exactly 64k (got 0x{:X} bytes)", len)
            }
            SizeError::NotPageAligned { len } => {
                write!(f, "ROM is not divisible by 256: {} bytes", len)
            }
            SizeError::EmptyRom => write!(f, "ROM image is empty"),
        }
    }
}

impl std::error::Error for SizeError {}

/// Errors that halt CPU execution.
///
/// Every variant is terminal: once returned, the CPU stays halted and keeps
/// reporting the same error. Register and memory state at the moment of the
/// halt remain inspectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Fetched byte has no entry in the dispatch table.
    UnknownOpcode {
        /// The offending opcode byte
        opcode: u8,
        /// Address it was fetched from
        pc: u16,
    },

    /// The program counter has not moved for more than five consecutive
    /// fetches.
    Stuck {
        /// The address the CPU is spinning on
        pc: u16,
    },

    /// Instruction budget consumed before the test sentinel was reached.
    BudgetExceeded {
        /// The configured budget
        budget: u64,
    },

    /// A descriptor pairs an operation that needs an effective address with
    /// a mode that yields none.
    MissingOperand {
        /// The offending opcode byte
        opcode: u8,
        /// Address of the instruction
        pc: u16,
    },
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExecutionError::UnknownOpcode { opcode, pc } => {
                write!(f, "OP Code not implemented: [${:04X}] ${:02X}", pc, opcode)
            }
            ExecutionError::Stuck { pc } => write!(f, "Stuck at ${:04X}", pc),
            ExecutionError::BudgetExceeded { budget } => {
                write!(f, "Instruction limit hit ({} instructions)", budget)
            }
            ExecutionError::MissingOperand { opcode, pc } => {
                write!(f, "Opcode ${:02X} at ${:04X} has no effective address", opcode, pc)
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Errors produced by the memory dump helpers.
#[derive(Debug)]
pub enum DumpError {
    /// `end` lies before `start`.
    InvalidRange {
        /// First address requested
        start: u16,
        /// Last address requested
        end: u16,
    },

    /// Writing the dump failed.
    Io(std::io::Error),
}

impl std::fmt::Display for DumpError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DumpError::InvalidRange { start, end } => {
                write!(f, "Invalid dump range given: ${:04X}-${:04X}", start, end)
            }
            DumpError::Io(err) => write!(f, "Failed to write dump: {}", err),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DumpError::Io(err) => Some(err),
            DumpError::InvalidRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for DumpError {
    fn from(err: std::io::Error) -> Self {
        DumpError::Io(err)
    }
}
