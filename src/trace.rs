//! # Trace and Inspection
//!
//! Read-only renderings of CPU state: the per-instruction [`TraceLine`], the
//! status flag string and the register and memory dumps used by test
//! harnesses when a run fails.
//!
//! Dumps read the bus directly, so they never move the last-read
//! observation.

use std::fmt;
use std::io::Write;

use crate::addressing::AddressingMode;
use crate::opcodes::Instruction;
use crate::registers::{relative_target, Status};
use crate::{DumpError, MemoryBus, CPU};

/// One executed instruction, as recorded when tracing is enabled.
///
/// Renders as `[tick] $PC: bytes MNEMONIC operand`, e.g.
/// `[000001] $8000: A9 2A     LDA #$2A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    /// Instruction counter value after this instruction
    pub tick: u64,

    /// Address the instruction was fetched from
    pub pc: u16,

    /// Raw encoded bytes, captured before execution
    pub bytes: Vec<u8>,

    /// Instruction mnemonic
    pub mnemonic: &'static str,

    /// Addressing mode used to render the operand
    pub mode: AddressingMode,
}

impl TraceLine {
    pub(crate) fn new(tick: u64, pc: u16, bytes: Vec<u8>, instruction: &Instruction) -> Self {
        Self {
            tick,
            pc,
            bytes,
            mnemonic: instruction.mnemonic,
            mode: instruction.addressing_mode(),
        }
    }

    /// Renders the operand in assembler syntax. Branches show their target.
    pub fn operand(&self) -> String {
        use AddressingMode::*;

        let byte = self.bytes.get(1).copied().unwrap_or(0);
        let word = u16::from_le_bytes([byte, self.bytes.get(2).copied().unwrap_or(0)]);

        match self.mode {
            Implied => String::new(),
            Immediate => format!("#${:02X}", byte),
            ZeroPage => format!("${:02X}", byte),
            ZeroPageX => format!("${:02X},X", byte),
            ZeroPageY => format!("${:02X},Y", byte),
            Absolute => format!("${:04X}", word),
            AbsoluteX => format!("${:04X},X", word),
            AbsoluteY => format!("${:04X},Y", word),
            Indirect => format!("(${:04X})", word),
            IndirectX => format!("(${:02X},X)", byte),
            IndirectY => format!("(${:02X}),Y", byte),
            Relative => format!("${:04X}", relative_target(self.pc, byte)),
        }
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self
            .bytes
            .iter()
            .map(|b| format!("{:X}", b))
            .collect::<Vec<_>>()
            .join(" ");

        write!(f, "[{:06}] ${:04X}: {:<9} {}", self.tick, self.pc, bytes, self.mnemonic)?;

        let operand = self.operand();
        if !operand.is_empty() {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

/// Renders the status register as `NV--DIZC`, with `-` for each clear flag.
///
/// # Examples
///
/// ```
/// use emu6502::{flags_to_string, Status};
///
/// assert_eq!(flags_to_string(Status::empty()), "--------");
/// assert_eq!(flags_to_string(Status::ZERO | Status::CARRY), "------ZC");
/// assert_eq!(flags_to_string(Status::NEGATIVE | Status::DECIMAL), "N---D---");
/// ```
pub fn flags_to_string(status: Status) -> String {
    [
        (Status::NEGATIVE, 'N'),
        (Status::OVERFLOW, 'V'),
        (Status::empty(), '-'),
        (Status::empty(), '-'),
        (Status::DECIMAL, 'D'),
        (Status::INTERRUPT, 'I'),
        (Status::ZERO, 'Z'),
        (Status::CARRY, 'C'),
    ]
    .iter()
    .map(|&(flag, c)| if !flag.is_empty() && status.contains(flag) { c } else { '-' })
    .collect()
}

impl<M: MemoryBus> CPU<M> {
    /// Renders the registers and flags on one line.
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{CPU, FlatMemory, MemoryBus, Status};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFD, 0x80);
    ///
    /// let mut cpu = CPU::new(mem);
    /// cpu.set_a(0x2A);
    /// cpu.set_status(Status::ZERO | Status::CARRY);
    ///
    /// assert_eq!(
    ///     cpu.dump_registers(),
    ///     "A: 2A (42) X: 00 (0) Y: 00 (0) PC: 8000 SP: 00 Flags: ------ZC"
    /// );
    /// ```
    pub fn dump_registers(&self) -> String {
        let regs = self.registers();
        format!(
            "A: {:02X} ({}) X: {:02X} ({}) Y: {:02X} ({}) PC: {:04X} SP: {:02X} Flags: {}",
            regs.a,
            regs.a,
            regs.x,
            regs.x,
            regs.y,
            regs.y,
            regs.pc,
            regs.sp,
            flags_to_string(regs.status)
        )
    }

    /// Renders one 256-byte page as 16 lines of 16 hex bytes.
    pub fn dump_page(&self, page: u8) -> String {
        let base = (page as u16) << 8;
        let bytes = self.read_range(base, base | 0xFF);
        hex_lines(base, &bytes)
    }

    /// Renders `start..=end` with one `$ADDR: $VV (dec)` line per byte.
    ///
    /// # Errors
    ///
    /// Returns `DumpError::InvalidRange` if `end < start`.
    pub fn dump_memory_range(&self, start: u16, end: u16) -> Result<String, DumpError> {
        if end < start {
            return Err(DumpError::InvalidRange { start, end });
        }

        let mut out = String::new();
        for (addr, value) in (start..=end).zip(self.read_range(start, end)) {
            out.push_str(&format!("${:04X}: ${:02X} ({})\n", addr, value, value));
        }
        Ok(out)
    }

    /// Writes the whole address space as 4096 lines of `ADDR: XX XX ...`.
    pub fn write_memory_dump<W: Write>(&self, mut writer: W) -> Result<(), DumpError> {
        let bytes = self.read_range(0x0000, 0xFFFF);
        writer.write_all(hex_lines(0x0000, &bytes).as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn hex_lines(base: u16, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + bytes.len() / 16 * 6);
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let addr = base as usize + row * 16;
        let line = chunk
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("{:04X}: {}\n", addr, line));
    }
    out
}
