//! # Opcode Dispatch Table
//!
//! This module contains the instruction descriptors and the 256-entry lookup
//! table keyed by opcode byte. The table is the single source of truth for
//! which opcodes the engine supports: any byte without an entry is an unknown
//! opcode and halts the run loop.
//!
//! Each descriptor bundles:
//! - Mnemonic (instruction name)
//! - Category (one of four execution shapes), carrying the addressing mode
//!   and the operation to perform at the resolved address

use crate::addressing::AddressingMode;
use crate::registers::Status;

// ========== Opcode Bytes ==========

pub const OP_BCC: u8 = 0x90;
pub const OP_BCS: u8 = 0xB0;
pub const OP_BEQ: u8 = 0xF0;
pub const OP_BMI: u8 = 0x30;
pub const OP_BNE: u8 = 0xD0;
pub const OP_BPL: u8 = 0x10;
pub const OP_BVC: u8 = 0x50;
pub const OP_BVS: u8 = 0x70;

pub const OP_CLC: u8 = 0x18;
pub const OP_CLD: u8 = 0xD8;
pub const OP_CLI: u8 = 0x58;
pub const OP_CLV: u8 = 0xB8;
pub const OP_SEC: u8 = 0x38;
pub const OP_SED: u8 = 0xF8;
pub const OP_SEI: u8 = 0x78;

pub const OP_DEC_ZP: u8 = 0xC6;
pub const OP_DEC_ZX: u8 = 0xD6;
pub const OP_DEC_AB: u8 = 0xCE;
pub const OP_DEC_AX: u8 = 0xDE;
pub const OP_INC_ZP: u8 = 0xE6;
pub const OP_INC_ZX: u8 = 0xF6;
pub const OP_INC_AB: u8 = 0xEE;
pub const OP_INC_AX: u8 = 0xFE;
pub const OP_DEX: u8 = 0xCA;
pub const OP_DEY: u8 = 0x88;
pub const OP_INX: u8 = 0xE8;
pub const OP_INY: u8 = 0xC8;

pub const OP_JMP_AB: u8 = 0x4C;
pub const OP_JMP_ID: u8 = 0x6C;
pub const OP_JSR: u8 = 0x20;
pub const OP_RTS: u8 = 0x60;
pub const OP_RTI: u8 = 0x40;

pub const OP_LDA_IM: u8 = 0xA9;
pub const OP_LDA_ZP: u8 = 0xA5;
pub const OP_LDA_ZX: u8 = 0xB5;
pub const OP_LDA_AB: u8 = 0xAD;
pub const OP_LDA_AX: u8 = 0xBD;
pub const OP_LDA_AY: u8 = 0xB9;
pub const OP_LDA_IX: u8 = 0xA1;
pub const OP_LDA_IY: u8 = 0xB1;
pub const OP_LDX_IM: u8 = 0xA2;
pub const OP_LDX_ZP: u8 = 0xA6;
pub const OP_LDX_ZY: u8 = 0xB6;
pub const OP_LDX_AB: u8 = 0xAE;
pub const OP_LDX_AY: u8 = 0xBE;
pub const OP_LDY_IM: u8 = 0xA0;
pub const OP_LDY_ZP: u8 = 0xA4;
pub const OP_LDY_ZX: u8 = 0xB4;
pub const OP_LDY_AB: u8 = 0xAC;
pub const OP_LDY_AX: u8 = 0xBC;

pub const OP_STA_ZP: u8 = 0x85;
pub const OP_STA_ZX: u8 = 0x95;
pub const OP_STA_AB: u8 = 0x8D;
pub const OP_STA_AX: u8 = 0x9D;
pub const OP_STA_AY: u8 = 0x99;
pub const OP_STA_IX: u8 = 0x81;
pub const OP_STA_IY: u8 = 0x91;
pub const OP_STX_ZP: u8 = 0x86;
pub const OP_STX_ZY: u8 = 0x96;
pub const OP_STX_AB: u8 = 0x8E;
pub const OP_STY_ZP: u8 = 0x84;
pub const OP_STY_ZX: u8 = 0x94;
pub const OP_STY_AB: u8 = 0x8C;

pub const OP_NOP: u8 = 0xEA;

pub const OP_TAX: u8 = 0xAA;
pub const OP_TAY: u8 = 0xA8;
pub const OP_TSX: u8 = 0xBA;
pub const OP_TXA: u8 = 0x8A;
pub const OP_TXS: u8 = 0x9A;
pub const OP_TYA: u8 = 0x98;

pub const OP_PHA: u8 = 0x48;
pub const OP_PHP: u8 = 0x08;
pub const OP_PLA: u8 = 0x68;
pub const OP_PLP: u8 = 0x28;

/// Reserved byte that ends a run in test mode. It has no table entry, so
/// outside test mode it is an unknown opcode.
pub const OP_TEST_SENTINEL: u8 = 0xFF;

// ========== Descriptors ==========

/// Operations of the Standard category: read and/or write registers and
/// memory, never the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    Dex,
    Dey,
    Inx,
    Iny,
    Clc,
    Cld,
    Cli,
    Clv,
    Sec,
    Sed,
    Sei,
    Pha,
    Php,
    Pla,
    Plp,
    Nop,
}

/// Byte transforms applied by Read-Modify-Write instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modify {
    Inc,
    Dec,
}

/// Unconditional program counter replacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// PC := effective address
    Jmp,
    /// Push return address, PC := effective address
    Jsr,
    /// Pull return address
    Rts,
    /// Pull status, then return address
    Rti,
}

/// Execution shape of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Resolve, perform the operation, advance PC by the encoded length.
    Standard {
        mode: AddressingMode,
        op: Operation,
    },

    /// Resolve, read, transform, write back, advance PC.
    ReadModifyWrite {
        mode: AddressingMode,
        op: Modify,
    },

    /// Take the relative branch when `status & flag` equals `flag` (`set`)
    /// or zero (`!set`).
    Branch { flag: Status, set: bool },

    /// Replace PC unconditionally.
    Jump {
        mode: AddressingMode,
        op: Flow,
    },
}

/// Static descriptor for one supported opcode.
///
/// # Examples
///
/// ```
/// use emu6502::{lookup, AddressingMode};
///
/// let lda = lookup(0xA9).unwrap();
/// assert_eq!(lda.mnemonic, "LDA");
/// assert_eq!(lda.addressing_mode(), AddressingMode::Immediate);
/// assert_eq!(lda.length(), 2);
///
/// // Unsupported opcodes have no descriptor
/// assert!(lookup(0x69).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The opcode byte value
    pub opcode: u8,

    /// Instruction mnemonic (e.g., "LDA", "JSR")
    pub mnemonic: &'static str,

    /// Execution shape, with the mode and operation it needs
    pub category: Category,
}

impl Instruction {
    const fn standard(opcode: u8, mnemonic: &'static str, mode: AddressingMode, op: Operation) -> Self {
        Self {
            opcode,
            mnemonic,
            category: Category::Standard { mode, op },
        }
    }

    const fn implied(opcode: u8, mnemonic: &'static str, op: Operation) -> Self {
        Self::standard(opcode, mnemonic, AddressingMode::Implied, op)
    }

    const fn modify(opcode: u8, mnemonic: &'static str, mode: AddressingMode, op: Modify) -> Self {
        Self {
            opcode,
            mnemonic,
            category: Category::ReadModifyWrite { mode, op },
        }
    }

    const fn branch(opcode: u8, mnemonic: &'static str, flag: Status, set: bool) -> Self {
        Self {
            opcode,
            mnemonic,
            category: Category::Branch { flag, set },
        }
    }

    const fn jump(opcode: u8, mnemonic: &'static str, mode: AddressingMode, op: Flow) -> Self {
        Self {
            opcode,
            mnemonic,
            category: Category::Jump { mode, op },
        }
    }

    /// Addressing mode of this instruction. Branches are always `Relative`.
    pub const fn addressing_mode(&self) -> AddressingMode {
        match self.category {
            Category::Standard { mode, .. }
            | Category::ReadModifyWrite { mode, .. }
            | Category::Jump { mode, .. } => mode,
            Category::Branch { .. } => AddressingMode::Relative,
        }
    }

    /// Encoded length in bytes (1-3).
    pub const fn length(&self) -> u8 {
        self.addressing_mode().length()
    }

    /// Whether this is a conditional branch.
    pub const fn is_branch(&self) -> bool {
        matches!(self.category, Category::Branch { .. })
    }
}

/// Looks up the descriptor for `opcode`, or `None` if it is not supported.
pub fn lookup(opcode: u8) -> Option<&'static Instruction> {
    OPCODE_TABLE[opcode as usize].as_ref()
}

/// Complete 256-entry dispatch table indexed by opcode byte value.
pub static OPCODE_TABLE: [Option<Instruction>; 256] = build_table();

const fn build_table() -> [Option<Instruction>; 256] {
    use AddressingMode::*;

    let entries = [
        // Branches
        Instruction::branch(OP_BCC, "BCC", Status::CARRY, false),
        Instruction::branch(OP_BCS, "BCS", Status::CARRY, true),
        Instruction::branch(OP_BEQ, "BEQ", Status::ZERO, true),
        Instruction::branch(OP_BMI, "BMI", Status::NEGATIVE, true),
        Instruction::branch(OP_BNE, "BNE", Status::ZERO, false),
        Instruction::branch(OP_BPL, "BPL", Status::NEGATIVE, false),
        Instruction::branch(OP_BVC, "BVC", Status::OVERFLOW, false),
        Instruction::branch(OP_BVS, "BVS", Status::OVERFLOW, true),
        // Flags
        Instruction::implied(OP_CLC, "CLC", Operation::Clc),
        Instruction::implied(OP_CLD, "CLD", Operation::Cld),
        Instruction::implied(OP_CLI, "CLI", Operation::Cli),
        Instruction::implied(OP_CLV, "CLV", Operation::Clv),
        Instruction::implied(OP_SEC, "SEC", Operation::Sec),
        Instruction::implied(OP_SED, "SED", Operation::Sed),
        Instruction::implied(OP_SEI, "SEI", Operation::Sei),
        // Increment / decrement
        Instruction::modify(OP_DEC_ZP, "DEC", ZeroPage, Modify::Dec),
        Instruction::modify(OP_DEC_ZX, "DEC", ZeroPageX, Modify::Dec),
        Instruction::modify(OP_DEC_AB, "DEC", Absolute, Modify::Dec),
        Instruction::modify(OP_DEC_AX, "DEC", AbsoluteX, Modify::Dec),
        Instruction::modify(OP_INC_ZP, "INC", ZeroPage, Modify::Inc),
        Instruction::modify(OP_INC_ZX, "INC", ZeroPageX, Modify::Inc),
        Instruction::modify(OP_INC_AB, "INC", Absolute, Modify::Inc),
        Instruction::modify(OP_INC_AX, "INC", AbsoluteX, Modify::Inc),
        Instruction::implied(OP_DEX, "DEX", Operation::Dex),
        Instruction::implied(OP_DEY, "DEY", Operation::Dey),
        Instruction::implied(OP_INX, "INX", Operation::Inx),
        Instruction::implied(OP_INY, "INY", Operation::Iny),
        // Jumps
        Instruction::jump(OP_JMP_AB, "JMP", Absolute, Flow::Jmp),
        Instruction::jump(OP_JMP_ID, "JMP", Indirect, Flow::Jmp),
        Instruction::jump(OP_JSR, "JSR", Absolute, Flow::Jsr),
        Instruction::jump(OP_RTS, "RTS", Implied, Flow::Rts),
        Instruction::jump(OP_RTI, "RTI", Implied, Flow::Rti),
        // Loads
        Instruction::standard(OP_LDA_IM, "LDA", Immediate, Operation::Lda),
        Instruction::standard(OP_LDA_ZP, "LDA", ZeroPage, Operation::Lda),
        Instruction::standard(OP_LDA_ZX, "LDA", ZeroPageX, Operation::Lda),
        Instruction::standard(OP_LDA_AB, "LDA", Absolute, Operation::Lda),
        Instruction::standard(OP_LDA_AX, "LDA", AbsoluteX, Operation::Lda),
        Instruction::standard(OP_LDA_AY, "LDA", AbsoluteY, Operation::Lda),
        Instruction::standard(OP_LDA_IX, "LDA", IndirectX, Operation::Lda),
        Instruction::standard(OP_LDA_IY, "LDA", IndirectY, Operation::Lda),
        Instruction::standard(OP_LDX_IM, "LDX", Immediate, Operation::Ldx),
        Instruction::standard(OP_LDX_ZP, "LDX", ZeroPage, Operation::Ldx),
        Instruction::standard(OP_LDX_ZY, "LDX", ZeroPageY, Operation::Ldx),
        Instruction::standard(OP_LDX_AB, "LDX", Absolute, Operation::Ldx),
        Instruction::standard(OP_LDX_AY, "LDX", AbsoluteY, Operation::Ldx),
        Instruction::standard(OP_LDY_IM, "LDY", Immediate, Operation::Ldy),
        Instruction::standard(OP_LDY_ZP, "LDY", ZeroPage, Operation::Ldy),
        Instruction::standard(OP_LDY_ZX, "LDY", ZeroPageX, Operation::Ldy),
        Instruction::standard(OP_LDY_AB, "LDY", Absolute, Operation::Ldy),
        Instruction::standard(OP_LDY_AX, "LDY", AbsoluteX, Operation::Ldy),
        // Stores
        Instruction::standard(OP_STA_ZP, "STA", ZeroPage, Operation::Sta),
        Instruction::standard(OP_STA_ZX, "STA", ZeroPageX, Operation::Sta),
        Instruction::standard(OP_STA_AB, "STA", Absolute, Operation::Sta),
        Instruction::standard(OP_STA_AX, "STA", AbsoluteX, Operation::Sta),
        Instruction::standard(OP_STA_AY, "STA", AbsoluteY, Operation::Sta),
        Instruction::standard(OP_STA_IX, "STA", IndirectX, Operation::Sta),
        Instruction::standard(OP_STA_IY, "STA", IndirectY, Operation::Sta),
        Instruction::standard(OP_STX_ZP, "STX", ZeroPage, Operation::Stx),
        Instruction::standard(OP_STX_ZY, "STX", ZeroPageY, Operation::Stx),
        Instruction::standard(OP_STX_AB, "STX", Absolute, Operation::Stx),
        Instruction::standard(OP_STY_ZP, "STY", ZeroPage, Operation::Sty),
        Instruction::standard(OP_STY_ZX, "STY", ZeroPageX, Operation::Sty),
        Instruction::standard(OP_STY_AB, "STY", Absolute, Operation::Sty),
        // Misc
        Instruction::implied(OP_NOP, "NOP", Operation::Nop),
        // Transfers
        Instruction::implied(OP_TAX, "TAX", Operation::Tax),
        Instruction::implied(OP_TAY, "TAY", Operation::Tay),
        Instruction::implied(OP_TSX, "TSX", Operation::Tsx),
        Instruction::implied(OP_TXA, "TXA", Operation::Txa),
        Instruction::implied(OP_TXS, "TXS", Operation::Txs),
        Instruction::implied(OP_TYA, "TYA", Operation::Tya),
        // Stack
        Instruction::implied(OP_PHA, "PHA", Operation::Pha),
        Instruction::implied(OP_PHP, "PHP", Operation::Php),
        Instruction::implied(OP_PLA, "PLA", Operation::Pla),
        Instruction::implied(OP_PLP, "PLP", Operation::Plp),
    ];

    let mut table = [None; 256];
    let mut i = 0;
    while i < entries.len() {
        table[entries[i].opcode as usize] = Some(entries[i]);
        i += 1;
    }
    table
}
