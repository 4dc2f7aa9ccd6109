//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all supported instructions,
//! organized by family. [`execute`] dispatches on the descriptor's category;
//! the per-family functions only mutate registers and memory.
//!
//! ## Families
//!
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod stack;
pub(crate) mod transfer;

use crate::addressing::{resolve, Operand};
use crate::opcodes::{Category, Flow, Instruction, Operation};
use crate::registers::Status;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes one decoded instruction.
///
/// Standard and Read-Modify-Write instructions advance PC by their encoded
/// length; branches and jumps set PC themselves.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    match instruction.category {
        Category::Standard { mode, op } => {
            let operand = resolve(cpu, mode);
            execute_standard(cpu, instruction, op, operand)?;
            advance(cpu, operand);
        }
        Category::ReadModifyWrite { mode, op } => {
            let operand = resolve(cpu, mode);
            let addr = effective_address(cpu, instruction, operand)?;
            inc_dec::execute_modify(cpu, addr, op);
            advance(cpu, operand);
        }
        Category::Branch { flag, set } => branches::execute_branch(cpu, flag, set),
        Category::Jump { mode, op } => {
            let operand = resolve(cpu, mode);
            match op {
                Flow::Jmp => {
                    let target = effective_address(cpu, instruction, operand)?;
                    control::execute_jmp(cpu, target);
                }
                Flow::Jsr => {
                    let target = effective_address(cpu, instruction, operand)?;
                    control::execute_jsr(cpu, target);
                }
                Flow::Rts => control::execute_rts(cpu),
                Flow::Rti => control::execute_rti(cpu),
            }
        }
    }

    Ok(())
}

fn execute_standard<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
    op: Operation,
    operand: Operand,
) -> Result<(), ExecutionError> {
    match op {
        // Memory operations
        Operation::Lda | Operation::Ldx | Operation::Ldy | Operation::Sta | Operation::Stx | Operation::Sty => {
            let addr = effective_address(cpu, instruction, operand)?;
            match op {
                Operation::Lda => load_store::execute_lda(cpu, addr),
                Operation::Ldx => load_store::execute_ldx(cpu, addr),
                Operation::Ldy => load_store::execute_ldy(cpu, addr),
                Operation::Sta => load_store::execute_sta(cpu, addr),
                Operation::Stx => load_store::execute_stx(cpu, addr),
                _ => load_store::execute_sty(cpu, addr),
            }
        }

        // Register operations
        Operation::Tax => transfer::execute_tax(cpu),
        Operation::Tay => transfer::execute_tay(cpu),
        Operation::Tsx => transfer::execute_tsx(cpu),
        Operation::Txa => transfer::execute_txa(cpu),
        Operation::Txs => transfer::execute_txs(cpu),
        Operation::Tya => transfer::execute_tya(cpu),
        Operation::Dex => inc_dec::execute_dex(cpu),
        Operation::Dey => inc_dec::execute_dey(cpu),
        Operation::Inx => inc_dec::execute_inx(cpu),
        Operation::Iny => inc_dec::execute_iny(cpu),
        Operation::Clc => flags::execute_flag(cpu, Status::CARRY, false),
        Operation::Cld => flags::execute_flag(cpu, Status::DECIMAL, false),
        Operation::Cli => flags::execute_flag(cpu, Status::INTERRUPT, false),
        Operation::Clv => flags::execute_flag(cpu, Status::OVERFLOW, false),
        Operation::Sec => flags::execute_flag(cpu, Status::CARRY, true),
        Operation::Sed => flags::execute_flag(cpu, Status::DECIMAL, true),
        Operation::Sei => flags::execute_flag(cpu, Status::INTERRUPT, true),
        Operation::Pha => stack::execute_pha(cpu),
        Operation::Php => stack::execute_php(cpu),
        Operation::Pla => stack::execute_pla(cpu),
        Operation::Plp => stack::execute_plp(cpu),
        Operation::Nop => {}
    }

    Ok(())
}

/// Unwraps the resolved address of an operation that needs one.
fn effective_address<M: MemoryBus>(
    cpu: &CPU<M>,
    instruction: &Instruction,
    operand: Operand,
) -> Result<u16, ExecutionError> {
    operand.address.ok_or(ExecutionError::MissingOperand {
        opcode: instruction.opcode,
        pc: cpu.pc(),
    })
}

fn advance<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.regs.pc = cpu.regs.pc.wrapping_add(operand.length as u16);
}
