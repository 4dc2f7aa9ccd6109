//! # Branch Instructions
//!
//! This module implements the conditional branch operations BCC, BCS, BEQ,
//! BNE, BMI, BPL, BVC and BVS.
//!
//! All branch instructions use relative addressing with a signed 8-bit
//! offset, measured from the address following the two-byte instruction.

use crate::registers::{relative_target, Status};
use crate::{MemoryBus, CPU};

/// Executes a conditional branch.
///
/// The branch is taken when `status & flag` equals `flag` (for `set`) or zero
/// (for `!set`). The offset byte is only read when the branch is taken.
///
/// No flags are affected.
pub(crate) fn execute_branch<M: MemoryBus>(cpu: &mut CPU<M>, flag: Status, set: bool) {
    let expected = if set { flag } else { Status::empty() };
    let pc = cpu.regs.pc;

    if cpu.regs.status & flag == expected {
        let offset = cpu.read_byte(pc.wrapping_add(1));
        cpu.regs.pc = relative_target(pc, offset);
    } else {
        cpu.regs.pc = pc.wrapping_add(2);
    }
}
