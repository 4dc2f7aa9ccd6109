//! # Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED and CLV each set or clear exactly one status
//! bit. The decimal flag is stored but has no effect on execution.

use crate::registers::Status;
use crate::{MemoryBus, CPU};

/// Sets (`value == true`) or clears a single status flag.
pub(crate) fn execute_flag<M: MemoryBus>(cpu: &mut CPU<M>, flag: Status, value: bool) {
    cpu.regs.status.set(flag, value);
}
