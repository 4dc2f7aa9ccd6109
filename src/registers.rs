//! # Register and Flag State
//!
//! The architectural state of the processor: the three 8-bit data registers,
//! the 16-bit program counter, the 8-bit stack pointer and the status byte.
//!
//! `Registers` is a plain `Copy` value with no knowledge of memory or of the
//! run loop, so snapshots can be taken and compared freely.

use bitflags::bitflags;

bitflags! {
    /// Processor status register (NV--DIZC).
    ///
    /// Bits 0x10 and 0x20 have no name here. They are never set by the
    /// engine itself but survive a full status byte pulled from the stack
    /// (RTI, PLP).
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry flag
        const CARRY = 0x01;
        /// Zero flag (set if result is zero)
        const ZERO = 0x02;
        /// Interrupt disable flag
        const INTERRUPT = 0x04;
        /// Decimal mode flag (stored, never consulted by arithmetic)
        const DECIMAL = 0x08;
        /// Overflow flag
        const OVERFLOW = 0x40;
        /// Negative flag (set if bit 7 of result is 1)
        const NEGATIVE = 0x80;
    }
}

/// Base address of the fixed stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// Snapshot of the CPU-visible registers.
///
/// # Examples
///
/// ```
/// use emu6502::{Registers, Status};
///
/// let mut regs = Registers::default();
/// regs.set_zero_negative(0x80);
/// assert!(regs.status.contains(Status::NEGATIVE));
/// assert!(!regs.status.contains(Status::ZERO));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    /// Accumulator register
    pub a: u8,

    /// X index register
    pub x: u8,

    /// Y index register
    pub y: u8,

    /// Program counter (address of next opcode to fetch)
    pub pc: u16,

    /// Stack pointer (0x0100 | sp gives the full stack address)
    pub sp: u8,

    /// Status flags
    pub status: Status,
}

impl Registers {
    /// Sets Zero iff `value == 0` and Negative iff bit 7 of `value` is set,
    /// clearing each flag otherwise. All other flags are left untouched.
    pub fn set_zero_negative(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Address the next push will write to.
    pub fn stack_address(&self) -> u16 {
        STACK_PAGE | self.sp as u16
    }
}

/// Decodes an 8-bit two's-complement branch offset into `(magnitude, negative)`.
///
/// An offset with bit 7 set is negative with magnitude `(offset ^ 0xFF) + 1`.
/// The magnitude of `0x80` is 128, which does not fit in an `i8`, so it is
/// returned widened.
///
/// ```
/// use emu6502::registers::decode_offset;
///
/// assert_eq!(decode_offset(0x05), (5, false));
/// assert_eq!(decode_offset(0xFE), (2, true));
/// assert_eq!(decode_offset(0x80), (128, true));
/// ```
pub fn decode_offset(offset: u8) -> (u16, bool) {
    if offset & 0x80 != 0 {
        ((offset ^ 0xFF) as u16 + 1, true)
    } else {
        (offset as u16, false)
    }
}

/// Computes the target of a relative branch located at `pc`.
///
/// The displacement is applied to the address just past the two-byte branch
/// instruction, so this must be called with the PC of the branch itself.
pub fn relative_target(pc: u16, offset: u8) -> u16 {
    let base = pc.wrapping_add(2);
    match decode_offset(offset) {
        (magnitude, true) => base.wrapping_sub(magnitude),
        (magnitude, false) => base.wrapping_add(magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_zero_negative_zero() {
        let mut regs = Registers::default();
        regs.status.insert(Status::NEGATIVE | Status::CARRY);

        regs.set_zero_negative(0x00);

        assert!(regs.status.contains(Status::ZERO));
        assert!(!regs.status.contains(Status::NEGATIVE));
        // Unrelated flags untouched
        assert!(regs.status.contains(Status::CARRY));
    }

    #[test]
    fn test_set_zero_negative_negative() {
        let mut regs = Registers::default();
        regs.status.insert(Status::ZERO);

        regs.set_zero_negative(0xC0);

        assert!(!regs.status.contains(Status::ZERO));
        assert!(regs.status.contains(Status::NEGATIVE));
    }

    #[test]
    fn test_status_bits_match_hardware_layout() {
        assert_eq!(Status::CARRY.bits(), 0x01);
        assert_eq!(Status::ZERO.bits(), 0x02);
        assert_eq!(Status::INTERRUPT.bits(), 0x04);
        assert_eq!(Status::DECIMAL.bits(), 0x08);
        assert_eq!(Status::OVERFLOW.bits(), 0x40);
        assert_eq!(Status::NEGATIVE.bits(), 0x80);
    }

    #[test]
    fn test_unnamed_bits_retained() {
        let status = Status::from_bits_retain(0x30);
        assert_eq!(status.bits(), 0x30);
        assert!(!status.contains(Status::CARRY));
    }

    #[test]
    fn test_relative_target_forward_and_backward() {
        assert_eq!(relative_target(0x8000, 0x10), 0x8012);
        assert_eq!(relative_target(0x8000, 0xFE), 0x8000); // branch to self
        assert_eq!(relative_target(0x8010, 0x80), 0x7F92);
    }

    #[test]
    fn test_relative_target_wraps_address_space() {
        assert_eq!(relative_target(0xFFFE, 0x01), 0x0001);
        assert_eq!(relative_target(0x0000, 0xF0), 0xFFF2);
    }

    #[test]
    fn test_stack_address() {
        let regs = Registers {
            sp: 0xFD,
            ..Registers::default()
        };
        assert_eq!(regs.stack_address(), 0x01FD);
    }
}
