//! # Address Space
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from the
//! shape of the address space, and the two shapes a machine can be built with:
//!
//! - [`FlatMemory`]: one contiguous, fully writable 64KB buffer ("full
//!   read/write" mode). Used for self-contained test images.
//! - [`BankedMemory`]: low RAM, an optional RAM window and a read-only ROM
//!   region, with open bus everywhere else.
//!
//! ## Design Principles
//!
//! The bus follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - Unmapped reads return 0 ("open bus")
//! - Writes to ROM/unmapped regions are ignored
//!
//! The mode is chosen by picking the type at construction and can never change
//! afterwards.

use crate::{SizeError, VECTOR_IRQ, VECTOR_NMI, VECTOR_RESET};

/// Size of a full 16-bit address space.
pub const ADDRESS_SPACE_SIZE: usize = 0x10000;

/// Size of the banked-mode low RAM region (zero page, stack, work RAM).
pub const LOW_RAM_SIZE: usize = 0x1000;

/// Size of the banked-mode RAM window at 0x6000-0x7FFF.
pub const WINDOW_RAM_SIZE: usize = 0x2000;

/// Banked ROM images must be a multiple of this many bytes.
pub const ROM_PAGE_SIZE: usize = 256;

const LOW_RAM_END: u16 = 0x1000;
const WINDOW_START: u16 = 0x6000;
const ROM_START: u16 = 0x8000;

/// Memory bus trait for CPU to read/write bytes.
///
/// The CPU accesses all memory (RAM, ROM, open bus) through this abstraction;
/// no instruction handler ever touches a backing buffer directly.
///
/// # Design
///
/// - `read(&self)`: Immutable reference allows shared reads
/// - `write(&mut self)`: Mutable reference makes side effects explicit
/// - No error types: 6502 hardware has no bus error mechanism
///
/// # Examples
///
/// ```
/// use emu6502::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
///
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
///
/// mem.write(0x2000, 0x34);
/// mem.write(0x2001, 0x12);
/// assert_eq!(mem.read_word(0x2000), 0x1234);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic. Unmapped addresses read as zero.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. Writes to read-only or unmapped
    /// addresses are ignored.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word from `addr` and `addr + 1`.
    ///
    /// The second address wraps naturally at 0xFFFF; there is no page
    /// wraparound.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses (0x0000-0xFFFF) are mapped to a single contiguous
/// array and every address is writable, including the vectors.
///
/// # Examples
///
/// ```
/// use emu6502::{FlatMemory, MemoryBus};
///
/// let mut image = vec![0u8; 0x10000];
/// image[0xFFFC] = 0x00;
/// image[0xFFFD] = 0x80;
///
/// let mem = FlatMemory::from_image(image).unwrap();
/// assert_eq!(mem.read_word(0xFFFC), 0x8000);
///
/// assert!(FlatMemory::from_image(vec![0u8; 0x8000]).is_err());
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; ADDRESS_SPACE_SIZE]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; ADDRESS_SPACE_SIZE]),
        }
    }

    /// Wraps a complete 64KB image.
    ///
    /// # Errors
    ///
    /// Returns `SizeError::FlatImage` unless the image is exactly 65536 bytes.
    pub fn from_image(image: Vec<u8>) -> Result<Self, SizeError> {
        let data: Box<[u8; ADDRESS_SPACE_SIZE]> = image
            .into_boxed_slice()
            .try_into()
            .map_err(|image: Box<[u8]>| SizeError::FlatImage { len: image.len() })?;

        Ok(Self { data })
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

/// Bank-mapped address space.
///
/// # Memory Layout
///
/// | Range         | Backing                                   |
/// |---------------|-------------------------------------------|
/// | 0x0000-0x0FFF | 4KB RAM (zero page, stack, work RAM)      |
/// | 0x1000-0x5FFF | open bus, reserved for I/O registers      |
/// | 0x6000-0x7FFF | optional 8KB RAM window, else open bus    |
/// | 0x8000-0xFFFF | ROM, indexed by `addr % rom.len()`        |
///
/// Indexing the ROM by the full address means a ROM smaller than 32KB is
/// mirrored through the upper half, and the vectors land in its last six
/// bytes whenever its length is a power of two.
///
/// # Examples
///
/// ```
/// use emu6502::{BankedMemory, MemoryBus};
///
/// let mut mem = BankedMemory::new(vec![0xEA; 0x8000], false).unwrap();
///
/// mem.write(0x0010, 0x42);
/// assert_eq!(mem.read(0x0010), 0x42);
///
/// // ROM is read-only
/// mem.write(0x8000, 0x00);
/// assert_eq!(mem.read(0x8000), 0xEA);
///
/// // No RAM window: open bus
/// mem.write(0x6000, 0x42);
/// assert_eq!(mem.read(0x6000), 0x00);
/// ```
pub struct BankedMemory {
    low: Box<[u8; LOW_RAM_SIZE]>,
    window: Option<Box<[u8; WINDOW_RAM_SIZE]>>,
    rom: Vec<u8>,
}

impl BankedMemory {
    /// Builds a banked address space around `rom`, allocating the 4KB low
    /// region and, if `window_ram` is set, the 8KB RAM window.
    ///
    /// # Errors
    ///
    /// - `SizeError::EmptyRom` if `rom` is empty
    /// - `SizeError::NotPageAligned` if its length is not a multiple of 256
    pub fn new(rom: Vec<u8>, window_ram: bool) -> Result<Self, SizeError> {
        if rom.is_empty() {
            return Err(SizeError::EmptyRom);
        }
        if rom.len() % ROM_PAGE_SIZE != 0 {
            return Err(SizeError::NotPageAligned { len: rom.len() });
        }

        Ok(Self {
            low: Box::new([0; LOW_RAM_SIZE]),
            window: window_ram.then(|| Box::new([0; WINDOW_RAM_SIZE])),
            rom,
        })
    }

    /// Length of the ROM image in bytes.
    pub fn rom_len(&self) -> usize {
        self.rom.len()
    }

    /// Whether the 0x6000-0x7FFF RAM window is backed.
    pub fn has_window_ram(&self) -> bool {
        self.window.is_some()
    }
}

impl MemoryBus for BankedMemory {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..LOW_RAM_END => self.low[addr as usize],
            WINDOW_START..ROM_START => match &self.window {
                Some(window) => window[addr as usize % WINDOW_RAM_SIZE],
                None => 0,
            },
            ROM_START..=0xFFFF => self.rom[addr as usize % self.rom.len()],
            // Open bus
            _ => 0,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..LOW_RAM_END => self.low[addr as usize] = value,
            WINDOW_START..ROM_START => {
                if let Some(window) = &mut self.window {
                    window[addr as usize % WINDOW_RAM_SIZE] = value;
                }
            }
            // 0x1000-0x5FFF is reserved for registers; ROM is read-only.
            _ => {}
        }
    }
}

/// Pads `program` with `0xFF` to a multiple of 256 bytes and writes the NMI,
/// reset and IRQ vectors into its last six bytes.
///
/// An empty program becomes one full page. Used to turn a short hand-written
/// program into a ROM image for [`BankedMemory`].
///
/// ```
/// use emu6502::memory::pad_with_vectors;
///
/// let rom = pad_with_vectors(vec![0xA9, 0x2A], 0x8000, 0x8000, 0x8000);
/// assert_eq!(rom.len(), 256);
/// assert_eq!(&rom[0xFC..], &[0x00, 0x80, 0x00, 0x80]);
/// ```
pub fn pad_with_vectors(mut program: Vec<u8>, nmi: u16, reset: u16, irq: u16) -> Vec<u8> {
    let padded = program.len().div_ceil(ROM_PAGE_SIZE).max(1) * ROM_PAGE_SIZE;
    program.resize(padded, 0xFF);

    // Vectors sit at the same offsets from the end of the image as they do
    // from the end of the address space.
    for (vector, value) in [(VECTOR_NMI, nmi), (VECTOR_RESET, reset), (VECTOR_IRQ, irq)] {
        let offset = padded - (ADDRESS_SPACE_SIZE - vector as usize);
        program[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_memory_read_write() {
        let mut mem = FlatMemory::new();

        // Initially all zeros
        assert_eq!(mem.read(0x0000), 0x00);
        assert_eq!(mem.read(0xFFFF), 0x00);

        mem.write(0x1234, 0x42);
        assert_eq!(mem.read(0x1234), 0x42);

        // Verify other addresses unchanged
        assert_eq!(mem.read(0x1233), 0x00);
        assert_eq!(mem.read(0x1235), 0x00);
    }

    #[test]
    fn test_flat_memory_full_range_writable() {
        let mut mem = FlatMemory::new();

        mem.write(0x0000, 0x01);
        mem.write(0x7FFF, 0x7F);
        mem.write(0x8000, 0x80);
        mem.write(0xFFFF, 0xFF);

        assert_eq!(mem.read(0x0000), 0x01);
        assert_eq!(mem.read(0x7FFF), 0x7F);
        assert_eq!(mem.read(0x8000), 0x80);
        assert_eq!(mem.read(0xFFFF), 0xFF);
    }

    #[test]
    fn test_flat_memory_rejects_wrong_size() {
        assert_eq!(
            FlatMemory::from_image(vec![0; 0xFFFF]).err(),
            Some(SizeError::FlatImage { len: 0xFFFF })
        );
        assert_eq!(
            FlatMemory::from_image(vec![0; 0x10001]).err(),
            Some(SizeError::FlatImage { len: 0x10001 })
        );
        assert!(FlatMemory::from_image(vec![0; 0x10000]).is_ok());
    }

    #[test]
    fn test_read_word_wraps_at_top_of_memory() {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFF, 0x34);
        mem.write(0x0000, 0x12);
        assert_eq!(mem.read_word(0xFFFF), 0x1234);
    }

    #[test]
    fn test_banked_rejects_bad_rom() {
        assert_eq!(BankedMemory::new(Vec::new(), false).err(), Some(SizeError::EmptyRom));
        assert_eq!(
            BankedMemory::new(vec![0; 300], false).err(),
            Some(SizeError::NotPageAligned { len: 300 })
        );
    }

    #[test]
    fn test_banked_gap_is_open_bus() {
        let mut mem = BankedMemory::new(vec![0xAA; 0x8000], true).unwrap();

        for addr in [0x1000, 0x2345, 0x5FFF] {
            mem.write(addr, 0x42);
            assert_eq!(mem.read(addr), 0x00);
        }
    }

    #[test]
    fn test_banked_window_ram() {
        let mut mem = BankedMemory::new(vec![0; 256], true).unwrap();
        assert!(mem.has_window_ram());

        mem.write(0x6000, 0x11);
        mem.write(0x7FFF, 0x22);

        assert_eq!(mem.read(0x6000), 0x11);
        assert_eq!(mem.read(0x7FFF), 0x22);
        // Low RAM is a separate region
        assert_eq!(mem.read(0x0000), 0x00);
    }

    #[test]
    fn test_banked_small_rom_mirrors() {
        let mut rom = vec![0; 256];
        rom[0] = 0x11;
        rom[0xFF] = 0x22;
        let mem = BankedMemory::new(rom, false).unwrap();

        assert_eq!(mem.read(0x8000), 0x11);
        assert_eq!(mem.read(0x8100), 0x11);
        assert_eq!(mem.read(0xFFFF), 0x22);
    }

    #[test]
    fn test_pad_with_vectors_layout() {
        let rom = pad_with_vectors(vec![0xEA; 300], 0x1111, 0x8000, 0x3333);

        assert_eq!(rom.len(), 512);
        assert_eq!(rom[299], 0xEA);
        assert_eq!(rom[300], 0xFF);
        assert_eq!(&rom[506..512], &[0x11, 0x11, 0x00, 0x80, 0x33, 0x33]);

        let mem = BankedMemory::new(rom, false).unwrap();
        assert_eq!(mem.read_word(VECTOR_RESET), 0x8000);
    }
}
