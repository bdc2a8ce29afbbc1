//! Sector and block arithmetic
//!
//! The linear address space is carved into 4 KiB sectors, 32 KiB blocks and
//! 64 KiB blocks. A unit index and its start address are two views of the
//! same quantity: `address = index << SHIFT`.

use crate::error::{Error, Result};
use crate::spi::{opcodes, MAX_3B_ADDRESS};

/// Program page size in bytes
pub const PAGE_SIZE: usize = 256;

/// Erase granularity of the device
pub trait EraseUnit: Copy {
    /// log2 of the unit size
    const SHIFT: u32;
    /// Erase opcode for this unit
    const OPCODE: u8;
    /// Human readable name, used in logs
    const NAME: &'static str;

    /// Unit size in bytes
    const SIZE: u32 = 1 << Self::SHIFT;

    /// Unit index
    fn index(self) -> u32;

    /// Build a unit from its index without range checks
    fn from_index(index: u32) -> Self;

    /// Start address of the unit
    fn address(self) -> u32 {
        self.index() << Self::SHIFT
    }

    /// Unit containing `addr`
    fn containing(addr: u32) -> Self {
        Self::from_index(addr >> Self::SHIFT)
    }

    /// Offset of `addr` within its unit
    fn offset_of(addr: u32) -> u32 {
        addr & (Self::SIZE - 1)
    }

    /// Linear address of `offset` inside this unit
    fn join(self, offset: u32) -> Result<u32> {
        if offset >= Self::SIZE {
            return Err(Error::InvalidLength {
                len: offset as usize,
                max: Self::SIZE as usize - 1,
            });
        }
        Ok(self.address() | offset)
    }

    /// Number of units reachable through the 3-byte address phase
    fn count_3b() -> u32 {
        (MAX_3B_ADDRESS >> Self::SHIFT) + 1
    }

    /// Reject indices whose address does not fit 24 bits
    fn check_3b(self) -> Result<()> {
        if self.index() >= Self::count_3b() {
            return Err(Error::AddressOutOfRange {
                addr: self.index().wrapping_shl(Self::SHIFT),
            });
        }
        Ok(())
    }
}

macro_rules! erase_unit {
    ($(#[$meta:meta])* $name:ident, $shift:expr, $opcode:expr, $label:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl EraseUnit for $name {
            const SHIFT: u32 = $shift;
            const OPCODE: u8 = $opcode;
            const NAME: &'static str = $label;

            fn index(self) -> u32 {
                self.0
            }

            fn from_index(index: u32) -> Self {
                Self(index)
            }
        }
    };
}

erase_unit!(
    /// 4 KiB sector (12 low address bits are the in-sector offset)
    Sector,
    12,
    opcodes::SE_20,
    "sector"
);
erase_unit!(
    /// 32 KiB block (15 low address bits are the in-block offset)
    Block32,
    15,
    opcodes::BE_52,
    "32K block"
);
erase_unit!(
    /// 64 KiB block (16 low address bits are the in-block offset)
    Block64,
    16,
    opcodes::BE_D8,
    "64K block"
);

/// Offset of `addr` within its program page of `page_size` bytes
pub const fn page_offset(addr: u32, page_size: usize) -> usize {
    addr as usize % page_size
}

/// Whether `len` bytes starting at `addr` stay inside one page
pub const fn fits_in_page(addr: u32, len: usize, page_size: usize) -> bool {
    page_offset(addr, page_size) + len <= page_size
}
