//! Chip capability flags

use bitflags::bitflags;

bitflags! {
    /// Optional commands a chip revision accepts
    ///
    /// Read, page program, sector erase and the status/ID commands are
    /// always available; everything else is gated by these flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Supports Fast Read (0x0B)
        const FAST_READ       = 1 << 0;
        /// Supports Read Unique ID (0x4B)
        const UNIQUE_ID       = 1 << 1;
        /// Has 32KB block erase (0x52)
        const ERASE_32K       = 1 << 2;
        /// Has 64KB block erase (0xD8)
        const ERASE_64K       = 1 << 3;
        /// Has chip erase (0xC7)
        const CHIP_ERASE      = 1 << 4;
        /// Supports deep power down (0xB9 / 0xAB)
        const DEEP_POWER_DOWN = 1 << 5;
        /// Has status register 2 (0x35)
        const STATUS_REG_2    = 1 << 6;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::empty()
    }
}
