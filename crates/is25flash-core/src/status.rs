//! Status register decoding

use bitflags::bitflags;

bitflags! {
    /// Status register bits as returned by RDSR (0x05)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// Write In Progress / Busy
        const WIP  = 1 << 0;
        /// Write Enable Latch
        const WEL  = 1 << 1;
        /// Block Protect bit 0
        const BP0  = 1 << 2;
        /// Block Protect bit 1
        const BP1  = 1 << 3;
        /// Block Protect bit 2
        const BP2  = 1 << 4;
        /// Block Protect bit 3
        const BP3  = 1 << 5;
        /// Quad Enable
        const QE   = 1 << 6;
        /// Status Register Write Disable
        const SRWD = 1 << 7;

        /// All block protect bits
        const BP = Self::BP0.bits() | Self::BP1.bits() | Self::BP2.bits() | Self::BP3.bits();
    }
}

impl Status {
    /// An erase or program operation is in progress
    pub const fn is_busy(self) -> bool {
        self.contains(Self::WIP)
    }

    /// The device will accept the next program/erase command
    pub const fn is_write_enabled(self) -> bool {
        self.contains(Self::WEL)
    }

    /// Block protect level (BP3..BP0)
    pub const fn block_protect(self) -> u8 {
        (self.bits() & Self::BP.bits()) >> 2
    }
}

impl From<u8> for Status {
    fn from(raw: u8) -> Self {
        Status::from_bits_retain(raw)
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "0x{:02X} (busy={}, wel={}, bp={}, qe={}, srwd={})",
            self.bits(),
            self.is_busy() as u8,
            self.is_write_enabled() as u8,
            self.block_protect(),
            self.contains(Self::QE) as u8,
            self.contains(Self::SRWD) as u8
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_and_wel() {
        let s = Status::from(0x03);
        assert!(s.is_busy());
        assert!(s.is_write_enabled());

        let s = Status::from(0x02);
        assert!(!s.is_busy());
        assert!(s.is_write_enabled());
    }

    #[test]
    fn test_block_protect_level() {
        let s = Status::from(0b0011_1100);
        assert_eq!(s.block_protect(), 0xF);
        assert_eq!(Status::from(0x04).block_protect(), 1);
    }
}
