//! Address width types

use crate::error::{Error, Result};

/// Highest address reachable through a 3-byte address phase
pub const MAX_3B_ADDRESS: u32 = 0x00FF_FFFF;

/// Address width for SPI commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// No address phase
    #[default]
    None,
    /// 3-byte (24-bit) address - supports up to 16 MiB
    ThreeByte,
}

impl AddressWidth {
    /// Returns the number of address bytes
    pub const fn bytes(&self) -> usize {
        match self {
            Self::None => 0,
            Self::ThreeByte => 3,
        }
    }

    /// Returns the maximum addressable size in bytes
    pub const fn max_size(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::ThreeByte => MAX_3B_ADDRESS + 1,
        }
    }

    /// Reject addresses whose upper byte would be silently dropped
    pub fn check(&self, address: u32) -> Result<()> {
        match self {
            Self::ThreeByte if address > MAX_3B_ADDRESS => {
                Err(Error::AddressOutOfRange { addr: address })
            }
            _ => Ok(()),
        }
    }

    /// Encode an address into bytes, most significant first
    pub fn encode(&self, address: u32, buf: &mut [u8]) {
        match self {
            Self::None => {}
            Self::ThreeByte => {
                buf[0] = (address >> 16) as u8;
                buf[1] = (address >> 8) as u8;
                buf[2] = address as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_big_endian() {
        let mut buf = [0u8; 3];
        AddressWidth::ThreeByte.encode(0x12_3456, &mut buf);
        assert_eq!(buf, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_check_rejects_upper_byte() {
        assert!(AddressWidth::ThreeByte.check(MAX_3B_ADDRESS).is_ok());
        assert_eq!(
            AddressWidth::ThreeByte.check(0x0100_0000),
            Err(Error::AddressOutOfRange { addr: 0x0100_0000 })
        );
        assert!(AddressWidth::None.check(0xFFFF_FFFF).is_ok());
    }
}
