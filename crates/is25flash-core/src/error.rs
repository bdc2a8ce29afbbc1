//! Error types for is25flash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Mutating operation a busy poll belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Page Program (0x02)
    PageProgram,
    /// 4 KiB Sector Erase (0x20)
    SectorErase,
    /// 32 KiB Block Erase (0x52)
    Block32Erase,
    /// 64 KiB Block Erase (0xD8)
    Block64Erase,
    /// Chip Erase (0xC7)
    ChipErase,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PageProgram => "page program",
            Self::SectorErase => "sector erase",
            Self::Block32Erase => "32K block erase",
            Self::Block64Erase => "64K block erase",
            Self::ChipErase => "chip erase",
        };
        f.write_str(name)
    }
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Transport errors
    /// The SPI byte exchange failed
    Transport,
    /// The transport exchanged fewer bytes than the frame holds
    ShortTransfer {
        /// Frame length handed to the transport
        expected: usize,
        /// Bytes the transport reports as transferred
        actual: usize,
    },

    // Request errors
    /// Payload or offset exceeds the permitted maximum; nothing was sent
    InvalidLength {
        /// Requested length or offset
        len: usize,
        /// Largest accepted value
        max: usize,
    },
    /// Page program would wrap inside the 256-byte page; nothing was sent
    CrossesPageBoundary {
        /// Start address of the write
        addr: u32,
        /// Payload length
        len: usize,
    },
    /// Address does not fit the 24-bit address phase
    AddressOutOfRange {
        /// Offending address
        addr: u32,
    },
    /// The chip profile does not advertise this command
    Unsupported(&'static str),

    // Device errors
    /// Page program attempted while a previous operation is in progress
    DeviceBusy,
    /// Write Enable Latch did not set after WREN
    WriteEnableFailed,
    /// Busy bit did not clear within the poll timeout
    PollTimeout {
        /// Operation being waited on
        op: OpKind,
    },
    /// JEDEC ID does not match the chip profile
    JedecIdMismatch {
        /// Manufacturer, memory type and capacity bytes read back
        found: [u8; 3],
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "SPI transfer failed"),
            Self::ShortTransfer { expected, actual } => {
                write!(f, "short SPI transfer: {} of {} bytes", actual, expected)
            }
            Self::InvalidLength { len, max } => {
                write!(f, "invalid length {} (maximum {})", len, max)
            }
            Self::CrossesPageBoundary { addr, len } => write!(
                f,
                "write of {} bytes at 0x{:06X} crosses a page boundary",
                len, addr
            ),
            Self::AddressOutOfRange { addr } => {
                write!(f, "address 0x{:08X} exceeds 24-bit address range", addr)
            }
            Self::Unsupported(what) => write!(f, "{} not supported by this chip", what),
            Self::DeviceBusy => write!(f, "device busy"),
            Self::WriteEnableFailed => write!(f, "write enable latch did not set"),
            Self::PollTimeout { op } => write!(f, "{} timed out waiting for ready", op),
            Self::JedecIdMismatch { found } => write!(
                f,
                "JEDEC ID mismatch: found {:02X} {:02X} {:02X}",
                found[0], found[1], found[2]
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
