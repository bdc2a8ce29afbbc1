//! Chip profile and identification types

use alloc::string::String;
use core::fmt;

use heapless::Vec as HVec;

use super::features::Capabilities;
use crate::geometry::PAGE_SIZE;
use crate::spi::AddressWidth;

/// Longest unique ID any known revision returns
pub const MAX_UNIQUE_ID_LEN: usize = 16;

/// JEDEC identification bytes returned by RDID (0x9F)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JedecId {
    /// Manufacturer ID (0x9D for ISSI)
    pub manufacturer: u8,
    /// Memory type
    pub memory_type: u8,
    /// Capacity code (log2 of size in bytes)
    pub capacity: u8,
}

impl JedecId {
    /// Create a JEDEC ID from its three bytes
    pub const fn new(manufacturer: u8, memory_type: u8, capacity: u8) -> Self {
        Self {
            manufacturer,
            memory_type,
            capacity,
        }
    }

    /// Build from the three response bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// The three bytes in wire order
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.manufacturer, self.memory_type, self.capacity]
    }

    /// Size in bytes implied by the capacity code, if plausible
    pub fn capacity_bytes(&self) -> Option<u32> {
        match self.capacity {
            10..=31 => Some(1u32 << self.capacity),
            _ => None,
        }
    }
}

impl fmt::Display for JedecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X} {:02X} {:02X}",
            self.manufacturer, self.memory_type, self.capacity
        )
    }
}

/// IS25LP256 JEDEC ID (ISSI, 3V serial flash, 256 Mbit)
pub const IS25LP256_JEDEC_ID: JedecId = JedecId::new(0x9D, 0x60, 0x19);

/// Factory-programmed unique ID (8 or 16 bytes depending on revision)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueId(HVec<u8, MAX_UNIQUE_ID_LEN>);

impl UniqueId {
    /// Copy up to [`MAX_UNIQUE_ID_LEN`] bytes
    pub fn from_slice(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_UNIQUE_ID_LEN);
        let mut id = HVec::new();
        // Cannot fail: len is clamped to the capacity
        let _ = id.extend_from_slice(&bytes[..len]);
        Self(id)
    }

    /// ID bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of ID bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ID is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Description of one chip revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipProfile {
    /// Profile name
    pub name: String,
    /// Expected JEDEC ID
    pub jedec_id: JedecId,
    /// Total size in bytes
    pub total_size: u32,
    /// Page size for programming
    pub page_size: u16,
    /// Unique ID length in bytes (8 or 16)
    pub unique_id_len: u8,
    /// Optional commands this revision accepts
    pub capabilities: Capabilities,
}

impl ChipProfile {
    /// IS25LP256 with a 16-byte unique ID
    pub fn is25lp256() -> Self {
        Self {
            name: String::from("IS25LP256"),
            jedec_id: IS25LP256_JEDEC_ID,
            total_size: 32 * 1024 * 1024,
            page_size: PAGE_SIZE as u16,
            unique_id_len: 16,
            capabilities: Capabilities::FAST_READ
                | Capabilities::UNIQUE_ID
                | Capabilities::ERASE_32K
                | Capabilities::ERASE_64K
                | Capabilities::CHIP_ERASE
                | Capabilities::DEEP_POWER_DOWN,
        }
    }

    /// IS25LP256 revision that reports an 8-byte unique ID
    pub fn is25lp256_uid8() -> Self {
        Self {
            name: String::from("IS25LP256-UID8"),
            unique_id_len: 8,
            ..Self::is25lp256()
        }
    }

    /// All compiled-in profiles
    pub fn builtin() -> [ChipProfile; 2] {
        [Self::is25lp256(), Self::is25lp256_uid8()]
    }

    /// Find a compiled-in profile by name (case-insensitive)
    pub fn find_builtin(name: &str) -> Option<ChipProfile> {
        Self::builtin()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Check whether a capability is present
    pub fn has(&self, cap: Capabilities) -> bool {
        self.capabilities.contains(cap)
    }

    /// Program page size clamped to the device's page buffer
    pub fn program_page_size(&self) -> usize {
        (self.page_size as usize).clamp(1, PAGE_SIZE)
    }

    /// Bytes reachable through the 3-byte address phase
    pub fn addressable_size(&self) -> u32 {
        self.total_size.min(AddressWidth::ThreeByte.max_size())
    }

    /// Unique ID length clamped to what the driver can hold
    pub fn unique_id_len(&self) -> usize {
        (self.unique_id_len as usize).min(MAX_UNIQUE_ID_LEN)
    }
}

impl Default for ChipProfile {
    fn default() -> Self {
        Self::is25lp256()
    }
}
