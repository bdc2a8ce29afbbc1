//! Chip profile loading from RON files

use alloc::{string::String, vec::Vec};
use std::format;
use std::fs;
use std::io;
use std::path::Path;

use super::types::{ChipProfile, JedecId, MAX_UNIQUE_ID_LEN};
use super::Capabilities;
use crate::geometry::PAGE_SIZE;

/// Error type for profile loading
#[derive(Debug)]
pub enum ProfileError {
    /// I/O error reading files
    Io(io::Error),
    /// RON parsing error
    Parse(ron::error::SpannedError),
    /// Validation error
    Validation(String),
}

impl From<io::Error> for ProfileError {
    fn from(e: io::Error) -> Self {
        ProfileError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ProfileError {
    fn from(e: ron::error::SpannedError) -> Self {
        ProfileError::Parse(e)
    }
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Io(e) => write!(f, "I/O error: {}", e),
            ProfileError::Parse(e) => write!(f, "Parse error: {}", e),
            ProfileError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ProfileError {}

// ============================================================================
// RON deserialization types (intermediate format)
// ============================================================================

/// Size specification with human-readable units (for RON parsing)
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub enum Size {
    /// Size in bytes
    B(u32),
    /// Size in kibibytes (1024 bytes)
    KiB(u32),
    /// Size in mebibytes (1024 * 1024 bytes)
    MiB(u32),
}

impl Size {
    /// Convert to bytes, or `None` if the size does not fit in 32 bits
    pub fn to_bytes(self) -> Option<u32> {
        match self {
            Size::B(n) => Some(n),
            Size::KiB(n) => n.checked_mul(1024),
            Size::MiB(n) => n.checked_mul(1024 * 1024),
        }
    }
}

/// Capability flags (RON format)
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(default)]
struct CapabilitiesDef {
    fast_read: bool,
    unique_id: bool,
    erase_32k: bool,
    erase_64k: bool,
    chip_erase: bool,
    deep_power_down: bool,
    status_reg_2: bool,
}

impl From<CapabilitiesDef> for Capabilities {
    fn from(def: CapabilitiesDef) -> Self {
        let mut c = Capabilities::empty();
        c.set(Capabilities::FAST_READ, def.fast_read);
        c.set(Capabilities::UNIQUE_ID, def.unique_id);
        c.set(Capabilities::ERASE_32K, def.erase_32k);
        c.set(Capabilities::ERASE_64K, def.erase_64k);
        c.set(Capabilities::CHIP_ERASE, def.chip_erase);
        c.set(Capabilities::DEEP_POWER_DOWN, def.deep_power_down);
        c.set(Capabilities::STATUS_REG_2, def.status_reg_2);
        c
    }
}

/// Single profile definition in RON format
#[derive(Debug, Clone, serde::Deserialize)]
struct ProfileDef {
    name: String,
    jedec_id: (u8, u8, u8),
    total_size: Size,
    #[serde(default = "default_page_size")]
    page_size: u16,
    unique_id_len: u8,
    #[serde(default)]
    capabilities: CapabilitiesDef,
}

fn default_page_size() -> u16 {
    256
}

/// Profile file: a list of revisions
#[derive(Debug, Clone, serde::Deserialize)]
struct ProfileFileDef {
    profiles: Vec<ProfileDef>,
}

impl TryFrom<ProfileDef> for ChipProfile {
    type Error = ProfileError;

    fn try_from(def: ProfileDef) -> Result<Self, ProfileError> {
        if def.unique_id_len as usize > MAX_UNIQUE_ID_LEN {
            return Err(ProfileError::Validation(format!(
                "{}: unique_id_len {} exceeds {}",
                def.name, def.unique_id_len, MAX_UNIQUE_ID_LEN
            )));
        }
        let total_size = match def.total_size.to_bytes() {
            Some(0) | None => {
                return Err(ProfileError::Validation(format!(
                    "{}: total_size {:?} is zero or exceeds 4 GiB",
                    def.name, def.total_size
                )))
            }
            Some(n) => n,
        };
        if def.page_size == 0
            || !def.page_size.is_power_of_two()
            || def.page_size as usize > PAGE_SIZE
        {
            return Err(ProfileError::Validation(format!(
                "{}: page_size {} is not a power of two up to {}",
                def.name, def.page_size, PAGE_SIZE
            )));
        }

        let (manufacturer, memory_type, capacity) = def.jedec_id;
        Ok(ChipProfile {
            name: def.name,
            jedec_id: JedecId::new(manufacturer, memory_type, capacity),
            total_size,
            page_size: def.page_size,
            unique_id_len: def.unique_id_len,
            capabilities: def.capabilities.into(),
        })
    }
}

// ============================================================================
// Profile database
// ============================================================================

/// Runtime profile database
///
/// Starts with the compiled-in profiles; RON files add to it.
#[derive(Debug, Clone)]
pub struct ProfileDatabase {
    profiles: Vec<ChipProfile>,
}

impl Default for ProfileDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileDatabase {
    /// Create a database holding the compiled-in profiles
    pub fn new() -> Self {
        Self {
            profiles: ChipProfile::builtin().into_iter().collect(),
        }
    }

    /// Load profiles from a single RON file
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ProfileError> {
        let content = fs::read_to_string(path)?;
        self.load_ron(&content)
    }

    /// Load profiles from a RON string
    ///
    /// A profile with the same name as an existing one replaces it.
    pub fn load_ron(&mut self, content: &str) -> Result<usize, ProfileError> {
        let file: ProfileFileDef = ron::from_str(content)?;
        let count = file.profiles.len();

        for def in file.profiles {
            let profile = ChipProfile::try_from(def)?;
            self.profiles
                .retain(|p| !p.name.eq_ignore_ascii_case(&profile.name));
            self.profiles.push(profile);
        }

        Ok(count)
    }

    /// Get all profiles in the database
    pub fn profiles(&self) -> &[ChipProfile] {
        &self.profiles
    }

    /// Get the number of profiles in the database
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Find a profile by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Option<&ChipProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Find all profiles matching a JEDEC ID
    pub fn find_by_jedec_id(&self, id: JedecId) -> Vec<&ChipProfile> {
        self.profiles.iter().filter(|p| p.jedec_id == id).collect()
    }
}
