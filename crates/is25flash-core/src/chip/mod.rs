//! Chip profiles
//!
//! Revisions of the IS25LP256 differ in unique ID length and in which
//! optional commands they accept. A [`ChipProfile`] captures those
//! differences so the driver never hardcodes a single variant.

mod features;
mod types;

#[cfg(feature = "std")]
mod database;

pub use features::Capabilities;
pub use types::*;

#[cfg(feature = "std")]
pub use database::*;
