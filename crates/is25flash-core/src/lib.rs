//! is25flash-core - Command protocol driver for the IS25LP256 SPI NOR flash
//!
//! This crate encodes flash commands into full-duplex SPI frames, decodes
//! the status and identification registers, and sequences mutating
//! operations (write enable, command, busy polling). It is `no_std`
//! compatible and only needs `alloc` for frame buffers.
//!
//! # Features
//!
//! - `std` - Enable standard library support (profile loading from RON files)
//!
//! # Example
//!
//! ```ignore
//! use is25flash_core::flash::Is25lp;
//! use is25flash_core::transport::SpiTransport;
//!
//! fn identify<T: SpiTransport>(transport: T) -> is25flash_core::Result<()> {
//!     let mut flash = Is25lp::begin(transport);
//!     let id = flash.verify_jedec_id()?;
//!     let uid = flash.read_unique_id()?;
//!     println!("{} / {}", id, uid);
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod error;
pub mod flash;
pub mod geometry;
pub mod protocol;
pub mod spi;
pub mod status;
pub mod transport;

#[cfg(test)]
mod mock;

pub use error::{Error, Result};
