//! SPI framing types and opcodes
//!
//! This module provides the IS25LP opcode set, 24-bit address encoding and
//! the full-duplex command frame used for every transaction.

mod address;
mod frame;
pub mod opcodes;

pub use address::{AddressWidth, MAX_3B_ADDRESS};
pub use frame::CommandFrame;
pub use opcodes::*;
