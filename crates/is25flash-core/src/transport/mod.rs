//! SPI transport abstraction
//!
//! The driver talks to the chip exclusively through [`SpiTransport`], a
//! full-duplex byte exchange. Backends (spidev, the in-memory emulator)
//! live in their own crates.

mod traits;

pub use traits::*;
