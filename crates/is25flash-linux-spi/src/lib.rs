//! is25flash-linux-spi - Linux spidev transport
//!
//! This crate provides an [`SpiTransport`](is25flash_core::transport::SpiTransport)
//! backed by the `/dev/spidevX.Y` device interface.
//!
//! # Overview
//!
//! The Linux SPI driver exposes SPI controllers through character devices
//! at `/dev/spidevX.Y` where X is the bus number and Y is the chip select.
//! Every frame is exchanged as a single full-duplex message.
//!
//! # Example
//!
//! ```no_run
//! use is25flash_linux_spi::{LinuxSpi, LinuxSpiConfig};
//! use is25flash_core::flash::Is25lp;
//!
//! let config = LinuxSpiConfig::new("/dev/spidev0.0")
//!     .with_speed(4_000_000)  // 4 MHz
//!     .with_mode(0);
//! let spi = LinuxSpi::open(&config)?;
//!
//! let mut flash = Is25lp::begin(spi);
//! println!("JEDEC ID: {}", flash.read_jedec_id()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the is25flash CLI
//!
//! ```bash
//! # Identify the chip using default settings
//! is25flash id -p linux_spi:dev=/dev/spidev0.0
//!
//! # Specify SPI speed in kHz
//! is25flash dump -p linux_spi:dev=/dev/spidev0.0,spispeed=4000 -o flash.bin
//!
//! # Specify SPI mode
//! is25flash status -p linux_spi:dev=/dev/spidev0.0,mode=3
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y` device
//! - May require adding user to `spi` group or using udev rules

pub mod device;
pub mod error;

pub use device::{mode, parse_options, LinuxSpi, LinuxSpiConfig};
pub use error::{LinuxSpiError, Result};

/// Open a Linux SPI device and return a boxed transport
///
/// This is a convenience function for use in the CLI programmer dispatch.
///
/// # Example Options
///
/// - `dev=/dev/spidev0.0` - Required: device path
/// - `spispeed=4000` - Optional: speed in kHz (default: 2000)
/// - `mode=0` - Optional: SPI mode 0-3 (default: 0)
pub fn open_linux_spi(
    options: &[(&str, &str)],
) -> std::result::Result<
    Box<dyn is25flash_core::transport::SpiTransport + Send>,
    Box<dyn std::error::Error>,
> {
    let config = parse_options(options)?;
    let spi = LinuxSpi::open(&config)?;
    Ok(Box::new(spi))
}
