//! is25flash-linux-gpio - Flash bypass line control
//!
//! Some boards route the SPI flash through a multiplexer or hold it in
//! reset while the host SoC owns the bus. A single GPIO line flips the
//! flash over to the programmer. This crate drives that line through the
//! Linux GPIO character device (gpiocdev).
//!
//! # Example
//!
//! ```no_run
//! use is25flash_linux_gpio::{BypassLine, BypassLineConfig};
//!
//! let config = BypassLineConfig::new("/dev/gpiochip0", 17).with_active_low(true);
//! let mut bypass = BypassLine::open(&config)?;
//!
//! bypass.set_enabled(true)?;
//! // ... talk to the flash ...
//! bypass.set_enabled(false)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the is25flash CLI
//!
//! ```bash
//! is25flash dump -p linux_spi:dev=/dev/spidev0.0 --bypass gpiochip=0,line=17 -o flash.bin
//! ```
//!
//! The line is released (driven inactive) when the [`BypassLine`] is
//! dropped, so an aborted run never leaves the flash routed away from the
//! host.
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)

pub mod device;
pub mod error;

pub use device::{parse_options, BypassLine, BypassLineConfig};
pub use error::{LinuxGpioError, Result};
