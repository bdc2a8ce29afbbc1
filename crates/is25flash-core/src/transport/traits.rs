//! Transport trait definitions

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::spi::CommandFrame;

/// Full-duplex SPI transport
///
/// One call to [`SpiTransport::transfer`] is one chip-select assertion:
/// every byte of `buf` is shifted out while the bytes clocked in replace
/// it in place.
///
/// ## Example: wrapping a platform SPI handle
///
/// ```ignore
/// impl SpiTransport for MySpi {
///     fn transfer(&mut self, buf: &mut [u8]) -> Result<usize> {
///         self.bus
///             .transfer_in_place(buf)
///             .map_err(|_| Error::Transport)?;
///         Ok(buf.len())
///     }
///
///     fn delay_us(&mut self, us: u32) {
///         self.timer.delay_us(us);
///     }
/// }
/// ```
pub trait SpiTransport {
    /// Exchange `buf` with the device and return the number of bytes
    /// transferred
    fn transfer(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Largest frame the transport can exchange in one transaction
    fn max_transfer_len(&self) -> usize {
        usize::MAX
    }

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: SpiTransport + ?Sized> SpiTransport for &mut T {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).transfer(buf)
    }

    fn max_transfer_len(&self) -> usize {
        (**self).max_transfer_len()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

// Blanket impl for boxed transports to allow runtime backend selection
impl SpiTransport for alloc::boxed::Box<dyn SpiTransport + Send> {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).transfer(buf)
    }

    fn max_transfer_len(&self) -> usize {
        (**self).max_transfer_len()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// Encode `frame`, exchange it and return the full received buffer
///
/// A transfer that reports fewer bytes than the frame holds is an error;
/// the device would otherwise be left with a truncated command.
pub fn exchange<T: SpiTransport + ?Sized>(
    transport: &mut T,
    frame: &CommandFrame<'_>,
) -> Result<Vec<u8>> {
    let mut buf = frame.encode()?;
    let expected = buf.len();

    let actual = transport.transfer(&mut buf)?;
    if actual != expected {
        log::warn!(
            "short transfer for opcode 0x{:02X}: {} of {} bytes",
            frame.opcode,
            actual,
            expected
        );
        return Err(Error::ShortTransfer { expected, actual });
    }

    log::trace!("spi: op=0x{:02X} len={}", frame.opcode, expected);
    Ok(buf)
}
