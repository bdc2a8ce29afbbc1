//! IS25LP command encoding
//!
//! Every function here is exactly one SPI transaction (reads may be split
//! into several when the transport caps the frame size). Ordering and
//! busy polling live in the sequencer.

use crate::chip::{JedecId, UniqueId};
use crate::error::Result;
use crate::spi::{opcodes, CommandFrame};
use crate::status::Status;
use crate::transport::{exchange, SpiTransport};

/// Header bytes in front of FAST_READ data
const FAST_READ_HEADER: usize = 4 + opcodes::FAST_READ_DUMMY_BYTES as usize;

/// Read the status register
pub fn read_status<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<Status> {
    let frame = CommandFrame::read_reg(opcodes::RDSR, 1);
    let buf = exchange(transport, &frame)?;
    Ok(Status::from(frame.response(&buf)[0]))
}

/// Read status register 2 (parts that have one)
pub fn read_status2<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<u8> {
    let frame = CommandFrame::read_reg(opcodes::RDSR2, 1);
    let buf = exchange(transport, &frame)?;
    Ok(frame.response(&buf)[0])
}

/// Read the JEDEC ID (manufacturer, memory type, capacity)
pub fn read_jedec_id<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<JedecId> {
    let frame = CommandFrame::read_reg(opcodes::RDID, 3);
    let buf = exchange(transport, &frame)?;
    Ok(JedecId::from_bytes(frame.response(&buf)))
}

/// Read the factory unique ID
///
/// Four reserved bytes follow the opcode; `len` ID bytes follow those.
pub fn read_unique_id<T: SpiTransport + ?Sized>(transport: &mut T, len: usize) -> Result<UniqueId> {
    let frame = CommandFrame::read_reg(opcodes::RDUID, len)
        .with_dummy_bytes(opcodes::RDUID_DUMMY_BYTES);
    let buf = exchange(transport, &frame)?;
    Ok(UniqueId::from_slice(frame.response(&buf)))
}

/// Send the Write Enable command
pub fn write_enable<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<()> {
    exchange(transport, &CommandFrame::simple(opcodes::WREN)).map(|_| ())
}

/// Send the Write Disable command
pub fn write_disable<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<()> {
    exchange(transport, &CommandFrame::simple(opcodes::WRDI)).map(|_| ())
}

/// Enter deep power down
pub fn power_down<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<()> {
    exchange(transport, &CommandFrame::simple(opcodes::DP)).map(|_| ())
}

/// Release from deep power down
pub fn release_power_down<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<()> {
    exchange(transport, &CommandFrame::simple(opcodes::RDP)).map(|_| ())
}

/// Read data with the Normal Read command (0x03)
///
/// Returns the number of data bytes delivered.
pub fn read_3b<T: SpiTransport + ?Sized>(
    transport: &mut T,
    addr: u32,
    buf: &mut [u8],
) -> Result<usize> {
    read_chunked(transport, addr, buf, false)
}

/// Read data with the Fast Read command (0x0B, one dummy byte)
///
/// Returns the number of data bytes delivered.
pub fn fast_read_3b<T: SpiTransport + ?Sized>(
    transport: &mut T,
    addr: u32,
    buf: &mut [u8],
) -> Result<usize> {
    read_chunked(transport, addr, buf, true)
}

fn read_chunked<T: SpiTransport + ?Sized>(
    transport: &mut T,
    addr: u32,
    buf: &mut [u8],
    fast: bool,
) -> Result<usize> {
    let header = if fast { FAST_READ_HEADER } else { 4 };
    let max_len = transport.max_transfer_len().saturating_sub(header).max(1);
    let mut offset = 0;

    while offset < buf.len() {
        let chunk_len = core::cmp::min(max_len, buf.len() - offset);
        let chunk_addr = addr + offset as u32;
        let frame = if fast {
            CommandFrame::read_3b(opcodes::FAST_READ, chunk_addr, chunk_len)
                .with_dummy_bytes(opcodes::FAST_READ_DUMMY_BYTES)
        } else {
            CommandFrame::read_3b(opcodes::READ, chunk_addr, chunk_len)
        };
        let rx = exchange(transport, &frame)?;
        buf[offset..offset + chunk_len].copy_from_slice(frame.response(&rx));
        offset += chunk_len;
    }

    Ok(offset)
}

/// Send a Page Program frame without any sequencing
///
/// Returns the transaction length (header plus payload).
pub fn page_program_raw<T: SpiTransport + ?Sized>(
    transport: &mut T,
    addr: u32,
    data: &[u8],
) -> Result<usize> {
    let frame = CommandFrame::write_3b(opcodes::PP, addr, data);
    exchange(transport, &frame).map(|buf| buf.len())
}

/// Send an addressed erase frame without any sequencing
pub fn erase_raw<T: SpiTransport + ?Sized>(transport: &mut T, opcode: u8, addr: u32) -> Result<()> {
    exchange(transport, &CommandFrame::erase_3b(opcode, addr)).map(|_| ())
}

/// Send the Chip Erase frame without any sequencing
pub fn chip_erase_raw<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<()> {
    exchange(transport, &CommandFrame::simple(opcodes::CE_C7)).map(|_| ())
}

/// Check if the Write Enable Latch is set
pub fn check_wel<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<bool> {
    Ok(read_status(transport)?.is_write_enabled())
}

/// Check if a write or erase operation is in progress
pub fn is_busy<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<bool> {
    Ok(read_status(transport)?.is_busy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::MockTransport;
    use alloc::vec;

    #[test]
    fn test_read_status_frame() {
        let mut t = MockTransport::new();
        t.status = 0x42;
        let status = read_status(&mut t).unwrap();
        assert_eq!(status.bits(), 0x42);
        assert_eq!(t.sent, [vec![0x05, 0x00]]);
    }

    #[test]
    fn test_read_jedec_id() {
        let mut t = MockTransport::new();
        let id = read_jedec_id(&mut t).unwrap();
        assert_eq!(id.to_bytes(), [0x9D, 0x60, 0x19]);
        assert_eq!(t.sent, [vec![0x9F, 0, 0, 0]]);
    }

    #[test]
    fn test_read_unique_id_lengths() {
        let mut t = MockTransport::new();
        let uid = read_unique_id(&mut t, 8).unwrap();
        assert_eq!(uid.as_bytes(), &t.unique_id[..8]);
        assert_eq!(t.sent[0].len(), 13);

        let uid = read_unique_id(&mut t, 16).unwrap();
        assert_eq!(uid.as_bytes(), &t.unique_id[..16]);
        assert_eq!(t.sent[1].len(), 21);
        assert_eq!(&t.sent[1][..5], &[0x4B, 0, 0, 0, 0]);
    }

    #[test]
    fn test_read_frames() {
        let mut t = MockTransport::new();
        let mut buf = [0u8; 4];
        assert_eq!(read_3b(&mut t, 0x01_0203, &mut buf).unwrap(), 4);
        assert_eq!(&t.sent[0][..4], &[0x03, 0x01, 0x02, 0x03]);
        assert_eq!(buf, [0x03, 0x04, 0x05, 0x06]);

        let mut buf = [0u8; 2];
        assert_eq!(fast_read_3b(&mut t, 0x10, &mut buf).unwrap(), 2);
        assert_eq!(&t.sent[1][..5], &[0x0B, 0x00, 0x00, 0x10, 0x00]);
        assert_eq!(t.sent[1].len(), 7);
        assert_eq!(buf, [0x10, 0x11]);
    }

    #[test]
    fn test_read_split_by_transport_limit() {
        let mut t = MockTransport::new();
        t.max_len = 4 + 100;
        let mut buf = vec![0u8; 250];
        assert_eq!(read_3b(&mut t, 0x2000, &mut buf).unwrap(), 250);
        assert_eq!(t.sent.len(), 3);
        assert_eq!(&t.sent[1][..4], &[0x03, 0x00, 0x20, 100]);
        assert_eq!(t.sent[2].len(), 4 + 50);
        assert_eq!(buf[249], (0x2000u32 + 249) as u8);
    }

    #[test]
    fn test_page_program_raw_echoes_length() {
        let mut t = MockTransport::new();
        let n = page_program_raw(&mut t, 0x0A, &[1, 2, 3]).unwrap();
        assert_eq!(n, 7);
        assert_eq!(t.sent[0], [0x02, 0x00, 0x00, 0x0A, 1, 2, 3]);
    }

    #[test]
    fn test_erase_frames() {
        let mut t = MockTransport::new();
        erase_raw(&mut t, opcodes::SE_20, 0x3000).unwrap();
        chip_erase_raw(&mut t).unwrap();
        assert_eq!(t.sent, [vec![0x20, 0x00, 0x30, 0x00], vec![0xC7]]);
    }

    #[test]
    fn test_single_byte_commands() {
        let mut t = MockTransport::new();
        write_enable(&mut t).unwrap();
        write_disable(&mut t).unwrap();
        power_down(&mut t).unwrap();
        release_power_down(&mut t).unwrap();
        assert_eq!(t.sent, [vec![0x06], vec![0x04], vec![0xB9], vec![0xAB]]);
    }

    #[test]
    fn test_transport_failure_surfaces() {
        let mut t = MockTransport::new();
        t.fail = true;
        assert_eq!(read_status(&mut t), Err(Error::Transport));
    }

    #[test]
    fn test_short_transfer_surfaces() {
        let mut t = MockTransport::new();
        t.short_by = 1;
        assert_eq!(
            read_jedec_id(&mut t),
            Err(Error::ShortTransfer {
                expected: 4,
                actual: 3
            })
        );
    }
}
