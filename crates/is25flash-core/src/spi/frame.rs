//! Full-duplex command frame

use alloc::vec;
use alloc::vec::Vec;

use super::AddressWidth;
use crate::error::Result;

/// A single full-duplex SPI transaction
///
/// On the wire a frame is `[opcode][address][dummy][payload][placeholders]`.
/// The same buffer is shifted out and overwritten with the bytes clocked
/// in, so the response of a read lives at [`CommandFrame::response_offset`]
/// in the exchanged buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// Address (if any)
    pub address: Option<u32>,

    /// Address width
    pub address_width: AddressWidth,

    /// Number of dummy/reserved bytes after the address
    pub dummy_bytes: u8,

    /// Data to write after opcode/address/dummy
    pub payload: &'a [u8],

    /// Number of placeholder bytes clocked out to receive data
    pub read_len: usize,
}

impl<'a> CommandFrame<'a> {
    /// Create a simple command with no address or data (e.g., WREN, WRDI)
    pub fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            address: None,
            address_width: AddressWidth::None,
            dummy_bytes: 0,
            payload: &[],
            read_len: 0,
        }
    }

    /// Create a read register command with no address (e.g., RDSR, RDID)
    pub fn read_reg(opcode: u8, len: usize) -> Self {
        Self {
            read_len: len,
            ..Self::simple(opcode)
        }
    }

    /// Create a read command with 3-byte address (e.g., READ)
    pub fn read_3b(opcode: u8, addr: u32, len: usize) -> Self {
        Self {
            opcode,
            address: Some(addr),
            address_width: AddressWidth::ThreeByte,
            dummy_bytes: 0,
            payload: &[],
            read_len: len,
        }
    }

    /// Create a write command with 3-byte address (e.g., PP)
    pub fn write_3b(opcode: u8, addr: u32, data: &'a [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            address_width: AddressWidth::ThreeByte,
            dummy_bytes: 0,
            payload: data,
            read_len: 0,
        }
    }

    /// Create an erase command with 3-byte address
    pub fn erase_3b(opcode: u8, addr: u32) -> Self {
        Self::write_3b(opcode, addr, &[])
    }

    /// Set the number of dummy bytes
    pub fn with_dummy_bytes(mut self, bytes: u8) -> Self {
        self.dummy_bytes = bytes;
        self
    }

    /// Returns true if this command has a read phase
    pub fn has_read(&self) -> bool {
        self.read_len > 0
    }

    /// Returns true if this command has an address phase
    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    /// Opcode + address + dummy bytes
    pub fn header_len(&self) -> usize {
        1 + self.address_width.bytes() + self.dummy_bytes as usize
    }

    /// Offset of the first response byte in the exchanged buffer
    pub fn response_offset(&self) -> usize {
        self.header_len() + self.payload.len()
    }

    /// Calculate the total number of bytes clocked in the transaction
    pub fn total_len(&self) -> usize {
        self.response_offset() + self.read_len
    }

    /// Build the outgoing buffer
    ///
    /// Dummy and placeholder bytes are zero. Fails if the address does
    /// not fit the address phase.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.total_len()];
        buf[0] = self.opcode;
        if let Some(addr) = self.address {
            self.address_width.check(addr)?;
            self.address_width.encode(addr, &mut buf[1..]);
        }
        let start = self.header_len();
        buf[start..start + self.payload.len()].copy_from_slice(self.payload);
        Ok(buf)
    }

    /// Slice the response bytes out of an exchanged buffer
    pub fn response<'b>(&self, exchanged: &'b [u8]) -> &'b [u8] {
        let start = self.response_offset().min(exchanged.len());
        let end = (start + self.read_len).min(exchanged.len());
        &exchanged[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::opcodes;

    #[test]
    fn test_simple_frame() {
        let frame = CommandFrame::simple(opcodes::WREN);
        assert_eq!(frame.encode().unwrap(), [0x06]);
        assert!(!frame.has_read());
        assert!(!frame.has_address());
    }

    #[test]
    fn test_read_frame_layout() {
        let frame = CommandFrame::read_3b(opcodes::READ, 0x01_0203, 4);
        assert_eq!(frame.header_len(), 4);
        assert_eq!(frame.response_offset(), 4);
        assert_eq!(
            frame.encode().unwrap(),
            [0x03, 0x01, 0x02, 0x03, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_fast_read_has_dummy() {
        let frame = CommandFrame::read_3b(opcodes::FAST_READ, 0x00_1000, 2)
            .with_dummy_bytes(opcodes::FAST_READ_DUMMY_BYTES);
        assert_eq!(frame.response_offset(), 5);
        assert_eq!(frame.encode().unwrap(), [0x0B, 0x00, 0x10, 0x00, 0, 0, 0]);
    }

    #[test]
    fn test_unique_id_frame() {
        let frame =
            CommandFrame::read_reg(opcodes::RDUID, 16).with_dummy_bytes(opcodes::RDUID_DUMMY_BYTES);
        assert_eq!(frame.response_offset(), 5);
        assert_eq!(frame.total_len(), 21);
    }

    #[test]
    fn test_write_frame_payload() {
        let data = [0xAA, 0x55];
        let frame = CommandFrame::write_3b(opcodes::PP, 0x00_000A, &data);
        assert_eq!(frame.encode().unwrap(), [0x02, 0x00, 0x00, 0x0A, 0xAA, 0x55]);
    }

    #[test]
    fn test_encode_rejects_wide_address() {
        let frame = CommandFrame::erase_3b(opcodes::SE_20, 0x0100_0000);
        assert!(frame.encode().is_err());
    }

    #[test]
    fn test_response_slice() {
        let frame = CommandFrame::read_reg(opcodes::RDID, 3);
        let exchanged = [0xFF, 0x9D, 0x60, 0x19];
        assert_eq!(frame.response(&exchanged), &[0x9D, 0x60, 0x19]);
    }
}
