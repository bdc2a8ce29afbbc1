//! Scripted transport for unit tests
//!
//! Models just enough of the chip to drive the sequencer: the WEL latch,
//! a busy bit that stays set for a configurable number of polls after
//! each program or erase, and address-derived read data.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::spi::opcodes;
use crate::transport::SpiTransport;

pub struct MockTransport {
    /// Every outgoing frame, as shifted out
    pub sent: Vec<Vec<u8>>,
    /// Delays requested by the driver
    pub delays: Vec<u32>,
    /// Status bits reported on top of WIP/WEL
    pub status: u8,
    pub status2: u8,
    pub wel: bool,
    /// Polls that report busy after each program/erase
    pub busy_polls: u32,
    pub busy_remaining: u32,
    pub stuck_busy: bool,
    pub ignore_wren: bool,
    pub jedec: [u8; 3],
    pub unique_id: [u8; 16],
    pub fail: bool,
    pub short_by: usize,
    pub max_len: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        let mut unique_id = [0u8; 16];
        for (i, b) in unique_id.iter_mut().enumerate() {
            *b = 0xA0 + i as u8;
        }
        Self {
            sent: Vec::new(),
            delays: Vec::new(),
            status: 0,
            status2: 0,
            wel: false,
            busy_polls: 0,
            busy_remaining: 0,
            stuck_busy: false,
            ignore_wren: false,
            jedec: [0x9D, 0x60, 0x19],
            unique_id,
            fail: false,
            short_by: 0,
            max_len: usize::MAX,
        }
    }

    /// Opcode of every frame sent so far
    pub fn opcodes(&self) -> Vec<u8> {
        self.sent.iter().map(|f| f[0]).collect()
    }

    fn status_byte(&mut self) -> u8 {
        let mut s = self.status;
        if self.wel {
            s |= 0x02;
        }
        if self.stuck_busy {
            s |= 0x01;
        } else if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
            s |= 0x01;
        }
        s
    }

    fn start_operation(&mut self) {
        self.wel = false;
        self.busy_remaining = self.busy_polls;
    }
}

fn fill_from_address(buf: &mut [u8], header: usize) {
    let addr = u32::from_be_bytes([0, buf[1], buf[2], buf[3]]);
    for (i, b) in buf[header..].iter_mut().enumerate() {
        *b = addr.wrapping_add(i as u32) as u8;
    }
}

impl SpiTransport for MockTransport {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.sent.push(buf.to_vec());
        if self.fail {
            return Err(Error::Transport);
        }

        match buf[0] {
            opcodes::RDSR => buf[1] = self.status_byte(),
            opcodes::RDSR2 => buf[1] = self.status2,
            opcodes::RDID => buf[1..4].copy_from_slice(&self.jedec),
            opcodes::RDUID => {
                let n = buf.len() - 5;
                buf[5..].copy_from_slice(&self.unique_id[..n]);
            }
            opcodes::READ => fill_from_address(buf, 4),
            opcodes::FAST_READ => fill_from_address(buf, 5),
            opcodes::WREN if !self.ignore_wren => self.wel = true,
            opcodes::WRDI => self.wel = false,
            opcodes::PP | opcodes::SE_20 | opcodes::BE_52 | opcodes::BE_D8 | opcodes::CE_C7 => {
                self.start_operation()
            }
            _ => {}
        }

        Ok(buf.len() - self.short_by)
    }

    fn max_transfer_len(&self) -> usize {
        self.max_len
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(us);
    }
}
