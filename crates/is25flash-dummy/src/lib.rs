//! is25flash-dummy - In-memory IS25LP256 emulator
//!
//! [`DummyFlash`] decodes full-duplex frames the way the real part does:
//! the opcode, a 24-bit address, dummy bytes, then data clocked in or out
//! of the same buffer. It models the write enable latch, a busy bit that
//! stays set for a configurable number of status polls, page wrap on
//! program, erase to 0xFF and deep power down. Useful for testing without
//! hardware.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use is25flash_core::chip::{JedecId, IS25LP256_JEDEC_ID, MAX_UNIQUE_ID_LEN};
use is25flash_core::error::{Error, Result};
use is25flash_core::geometry::{Block32, Block64, EraseUnit, Sector, PAGE_SIZE};
use is25flash_core::spi::opcodes;
use is25flash_core::status::Status;
use is25flash_core::transport::SpiTransport;

/// Configuration for the dummy flash
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// JEDEC ID returned by RDID
    pub jedec_id: JedecId,
    /// Flash size in bytes (power of two)
    pub size: usize,
    /// Factory unique ID
    pub unique_id: [u8; MAX_UNIQUE_ID_LEN],
    /// Status polls that report busy after each program or erase
    pub busy_polls: u32,
    /// Largest frame accepted in one transfer
    pub max_transfer_len: usize,
}

impl Default for DummyConfig {
    fn default() -> Self {
        let mut unique_id = [0u8; MAX_UNIQUE_ID_LEN];
        for (i, b) in unique_id.iter_mut().enumerate() {
            *b = 0x10 + i as u8;
        }
        Self {
            jedec_id: IS25LP256_JEDEC_ID,
            size: 32 * 1024 * 1024,
            unique_id,
            busy_polls: 2,
            max_transfer_len: 4096,
        }
    }
}

/// Dummy flash chip
///
/// Emulates an IS25LP256 in memory for testing purposes.
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    write_enabled: bool,
    busy_remaining: u32,
    stuck_busy: bool,
    powered_down: bool,
    fail_next: bool,
    opcode_log: Vec<u8>,
}

impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let data = vec![0xFF; config.size];
        Self {
            config,
            data,
            write_enabled: false,
            busy_remaining: 0,
            stuck_busy: false,
            powered_down: false,
            fail_next: false,
            opcode_log: Vec::new(),
        }
    }

    /// Create a new dummy flash with default configuration (IS25LP256)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the flash data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Opcodes of every frame received, in order
    pub fn opcode_log(&self) -> &[u8] {
        &self.opcode_log
    }

    /// Forget the recorded opcodes
    pub fn clear_log(&mut self) {
        self.opcode_log.clear();
    }

    /// Keep the busy bit set until cleared
    pub fn set_stuck_busy(&mut self, stuck: bool) {
        self.stuck_busy = stuck;
    }

    /// Make the next transfer fail with a transport error
    pub fn fail_next_transfer(&mut self) {
        self.fail_next = true;
    }

    /// Whether the write enable latch is set
    pub fn is_write_enabled(&self) -> bool {
        self.write_enabled
    }

    /// Whether the chip is in deep power down
    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    fn is_busy(&self) -> bool {
        self.stuck_busy || self.busy_remaining > 0
    }

    fn start_busy(&mut self) {
        self.write_enabled = false;
        self.busy_remaining = self.config.busy_polls;
    }

    fn wrap(&self, addr: usize) -> usize {
        addr & (self.data.len() - 1)
    }

    fn status(&mut self) -> u8 {
        let mut status = Status::empty();
        status.set(Status::WEL, self.write_enabled);
        if self.stuck_busy {
            status |= Status::WIP;
        } else if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
            status |= Status::WIP;
        }
        status.bits()
    }

    fn handle_read(&self, tx: &[u8], rx: &mut [u8], header: usize) {
        let addr = address_of(tx);
        for (i, b) in rx.iter_mut().enumerate().skip(header) {
            *b = self.data[self.wrap(addr + i - header)];
        }
    }

    fn handle_page_program(&mut self, tx: &[u8]) {
        if !self.write_enabled {
            log::debug!("dummy: page program without WEL ignored");
            return;
        }

        let addr = self.wrap(address_of(tx));
        let page_base = addr & !(PAGE_SIZE - 1);
        let payload = &tx[4..];

        // Only the last PAGE_SIZE bytes clocked in are kept
        let skip = payload.len().saturating_sub(PAGE_SIZE);
        for (i, &byte) in payload.iter().enumerate().skip(skip) {
            let target = page_base | ((addr + i - skip) & (PAGE_SIZE - 1));
            // Flash programming: can only change 1 -> 0
            self.data[target] &= byte;
        }

        self.start_busy();
    }

    fn handle_erase(&mut self, tx: &[u8], erase_size: usize) {
        if !self.write_enabled {
            log::debug!("dummy: erase without WEL ignored");
            return;
        }

        let addr = self.wrap(address_of(tx));
        let aligned_addr = addr & !(erase_size - 1);
        let end = core::cmp::min(aligned_addr + erase_size, self.data.len());

        // Erase sets all bytes to 0xFF
        self.data[aligned_addr..end].fill(0xFF);
        self.start_busy();
    }

    fn handle_chip_erase(&mut self) {
        if !self.write_enabled {
            log::debug!("dummy: chip erase without WEL ignored");
            return;
        }

        self.data.fill(0xFF);
        self.start_busy();
    }
}

fn address_of(tx: &[u8]) -> usize {
    let mut addr = [0u8; 4];
    let n = core::cmp::min(tx.len().saturating_sub(1), 3);
    addr[1..1 + n].copy_from_slice(&tx[1..1 + n]);
    u32::from_be_bytes(addr) as usize
}

impl SpiTransport for DummyFlash {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<usize> {
        if core::mem::take(&mut self.fail_next) {
            return Err(Error::Transport);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        if buf.len() > self.config.max_transfer_len {
            log::warn!(
                "dummy: {} byte frame exceeds {} byte limit",
                buf.len(),
                self.config.max_transfer_len
            );
            return Err(Error::Transport);
        }

        let tx = buf.to_vec();
        let opcode = tx[0];
        self.opcode_log.push(opcode);

        // Idle MISO reads high
        buf.fill(0xFF);

        if self.powered_down {
            if opcode == opcodes::RDP {
                self.powered_down = false;
            }
            return Ok(buf.len());
        }

        if self.is_busy() && opcode != opcodes::RDSR {
            log::debug!("dummy: opcode 0x{:02X} ignored while busy", opcode);
            return Ok(buf.len());
        }

        match opcode {
            opcodes::RDSR => {
                if buf.len() > 1 {
                    let status = self.status();
                    buf[1..].fill(status);
                }
            }
            opcodes::RDSR2 => {
                if buf.len() > 1 {
                    buf[1..].fill(0);
                }
            }
            opcodes::RDID => {
                let id = self.config.jedec_id.to_bytes();
                for (b, v) in buf.iter_mut().skip(1).zip(id) {
                    *b = v;
                }
            }
            opcodes::RDUID => {
                let start = 1 + opcodes::RDUID_DUMMY_BYTES as usize;
                for (b, v) in buf.iter_mut().skip(start).zip(self.config.unique_id) {
                    *b = v;
                }
            }

            opcodes::WREN => self.write_enabled = true,
            opcodes::WRDI => self.write_enabled = false,

            opcodes::READ if tx.len() >= 4 => self.handle_read(&tx, buf, 4),
            opcodes::FAST_READ if tx.len() >= 5 => self.handle_read(&tx, buf, 5),

            opcodes::PP if tx.len() >= 4 => self.handle_page_program(&tx),

            opcodes::SE_20 if tx.len() >= 4 => self.handle_erase(&tx, Sector::SIZE as usize),
            opcodes::BE_52 if tx.len() >= 4 => self.handle_erase(&tx, Block32::SIZE as usize),
            opcodes::BE_D8 if tx.len() >= 4 => self.handle_erase(&tx, Block64::SIZE as usize),
            opcodes::CE_C7 => self.handle_chip_erase(),

            opcodes::DP => self.powered_down = true,
            opcodes::RDP => {}

            _ => log::debug!("dummy: unhandled frame 0x{:02X} ({} bytes)", opcode, tx.len()),
        }

        Ok(buf.len())
    }

    fn max_transfer_len(&self) -> usize {
        self.config.max_transfer_len
    }

    fn delay_us(&mut self, _us: u32) {
        // No delay needed for in-memory operations
    }
}
