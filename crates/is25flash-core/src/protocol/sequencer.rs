//! Mutating operation sequencing
//!
//! Program and erase follow the same shape: enable writes, confirm the
//! latch, issue the command, then poll the busy bit until the device
//! reports ready or the per-operation timeout expires.

use core::fmt;

use super::is25lp;
use crate::error::{Error, OpKind, Result};
use crate::geometry::{fits_in_page, EraseUnit, PAGE_SIZE};
use crate::spi::MAX_3B_ADDRESS;
use crate::transport::SpiTransport;

/// Shortest poll interval the sequencer will use
pub const MIN_POLL_INTERVAL_US: u32 = 10;

/// Busy polling parameters for one kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    /// Delay between status reads
    pub interval_us: u32,
    /// Give up after this much accumulated delay
    pub timeout_us: u32,
}

impl PollTiming {
    /// Create a poll timing
    pub const fn new(interval_us: u32, timeout_us: u32) -> Self {
        Self {
            interval_us,
            timeout_us,
        }
    }

    /// Interval actually used, never below [`MIN_POLL_INTERVAL_US`]
    pub fn effective_interval(&self) -> u32 {
        self.interval_us.max(MIN_POLL_INTERVAL_US)
    }

    /// Number of status reads before giving up
    pub fn max_polls(&self) -> u32 {
        self.timeout_us / self.effective_interval() + 1
    }
}

/// Poll timings for every mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Page Program
    pub page_program: PollTiming,
    /// 4 KiB sector erase
    pub sector_erase: PollTiming,
    /// 32 KiB block erase
    pub block32_erase: PollTiming,
    /// 64 KiB block erase
    pub block64_erase: PollTiming,
    /// Chip erase
    pub chip_erase: PollTiming,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            page_program: PollTiming::new(50, 10_000),
            sector_erase: PollTiming::new(10_000, 1_000_000),
            block32_erase: PollTiming::new(50_000, 2_000_000),
            block64_erase: PollTiming::new(50_000, 3_000_000),
            chip_erase: PollTiming::new(500_000, 120_000_000),
        }
    }
}

impl Timings {
    /// Timing for `op`
    pub fn for_op(&self, op: OpKind) -> PollTiming {
        match op {
            OpKind::PageProgram => self.page_program,
            OpKind::SectorErase => self.sector_erase,
            OpKind::Block32Erase => self.block32_erase,
            OpKind::Block64Erase => self.block64_erase,
            OpKind::ChipErase => self.chip_erase,
        }
    }
}

/// Where a mutating operation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight
    Idle,
    /// WREN accepted and WEL confirmed
    WriteEnabled,
    /// Program or erase command shifted out
    Issued,
    /// Device reports busy
    Busy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::WriteEnabled => "write-enabled",
            Phase::Issued => "issued",
            Phase::Busy => "busy",
        };
        f.write_str(s)
    }
}

fn transition(op: OpKind, from: Phase, to: Phase) {
    log::trace!("{}: {} -> {}", op, from, to);
}

/// Poll the status register until WIP clears
///
/// Returns the number of status reads taken.
pub fn wait_ready<T: SpiTransport + ?Sized>(
    transport: &mut T,
    op: OpKind,
    timing: PollTiming,
) -> Result<u32> {
    let interval = timing.effective_interval();
    let max_polls = timing.max_polls();
    let mut phase = Phase::Issued;

    for poll in 1..=max_polls {
        if !is25lp::is_busy(transport)? {
            transition(op, phase, Phase::Idle);
            return Ok(poll);
        }
        if phase != Phase::Busy {
            transition(op, phase, Phase::Busy);
            phase = Phase::Busy;
        }
        transport.delay_us(interval);
    }

    log::debug!("{}: still busy after {} polls", op, max_polls);
    Err(Error::PollTimeout { op })
}

/// Send WREN and confirm the Write Enable Latch
pub fn enable_write<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<()> {
    is25lp::write_enable(transport)?;
    if !is25lp::check_wel(transport)? {
        return Err(Error::WriteEnableFailed);
    }
    Ok(())
}

/// Program up to one page of `page_size` bytes at `addr`
///
/// The payload must not wrap inside its page. The device must be idle
/// before anything is sent. Returns the number of bytes programmed once
/// the busy bit clears.
pub fn program_page<T: SpiTransport + ?Sized>(
    transport: &mut T,
    addr: u32,
    data: &[u8],
    page_size: usize,
    timing: PollTiming,
) -> Result<usize> {
    let op = OpKind::PageProgram;
    let page_size = page_size.clamp(1, PAGE_SIZE);

    if data.len() > page_size {
        return Err(Error::InvalidLength {
            len: data.len(),
            max: page_size,
        });
    }
    if addr > MAX_3B_ADDRESS {
        return Err(Error::AddressOutOfRange { addr });
    }
    if !fits_in_page(addr, data.len(), page_size) {
        return Err(Error::CrossesPageBoundary {
            addr,
            len: data.len(),
        });
    }

    if is25lp::is_busy(transport)? {
        return Err(Error::DeviceBusy);
    }

    enable_write(transport)?;
    transition(op, Phase::Idle, Phase::WriteEnabled);

    is25lp::page_program_raw(transport, addr, data)?;
    transition(op, Phase::WriteEnabled, Phase::Issued);

    wait_ready(transport, op, timing)?;
    Ok(data.len())
}

/// Erase one sector or block
///
/// With `wait` unset the call returns as soon as the command is issued;
/// the caller is then responsible for polling before the next mutating
/// command.
pub fn erase<T: SpiTransport + ?Sized, U: EraseUnit>(
    transport: &mut T,
    unit: U,
    op: OpKind,
    wait: bool,
    timing: PollTiming,
) -> Result<()> {
    unit.check_3b()?;

    enable_write(transport)?;
    transition(op, Phase::Idle, Phase::WriteEnabled);

    log::debug!("erasing {} {} at 0x{:06X}", U::NAME, unit.index(), unit.address());
    is25lp::erase_raw(transport, U::OPCODE, unit.address())?;
    transition(op, Phase::WriteEnabled, Phase::Issued);

    if wait {
        wait_ready(transport, op, timing)?;
    }
    Ok(())
}

/// Erase the whole array
pub fn chip_erase<T: SpiTransport + ?Sized>(
    transport: &mut T,
    wait: bool,
    timing: PollTiming,
) -> Result<()> {
    let op = OpKind::ChipErase;

    enable_write(transport)?;
    transition(op, Phase::Idle, Phase::WriteEnabled);

    is25lp::chip_erase_raw(transport)?;
    transition(op, Phase::WriteEnabled, Phase::Issued);

    if wait {
        wait_ready(transport, op, timing)?;
    }
    Ok(())
}
