//! The IS25LP driver handle

use crate::chip::{Capabilities, ChipProfile, JedecId, UniqueId};
use crate::error::{Error, OpKind, Result};
use crate::geometry::{Block32, Block64, EraseUnit, Sector};
use crate::protocol::{self, Timings};
use crate::status::Status;
use crate::transport::SpiTransport;

/// Driver for one IS25LP256 behind one transport
///
/// Every method takes `&mut self`, so at most one operation is in flight
/// per handle. Share a chip between threads by wrapping the handle in a
/// mutex.
pub struct Is25lp<T: SpiTransport> {
    transport: T,
    profile: ChipProfile,
    timings: Timings,
}

impl<T: SpiTransport> Is25lp<T> {
    /// Bind a transport to a chip profile
    pub fn new(transport: T, profile: ChipProfile) -> Self {
        log::debug!(
            "binding {} (uid {} bytes, caps {:?})",
            profile.name,
            profile.unique_id_len(),
            profile.capabilities
        );
        Self {
            transport,
            profile,
            timings: Timings::default(),
        }
    }

    /// Bind a transport using the default IS25LP256 profile
    pub fn begin(transport: T) -> Self {
        Self::new(transport, ChipProfile::default())
    }

    /// Replace the poll timings
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// The chip profile in use
    pub fn profile(&self) -> &ChipProfile {
        &self.profile
    }

    /// The poll timings in use
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Direct access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back
    pub fn release(self) -> T {
        self.transport
    }

    fn require(&self, cap: Capabilities, what: &'static str) -> Result<()> {
        if self.profile.has(cap) {
            Ok(())
        } else {
            Err(Error::Unsupported(what))
        }
    }

    // ------------------------------------------------------------------
    // Registers and identification
    // ------------------------------------------------------------------

    /// Read the status register
    pub fn read_status(&mut self) -> Result<Status> {
        protocol::read_status(&mut self.transport)
    }

    /// Read status register 2
    pub fn read_status2(&mut self) -> Result<u8> {
        self.require(Capabilities::STATUS_REG_2, "status register 2")?;
        protocol::read_status2(&mut self.transport)
    }

    /// Whether a program or erase is in progress
    pub fn is_busy(&mut self) -> Result<bool> {
        protocol::is_busy(&mut self.transport)
    }

    /// Whether the Write Enable Latch is set
    pub fn is_write_enabled(&mut self) -> Result<bool> {
        protocol::check_wel(&mut self.transport)
    }

    /// Read the JEDEC ID
    pub fn read_jedec_id(&mut self) -> Result<JedecId> {
        protocol::read_jedec_id(&mut self.transport)
    }

    /// Read the JEDEC ID and compare it against the profile
    pub fn verify_jedec_id(&mut self) -> Result<JedecId> {
        let id = self.read_jedec_id()?;
        if id != self.profile.jedec_id {
            log::warn!(
                "expected JEDEC ID {}, found {}",
                self.profile.jedec_id,
                id
            );
            return Err(Error::JedecIdMismatch {
                found: id.to_bytes(),
            });
        }
        Ok(id)
    }

    /// Read the factory unique ID (length from the profile)
    pub fn read_unique_id(&mut self) -> Result<UniqueId> {
        self.require(Capabilities::UNIQUE_ID, "unique ID")?;
        protocol::read_unique_id(&mut self.transport, self.profile.unique_id_len())
    }

    // ------------------------------------------------------------------
    // Write latch and power
    // ------------------------------------------------------------------

    /// Set the Write Enable Latch
    pub fn write_enable(&mut self) -> Result<()> {
        protocol::write_enable(&mut self.transport)
    }

    /// Clear the Write Enable Latch
    pub fn write_disable(&mut self) -> Result<()> {
        protocol::write_disable(&mut self.transport)
    }

    /// Enter deep power down
    pub fn power_down(&mut self) -> Result<()> {
        self.require(Capabilities::DEEP_POWER_DOWN, "deep power down")?;
        protocol::power_down(&mut self.transport)
    }

    /// Leave deep power down
    pub fn release_power_down(&mut self) -> Result<()> {
        self.require(Capabilities::DEEP_POWER_DOWN, "deep power down")?;
        protocol::release_power_down(&mut self.transport)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Read `buf.len()` bytes at `addr` with the Normal Read command
    pub fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<usize> {
        protocol::read_3b(&mut self.transport, addr, buf)
    }

    /// Read `buf.len()` bytes at `addr` with the Fast Read command
    pub fn fast_read(&mut self, addr: u32, buf: &mut [u8]) -> Result<usize> {
        self.require(Capabilities::FAST_READ, "fast read")?;
        protocol::fast_read_3b(&mut self.transport, addr, buf)
    }

    // ------------------------------------------------------------------
    // Erase
    // ------------------------------------------------------------------

    /// Erase 4 KiB sector `sector_no`
    pub fn erase_sector(&mut self, sector_no: u32, wait: bool) -> Result<()> {
        protocol::erase(
            &mut self.transport,
            Sector(sector_no),
            OpKind::SectorErase,
            wait,
            self.timings.sector_erase,
        )
    }

    /// Erase 32 KiB block `block_no`
    pub fn erase_block32(&mut self, block_no: u32, wait: bool) -> Result<()> {
        self.require(Capabilities::ERASE_32K, "32K block erase")?;
        protocol::erase(
            &mut self.transport,
            Block32(block_no),
            OpKind::Block32Erase,
            wait,
            self.timings.block32_erase,
        )
    }

    /// Erase 64 KiB block `block_no`
    pub fn erase_block64(&mut self, block_no: u32, wait: bool) -> Result<()> {
        self.require(Capabilities::ERASE_64K, "64K block erase")?;
        protocol::erase(
            &mut self.transport,
            Block64(block_no),
            OpKind::Block64Erase,
            wait,
            self.timings.block64_erase,
        )
    }

    /// Erase the whole chip
    pub fn erase_chip(&mut self, wait: bool) -> Result<()> {
        self.require(Capabilities::CHIP_ERASE, "chip erase")?;
        protocol::chip_erase(&mut self.transport, wait, self.timings.chip_erase)
    }

    /// Poll until an operation started with `wait = false` completes
    pub fn wait_idle(&mut self, op: OpKind) -> Result<()> {
        protocol::wait_ready(&mut self.transport, op, self.timings.for_op(op)).map(|_| ())
    }

    // ------------------------------------------------------------------
    // Program
    // ------------------------------------------------------------------

    /// Program `data` at `offset` inside sector `sector_no`
    ///
    /// The write must stay inside one 256-byte page.
    pub fn page_write(&mut self, sector_no: u32, offset: u32, data: &[u8]) -> Result<usize> {
        let sector = Sector(sector_no);
        sector.check_3b()?;
        let addr = sector.join(offset)?;
        self.page_program(addr, data)
    }

    /// Program `data` at linear address `addr`
    ///
    /// Returns the number of bytes programmed.
    pub fn page_program(&mut self, addr: u32, data: &[u8]) -> Result<usize> {
        protocol::program_page(
            &mut self.transport,
            addr,
            data,
            self.profile.program_page_size(),
            self.timings.page_program,
        )
    }
}

impl<T: SpiTransport> core::fmt::Debug for Is25lp<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Is25lp")
            .field("profile", &self.profile.name)
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::protocol::PollTiming;
    use crate::spi::opcodes;

    fn quick_timings() -> Timings {
        let t = PollTiming::new(10, 1_000);
        Timings {
            page_program: t,
            sector_erase: t,
            block32_erase: t,
            block64_erase: t,
            chip_erase: t,
        }
    }

    fn driver() -> Is25lp<MockTransport> {
        Is25lp::begin(MockTransport::new()).with_timings(quick_timings())
    }

    #[test]
    fn test_verify_jedec_id() {
        let mut flash = driver();
        assert_eq!(flash.verify_jedec_id().unwrap().to_bytes(), [0x9D, 0x60, 0x19]);

        flash.transport_mut().jedec = [0xEF, 0x40, 0x18];
        assert_eq!(
            flash.verify_jedec_id(),
            Err(Error::JedecIdMismatch {
                found: [0xEF, 0x40, 0x18]
            })
        );
    }

    #[test]
    fn test_unique_id_length_follows_profile() {
        let mut flash = driver();
        assert_eq!(flash.read_unique_id().unwrap().len(), 16);

        let mut flash = Is25lp::new(MockTransport::new(), ChipProfile::is25lp256_uid8());
        assert_eq!(flash.read_unique_id().unwrap().len(), 8);
    }

    #[test]
    fn test_capability_gating() {
        let mut flash = driver();
        assert_eq!(
            flash.read_status2(),
            Err(Error::Unsupported("status register 2"))
        );

        let mut profile = ChipProfile::is25lp256();
        profile.capabilities.remove(Capabilities::ERASE_32K);
        let mut flash = Is25lp::new(MockTransport::new(), profile);
        assert_eq!(
            flash.erase_block32(0, true),
            Err(Error::Unsupported("32K block erase"))
        );
        assert!(flash.release().sent.is_empty());
    }

    #[test]
    fn test_page_write_translates_address() {
        let mut flash = driver();
        assert_eq!(flash.page_write(1, 10, b"AB").unwrap(), 2);
        let t = flash.release();
        assert_eq!(t.sent[3], [opcodes::PP, 0x00, 0x10, 0x0A, b'A', b'B']);
    }

    #[test]
    fn test_page_write_rejects_offset_outside_sector() {
        let mut flash = driver();
        assert!(matches!(
            flash.page_write(0, 4096, b"x"),
            Err(Error::InvalidLength { .. })
        ));
        assert!(flash.release().sent.is_empty());
    }

    #[test]
    fn test_program_honours_profile_page_size() {
        let profile = ChipProfile {
            name: "P128".into(),
            page_size: 128,
            ..ChipProfile::is25lp256()
        };
        let mut flash = Is25lp::new(MockTransport::new(), profile).with_timings(quick_timings());

        assert_eq!(
            flash.page_program(0x40, &[0u8; 128]),
            Err(Error::CrossesPageBoundary { addr: 0x40, len: 128 })
        );
        assert!(flash.transport_mut().sent.is_empty());
        assert_eq!(flash.page_program(0x80, &[0u8; 128]).unwrap(), 128);
    }

    #[test]
    fn test_oversized_write_sends_nothing() {
        let mut flash = driver();
        let data = [0u8; 300];
        assert_eq!(
            flash.page_write(0, 0, &data),
            Err(Error::InvalidLength { len: 300, max: 256 })
        );
        assert!(flash.release().sent.is_empty());
    }

    #[test]
    fn test_deferred_erase_then_wait_idle() {
        let mut flash = driver();
        flash.transport_mut().busy_polls = 3;
        flash.erase_sector(0, false).unwrap();
        assert!(flash.is_busy().unwrap());
        flash.wait_idle(OpKind::SectorErase).unwrap();
        assert!(!flash.is_busy().unwrap());
    }

    #[test]
    fn test_wait_idle_times_out_when_stuck() {
        let mut flash = driver();
        flash.erase_block64(3, false).unwrap();
        flash.transport_mut().stuck_busy = true;
        assert_eq!(
            flash.wait_idle(OpKind::Block64Erase),
            Err(Error::PollTimeout {
                op: OpKind::Block64Erase
            })
        );
    }

    #[test]
    fn test_program_while_erase_pending() {
        let mut flash = driver();
        flash.transport_mut().busy_polls = 5;
        flash.erase_sector(0, false).unwrap();
        assert_eq!(flash.page_program(0, b"x"), Err(Error::DeviceBusy));
        let ops = flash.release().opcodes();
        assert_eq!(ops.iter().filter(|&&op| op == opcodes::WREN).count(), 1);
        assert!(!ops.contains(&opcodes::PP));
    }

    #[test]
    fn test_write_latch_helpers() {
        let mut flash = driver();
        flash.write_enable().unwrap();
        assert!(flash.is_write_enabled().unwrap());
        flash.write_disable().unwrap();
        assert!(!flash.is_write_enabled().unwrap());
    }

    #[test]
    fn test_power_commands() {
        let mut flash = driver();
        flash.power_down().unwrap();
        flash.release_power_down().unwrap();
        assert_eq!(flash.release().opcodes(), [opcodes::DP, opcodes::RDP]);
    }

    #[test]
    fn test_reads_deliver_requested_length() {
        let mut flash = driver();
        let mut buf = [0u8; 16];
        assert_eq!(flash.read(0x100, &mut buf).unwrap(), 16);
        assert_eq!(flash.fast_read(0x100, &mut buf).unwrap(), 16);
        assert_eq!(buf[0], 0x00);
        assert_eq!(buf[15], 0x0F);
    }
}
