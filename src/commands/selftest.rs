//! Bring-up self test
//!
//! Walks one sector through the full command set: identify, read both
//! ways, erase, two partial page writes and a final status read. The
//! sector's previous contents are lost.

use is25flash_core::chip::Capabilities;
use is25flash_core::flash::Is25lp;
use is25flash_core::geometry::{EraseUnit, Sector, PAGE_SIZE};
use is25flash_core::transport::SpiTransport;

use super::verify::compare;
use crate::error::CliError;
use crate::hexdump;
use crate::prompt;

const LETTERS_OFFSET: u32 = 10;

/// Run the self test on `sector`
pub fn run_selftest<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    sector: u32,
    assume_yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sector = Sector(sector);
    sector.check_3b()?;
    let base = sector.address();

    if !prompt::confirm(
        &format!("Self test erases sector {} (0x{:06X}). Continue?", sector.0, base),
        assume_yes,
    )? {
        return Err(CliError::Aborted.into());
    }

    let jedec = flash.verify_jedec_id()?;
    println!("JEDEC ID : {}", jedec);
    if flash.profile().has(Capabilities::UNIQUE_ID) {
        println!("Unique ID : {}", flash.read_unique_id()?);
    }

    read_and_dump(flash, base, false)?;
    if flash.profile().has(Capabilities::FAST_READ) {
        read_and_dump(flash, base, true)?;
    }

    flash.erase_sector(sector.0, true)?;
    println!("Erase Sector({}): done", sector.0);
    read_and_dump(flash, base, false)?;

    let letters: Vec<u8> = (b'A'..=b'Z').collect();
    let n = flash.page_write(sector.0, LETTERS_OFFSET, &letters)?;
    println!("page_write({},{},d,{}): n={}", sector.0, LETTERS_OFFSET, letters.len(), n);
    read_and_dump(flash, base, false)?;

    let digits: Vec<u8> = (b'0'..=b'9').collect();
    let n = flash.page_write(sector.0, 0, &digits)?;
    println!("page_write({},0,d,{}): n={}", sector.0, digits.len(), n);
    let fast = flash.profile().has(Capabilities::FAST_READ);
    let page = read_and_dump(flash, base, fast)?;

    println!("Status Register: {}", flash.read_status()?);

    if let Some(err) = compare(base, &expected_page(), &page) {
        return Err(err.into());
    }
    println!("Self test passed");
    Ok(())
}

/// Page contents after both writes: digits, letters, then erased bytes
fn expected_page() -> Vec<u8> {
    let mut page = vec![0xFF; PAGE_SIZE];
    for (i, b) in (b'0'..=b'9').enumerate() {
        page[i] = b;
    }
    for (i, b) in (b'A'..=b'Z').enumerate() {
        page[LETTERS_OFFSET as usize + i] = b;
    }
    page
}

fn read_and_dump<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    base: u32,
    fast: bool,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut buf = vec![0u8; PAGE_SIZE];
    let n = if fast {
        flash.fast_read(base, &mut buf)?
    } else {
        flash.read(base, &mut buf)?
    };
    println!("{} Data: n={}", if fast { "Fast Read" } else { "Read" }, n);
    hexdump::print_dump(base, &buf);
    Ok(buf)
}
