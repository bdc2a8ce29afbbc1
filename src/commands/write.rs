//! Program command implementation

use indicatif::ProgressBar;
use is25flash_core::flash::Is25lp;
use is25flash_core::geometry::{EraseUnit, Sector};
use is25flash_core::transport::SpiTransport;
use std::path::Path;

use super::{check_range, progress_bar, read_file};
use crate::error::CliError;
use crate::prompt;

/// Counters reported after a program run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgramStats {
    /// Sectors erased
    pub sectors_erased: usize,
    /// Pages sent to the chip
    pub pages_programmed: usize,
    /// Pages skipped because they hold only 0xFF
    pub pages_skipped: usize,
}

/// Run the program command
pub fn run_program<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    input: &Path,
    start: u32,
    verify: bool,
    assume_yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = read_file(input)?;
    if image.is_empty() {
        return Err("Input file is empty".into());
    }

    let end = start as u64 + image.len() as u64;
    if !prompt::confirm(
        &format!(
            "Erase and program 0x{:06X}..0x{:06X} on {}?",
            start,
            end,
            flash.profile().name
        ),
        assume_yes,
    )? {
        return Err(CliError::Aborted.into());
    }

    let pb = progress_bar(image.len() as u64, "Writing")?;
    let stats = program_image(flash, start, &image, &pb)?;
    pb.finish_with_message("Write complete");

    println!(
        "{} sector(s) erased, {} page(s) programmed, {} blank page(s) skipped",
        stats.sectors_erased, stats.pages_programmed, stats.pages_skipped
    );

    if verify {
        super::verify::verify_image(flash, start, &image)?;
        println!("Verification passed");
    }
    Ok(())
}

/// Erase the sectors covering `image` and program it in profile-sized pages
///
/// `start` must be sector aligned so no data outside the image is lost.
pub fn program_image<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    start: u32,
    image: &[u8],
    pb: &ProgressBar,
) -> Result<ProgramStats, Box<dyn std::error::Error>> {
    let sector_size = Sector::SIZE;
    if start % sector_size != 0 {
        return Err(CliError::Unaligned {
            addr: start,
            align: sector_size,
        }
        .into());
    }
    check_range(start, image.len(), flash.profile().addressable_size())?;

    let page_size = flash.profile().program_page_size();
    let mut stats = ProgramStats::default();

    for (i, page) in image.chunks(page_size).enumerate() {
        let addr = start + (i * page_size) as u32;

        if addr % sector_size == 0 {
            let sector = Sector::containing(addr);
            log::debug!("erasing sector {} at 0x{:06X}", sector.0, addr);
            flash.erase_sector(sector.0, true)?;
            stats.sectors_erased += 1;
        }

        if page.iter().all(|&b| b == 0xFF) {
            stats.pages_skipped += 1;
        } else {
            flash.page_program(addr, page)?;
            stats.pages_programmed += 1;
        }

        pb.inc(page.len() as u64);
    }

    Ok(stats)
}
