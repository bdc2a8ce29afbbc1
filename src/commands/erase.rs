//! Erase command implementation

use indicatif::{ProgressBar, ProgressStyle};
use is25flash_core::error::OpKind;
use is25flash_core::flash::Is25lp;
use is25flash_core::transport::SpiTransport;
use std::time::Duration;

use crate::cli::EraseTarget;
use crate::error::CliError;
use crate::prompt;

/// Run the erase command
pub fn run_erase<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    target: EraseTarget,
    wait: bool,
    assume_yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (op, label) = describe(&target);

    if target.chip
        && !prompt::confirm(
            &format!("Erase the entire {}?", flash.profile().name),
            assume_yes,
        )?
    {
        return Err(CliError::Aborted.into());
    }

    let spinner = if wait {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Erasing {}...", label));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = erase_target(flash, &target, wait);

    if let Some(pb) = spinner {
        match &result {
            Ok(()) => pb.finish_with_message(format!("Erased {}", label)),
            Err(_) => pb.abandon_with_message(format!("Erasing {} failed", label)),
        }
    }
    result?;

    if !wait {
        println!("{} erase issued; not waiting for completion", op);
    }
    Ok(())
}

/// Issue the erase selected by `target`
pub fn erase_target<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    target: &EraseTarget,
    wait: bool,
) -> is25flash_core::Result<()> {
    if let Some(n) = target.sector {
        flash.erase_sector(n, wait)
    } else if let Some(n) = target.block32 {
        flash.erase_block32(n, wait)
    } else if let Some(n) = target.block64 {
        flash.erase_block64(n, wait)
    } else {
        flash.erase_chip(wait)
    }
}

fn describe(target: &EraseTarget) -> (OpKind, String) {
    if let Some(n) = target.sector {
        (OpKind::SectorErase, format!("sector {}", n))
    } else if let Some(n) = target.block32 {
        (OpKind::Block32Erase, format!("32K block {}", n))
    } else if let Some(n) = target.block64 {
        (OpKind::Block64Erase, format!("64K block {}", n))
    } else {
        (OpKind::ChipErase, "chip".to_string())
    }
}
