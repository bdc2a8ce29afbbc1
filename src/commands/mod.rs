//! CLI command implementations
//!
//! Every command takes the driver handle generically so the same code runs
//! against spidev in the field and against the emulator in tests.

mod erase;
mod id;
mod list;
mod power;
mod read;
mod selftest;
mod verify;
mod write;

pub use erase::run_erase;
pub use id::{run_id, run_status};
pub use list::{list_profiles, list_programmers};
pub use power::{run_power_down, run_wake};
pub use read::run_dump;
pub use selftest::run_selftest;
pub use verify::run_verify;
pub use write::run_program;

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Read chunk size; one progress bar step
const CHUNK_SIZE: usize = 4096;

/// Create a byte progress bar with a phase label
fn progress_bar(total: u64, phase: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Read file contents into a Vec
fn read_file(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    println!("Read {} bytes from {:?}", data.len(), path);
    Ok(data)
}

/// Reject ranges that run past `limit` before anything is sent
fn check_range(start: u32, len: usize, limit: u32) -> Result<(), crate::error::CliError> {
    if start as u64 + len as u64 > limit as u64 {
        return Err(crate::error::CliError::OutOfRange { start, len, limit });
    }
    Ok(())
}
