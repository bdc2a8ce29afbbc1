//! Dump command implementation

use indicatif::ProgressBar;
use is25flash_core::flash::Is25lp;
use is25flash_core::transport::SpiTransport;
use std::path::Path;

use super::{check_range, progress_bar, CHUNK_SIZE};
use crate::hexdump;

/// Largest dump printed as hex before `--output` is required
const MAX_HEXDUMP_LEN: usize = 64 * 1024;

/// Run the dump command
pub fn run_dump<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    start: u32,
    length: u32,
    output: Option<&Path>,
    fast: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let len = length as usize;
    check_range(start, len, flash.profile().addressable_size())?;

    match output {
        Some(path) => {
            let pb = progress_bar(len as u64, "Reading")?;
            let data = read_range(flash, start, len, fast, &pb)?;
            pb.finish_with_message("Read complete");

            std::fs::write(path, &data)?;
            println!("Wrote {} bytes to {:?}", data.len(), path);
        }
        None => {
            if len > MAX_HEXDUMP_LEN {
                return Err(format!(
                    "{} bytes is too much to print; use --output to save to a file",
                    len
                )
                .into());
            }
            let data = read_range(flash, start, len, fast, &ProgressBar::hidden())?;
            println!("{} Data: n={}", if fast { "Fast Read" } else { "Read" }, data.len());
            hexdump::print_dump(start, &data);
        }
    }
    Ok(())
}

/// Read `len` bytes from `start`, advancing `pb` per chunk
pub fn read_range<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    start: u32,
    len: usize,
    fast: bool,
    pb: &ProgressBar,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut data = vec![0u8; len];

    let mut offset = 0usize;
    while offset < len {
        let chunk_size = std::cmp::min(CHUNK_SIZE, len - offset);
        let chunk = &mut data[offset..offset + chunk_size];
        let addr = start + offset as u32;

        if fast {
            flash.fast_read(addr, chunk)?;
        } else {
            flash.read(addr, chunk)?;
        }

        offset += chunk_size;
        pb.set_position(offset as u64);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use is25flash_dummy::{DummyConfig, DummyFlash};

    fn patterned() -> DummyFlash {
        let image: Vec<u8> = (0..3 * CHUNK_SIZE).map(|i| (i % 251) as u8).collect();
        DummyFlash::with_data(DummyConfig::default(), &image)
    }

    #[test]
    fn test_read_range_crosses_chunks() {
        let mut flash = Is25lp::begin(patterned());
        let data = read_range(&mut flash, 100, 2 * CHUNK_SIZE, false, &ProgressBar::hidden())
            .unwrap();
        assert_eq!(data.len(), 2 * CHUNK_SIZE);
        assert!(data
            .iter()
            .enumerate()
            .all(|(i, &b)| b == ((i + 100) % 251) as u8));
    }

    #[test]
    fn test_fast_read_matches_read() {
        let mut flash = Is25lp::begin(patterned());
        let pb = ProgressBar::hidden();
        let slow = read_range(&mut flash, 0x123, 5000, false, &pb).unwrap();
        let fast = read_range(&mut flash, 0x123, 5000, true, &pb).unwrap();
        assert_eq!(slow, fast);
    }

    #[test]
    fn test_dump_to_file() {
        let path = std::env::temp_dir().join(format!("is25flash-dump-{}.bin", std::process::id()));
        let mut flash = Is25lp::begin(patterned());
        run_dump(&mut flash, 0, 512, Some(&path), false).unwrap();

        let saved = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(saved.len(), 512);
        assert_eq!(saved[300], (300 % 251) as u8);
    }

    #[test]
    fn test_dump_rejects_out_of_range() {
        let mut flash = Is25lp::begin(DummyFlash::new_default());
        let end = flash.profile().addressable_size();
        assert!(run_dump(&mut flash, end - 16, 32, None, false).is_err());
        assert!(flash.transport_mut().opcode_log().is_empty());
    }

    #[test]
    fn test_dump_stops_at_3b_limit() {
        let path = std::env::temp_dir().join(format!("is25flash-edge-{}.bin", std::process::id()));
        let mut flash = Is25lp::begin(DummyFlash::new_default());

        assert!(run_dump(&mut flash, 0xFF_F000, 0x2000, Some(&path), false).is_err());
        assert!(flash.transport_mut().opcode_log().is_empty());
        assert!(!path.exists());

        run_dump(&mut flash, 0xFF_F000, 0x1000, Some(&path), false).unwrap();
        let _ = std::fs::remove_file(&path);
    }
}
