//! Verify command implementation

use is25flash_core::chip::Capabilities;
use is25flash_core::flash::Is25lp;
use is25flash_core::transport::SpiTransport;
use std::path::Path;

use super::read::read_range;
use super::{check_range, progress_bar, read_file};
use crate::error::CliError;

/// Run the verify command
pub fn run_verify<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    input: &Path,
    start: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected = read_file(input)?;
    verify_image(flash, start, &expected)?;
    println!("Verification passed");
    Ok(())
}

/// Read back `expected.len()` bytes from `start` and compare
pub fn verify_image<T: SpiTransport>(
    flash: &mut Is25lp<T>,
    start: u32,
    expected: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    check_range(start, expected.len(), flash.profile().addressable_size())?;

    let pb = progress_bar(expected.len() as u64, "Verifying")?;
    let fast = flash.profile().has(Capabilities::FAST_READ);
    let actual = read_range(flash, start, expected.len(), fast, &pb)?;
    pb.finish_with_message("Verify complete");

    match compare(start, expected, &actual) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Compare two buffers and describe the first mismatch
pub fn compare(base: u32, expected: &[u8], actual: &[u8]) -> Option<CliError> {
    let mut mismatches = expected
        .iter()
        .zip(actual)
        .enumerate()
        .filter(|(_, (e, a))| e != a);

    let (offset, (&e, &a)) = mismatches.next()?;
    Some(CliError::VerifyFailed {
        count: 1 + mismatches.count(),
        addr: base + offset as u32,
        expected: e,
        actual: a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use is25flash_dummy::{DummyConfig, DummyFlash};

    #[test]
    fn test_compare() {
        assert!(compare(0, b"abcd", b"abcd").is_none());

        match compare(0x100, b"abcd", b"abXY") {
            Some(CliError::VerifyFailed {
                count,
                addr,
                expected,
                actual,
            }) => {
                assert_eq!(count, 2);
                assert_eq!(addr, 0x102);
                assert_eq!(expected, b'c');
                assert_eq!(actual, b'X');
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_verify_image_against_emulator() {
        let mut flash = Is25lp::begin(DummyFlash::with_data(DummyConfig::default(), b"hello"));
        assert!(verify_image(&mut flash, 0, b"hello").is_ok());

        let err = verify_image(&mut flash, 0, b"help!").unwrap_err();
        assert!(err.to_string().contains("0x000003"));
    }

    #[test]
    fn test_verify_past_3b_limit_reads_nothing() {
        let mut flash = Is25lp::begin(DummyFlash::new_default());
        let err = verify_image(&mut flash, 0xFF_FFF0, &[0xFF; 32]).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
        assert!(flash.transport_mut().opcode_log().is_empty());
    }
}
