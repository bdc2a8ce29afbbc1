//! Identification and status commands

use is25flash_core::chip::Capabilities;
use is25flash_core::flash::Is25lp;
use is25flash_core::transport::SpiTransport;

/// Print the JEDEC ID and unique ID, checking the ID against the profile
pub fn run_id<T: SpiTransport>(flash: &mut Is25lp<T>) -> Result<(), Box<dyn std::error::Error>> {
    let jedec = flash.read_jedec_id()?;
    println!("JEDEC ID : {}", jedec);

    let expected = flash.profile().jedec_id;
    if jedec == expected {
        println!("Found: {} ({} bytes)", flash.profile().name, flash.profile().total_size);
    } else {
        log::warn!(
            "JEDEC ID {} does not match profile {} ({})",
            jedec,
            flash.profile().name,
            expected
        );
    }

    if flash.profile().has(Capabilities::UNIQUE_ID) {
        let uid = flash.read_unique_id()?;
        println!("Unique ID : {}", uid);
    }
    Ok(())
}

/// Print the status register(s)
pub fn run_status<T: SpiTransport>(
    flash: &mut Is25lp<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = flash.read_status()?;
    println!("Status Register: {}", status);
    println!("  Block protect level: {}", status.block_protect());

    if flash.profile().has(Capabilities::STATUS_REG_2) {
        println!("Status Register-2: 0x{:02X}", flash.read_status2()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use is25flash_dummy::DummyFlash;

    #[test]
    fn test_id_and_status_on_emulator() {
        let mut flash = Is25lp::begin(DummyFlash::new_default());
        run_id(&mut flash).unwrap();
        run_status(&mut flash).unwrap();
    }

    #[test]
    fn test_id_reports_transport_failure() {
        let mut dummy = DummyFlash::new_default();
        dummy.fail_next_transfer();
        let mut flash = Is25lp::begin(dummy);
        assert!(run_id(&mut flash).is_err());
    }
}
