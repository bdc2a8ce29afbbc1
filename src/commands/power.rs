//! Deep power down commands

use is25flash_core::flash::Is25lp;
use is25flash_core::transport::SpiTransport;

/// Enter deep power down
pub fn run_power_down<T: SpiTransport>(
    flash: &mut Is25lp<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    flash.power_down()?;
    println!("Entered deep power down");
    Ok(())
}

/// Leave deep power down and confirm the chip answers again
pub fn run_wake<T: SpiTransport>(flash: &mut Is25lp<T>) -> Result<(), Box<dyn std::error::Error>> {
    flash.release_power_down()?;
    let jedec = flash.verify_jedec_id()?;
    println!("Released from deep power down (JEDEC ID {})", jedec);
    Ok(())
}
