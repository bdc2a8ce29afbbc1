//! GPIO bypass line implementation

use crate::error::{LinuxGpioError, Result};

use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use std::time::Duration;

/// Default time for the board to switch the bus over, in microseconds
const DEFAULT_SETTLE_US: u64 = 1000;

/// Configuration for the bypass line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassLineConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// Line offset on the chip
    pub line: Offset,
    /// Drive the line low to enable
    pub active_low: bool,
    /// Delay after every change before the bus is used
    pub settle_us: u64,
}

impl Default for BypassLineConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            line: 0,
            active_low: false,
            settle_us: DEFAULT_SETTLE_US,
        }
    }
}

impl BypassLineConfig {
    /// Create a new configuration with the given device path and line
    pub fn new(device: impl Into<String>, line: Offset) -> Self {
        Self {
            device: device.into(),
            line,
            ..Default::default()
        }
    }

    /// Set the line polarity
    pub fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    /// Set the settle delay in microseconds
    pub fn with_settle_us(mut self, us: u64) -> Self {
        self.settle_us = us;
        self
    }
}

/// A requested bypass line
///
/// Starts inactive. Dropping it drives the line inactive again.
pub struct BypassLine {
    /// GPIO line request handle
    request: Request,
    line: Offset,
    settle: Duration,
    enabled: bool,
}

impl BypassLine {
    /// Request the line as an output, initially inactive
    pub fn open(config: &BypassLineConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }

        log::debug!(
            "linux_gpio: Requesting line {} on {}",
            config.line,
            config.device
        );

        let mut req_config = Config::default();
        req_config
            .with_line(config.line)
            .as_output(Value::Inactive);
        if config.active_low {
            req_config.as_active_low();
        }

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer("is25flash")
            .request()
            .map_err(|e| LinuxGpioError::LineRequestFailed {
                path: config.device.clone(),
                line: config.line,
                source: e,
            })?;

        log::info!(
            "linux_gpio: Bypass line {} on {} ({})",
            config.line,
            config.device,
            if config.active_low {
                "active low"
            } else {
                "active high"
            }
        );

        Ok(Self {
            request,
            line: config.line,
            settle: Duration::from_micros(config.settle_us),
            enabled: false,
        })
    }

    /// Route the flash to the programmer (`true`) or back to the host
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let value = if enabled {
            Value::Active
        } else {
            Value::Inactive
        };
        self.request
            .set_value(self.line, value)
            .map_err(LinuxGpioError::SetValueFailed)?;
        self.enabled = enabled;
        log::debug!(
            "linux_gpio: Bypass {}",
            if enabled { "enabled" } else { "released" }
        );
        std::thread::sleep(self.settle);
        Ok(())
    }

    /// Whether the line is currently driven active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Line offset on the chip
    pub fn line(&self) -> Offset {
        self.line
    }
}

impl Drop for BypassLine {
    fn drop(&mut self) {
        if self.enabled {
            if let Err(e) = self.set_enabled(false) {
                log::error!("linux_gpio: Failed to release bypass line: {}", e);
            }
        }
    }
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, String> {
    match value {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(format!("Invalid {} value: {}", key, value)),
    }
}

/// Parse bypass options from a list of key-value pairs
///
/// Accepted keys: `dev`, `gpiochip`, `line`, `active_low`, `settle_us`.
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<BypassLineConfig, String> {
    let mut config = BypassLineConfig::default();
    let mut have_line = false;
    let mut gpiochip: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "gpiochip" => {
                gpiochip = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid gpiochip value: {}", value))?,
                );
            }
            "line" => {
                config.line = value
                    .parse()
                    .map_err(|_| format!("Invalid line value: {}", value))?;
                have_line = true;
            }
            "active_low" => {
                config.active_low = parse_bool(key, value)?;
            }
            "settle_us" => {
                config.settle_us = value
                    .parse()
                    .map_err(|_| format!("Invalid settle_us value: {}", value))?;
            }
            _ => {
                log::warn!("linux_gpio: Unknown option: {}={}", key, value);
            }
        }
    }

    // Handle dev vs gpiochip
    if config.device.is_empty() {
        if let Some(n) = gpiochip {
            config.device = format!("/dev/gpiochip{}", n);
        } else {
            return Err("Either 'dev' or 'gpiochip' must be specified.\n\
                 e.g. --bypass gpiochip=0,line=17"
                .to_string());
        }
    } else if gpiochip.is_some() {
        return Err("Only one of 'dev' or 'gpiochip' can be specified".to_string());
    }

    if !have_line {
        return Err("Missing required parameter: line".to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gpiochip_number() {
        let config =
            parse_options(&[("gpiochip", "2"), ("line", "17"), ("active_low", "1")]).unwrap();
        assert_eq!(
            config,
            BypassLineConfig::new("/dev/gpiochip2", 17).with_active_low(true)
        );
    }

    #[test]
    fn test_parse_dev_and_settle() {
        let config = parse_options(&[
            ("dev", "/dev/gpiochip0"),
            ("line", "4"),
            ("settle_us", "50"),
        ])
        .unwrap();
        assert_eq!(config.device, "/dev/gpiochip0");
        assert_eq!(config.settle_us, 50);
        assert!(!config.active_low);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_options(&[("line", "4")]).is_err());
        assert!(parse_options(&[("gpiochip", "0")]).is_err());
        assert!(parse_options(&[("dev", "/dev/gpiochip0"), ("gpiochip", "0"), ("line", "1")]).is_err());
        assert!(parse_options(&[("gpiochip", "0"), ("line", "1"), ("active_low", "maybe")]).is_err());
    }

    #[test]
    fn test_open_without_device() {
        assert!(matches!(
            BypassLine::open(&BypassLineConfig::default()),
            Err(LinuxGpioError::NoDevice)
        ));
    }
}
