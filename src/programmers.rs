//! Programmer registration and dispatch
//!
//! This module provides a centralized registry for all programmers, with support
//! for feature-gated inclusion and dynamic help text generation.

use is25flash_core::chip::{ChipProfile, ProfileDatabase};
use is25flash_core::flash::Is25lp;
use is25flash_core::transport::SpiTransport;

use crate::cli::TargetArgs;
use crate::error::CliError;

/// Boxed transport selected at runtime
pub type BoxedTransport = Box<dyn SpiTransport + Send>;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "In-memory IS25LP256 emulator (busy=<polls>,image=<file>)",
    });

    #[cfg(feature = "linux-spi")]
    programmers.push(ProgrammerInfo {
        name: "linux_spi",
        aliases: &["linux-spi", "spidev"],
        description: "Linux spidev interface (dev=/dev/spidevX.Y,spispeed=<kHz>,mode=<0-3>)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:12} - {}\n", p.name, p.description));
        if !p.aliases.is_empty() {
            help.push_str(&format!("  {:12}   aliases: {}\n", "", p.aliases.join(", ")));
        }
    }
    help
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Resolve a name or alias to the canonical programmer name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

/// Parse a bare option list ("key=value,...") as used by `--bypass`
pub fn parse_option_list(s: &str) -> Vec<(&str, &str)> {
    s.split(',').filter_map(|opt| opt.split_once('=')).collect()
}

/// Open the transport named by a programmer string
#[allow(unused_variables)]
pub fn open_transport(programmer: &str) -> Result<BoxedTransport, Box<dyn std::error::Error>> {
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => return Err(unknown_programmer_error(name)),
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&options),

        #[cfg(feature = "linux-spi")]
        "linux_spi" => {
            log::info!("Opening Linux SPI programmer...");
            is25flash_linux_spi::open_linux_spi(&options).map_err(|e| {
                format!(
                    "Failed to open Linux SPI device: {}\n\
                     Make sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG spi $USER",
                    e
                )
                .into()
            })
        }

        _ => Err(unknown_programmer_error(name)),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(options: &[(&str, &str)]) -> Result<BoxedTransport, Box<dyn std::error::Error>> {
    use is25flash_dummy::{DummyConfig, DummyFlash};

    let mut config = DummyConfig::default();
    let mut image = None;

    for (key, value) in options {
        match *key {
            "busy" => {
                config.busy_polls = value.parse().map_err(|_| CliError::InvalidOptions {
                    programmer: "dummy",
                    message: format!("Invalid busy value: {}", value),
                })?;
            }
            "image" => image = Some(std::fs::read(value)?),
            _ => log::warn!("dummy: Unknown option: {}={}", key, value),
        }
    }

    log::info!("Using in-memory emulator");
    let flash = match image {
        Some(data) => DummyFlash::with_data(config, &data),
        None => DummyFlash::new(config),
    };
    Ok(Box::new(flash))
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("{}\n\n", CliError::UnknownProgrammer(name.to_string()));
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'is25flash list-programmers' for more details");
    msg.into()
}

/// Look up the chip profile requested on the command line
pub fn resolve_profile(target: &TargetArgs) -> Result<ChipProfile, Box<dyn std::error::Error>> {
    let mut db = ProfileDatabase::new();
    if let Some(path) = &target.profile_file {
        let count = db.load_file(path)?;
        log::info!("Loaded {} profile(s) from {}", count, path.display());
    }

    db.find_by_name(&target.profile)
        .cloned()
        .ok_or_else(|| CliError::UnknownProfile(target.profile.clone()).into())
}

/// An open flash plus the bypass line guarding it
///
/// Fields drop in order: the flash is released before the bypass line
/// routes the bus back to the host.
pub struct Session {
    /// The driver
    pub flash: Is25lp<BoxedTransport>,
    #[cfg(feature = "linux-gpio")]
    _bypass: Option<is25flash_linux_gpio::BypassLine>,
}

impl Session {
    /// Open the programmer, enable the bypass line and bind the driver
    pub fn open(target: &TargetArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let profile = resolve_profile(target)?;

        #[cfg(feature = "linux-gpio")]
        let bypass = match &target.bypass {
            Some(spec) => {
                let config = is25flash_linux_gpio::parse_options(&parse_option_list(spec))
                    .map_err(|message| CliError::InvalidOptions {
                        programmer: "bypass",
                        message,
                    })?;
                let mut line = is25flash_linux_gpio::BypassLine::open(&config)?;
                line.set_enabled(true)?;
                Some(line)
            }
            None => None,
        };

        #[cfg(not(feature = "linux-gpio"))]
        if target.bypass.is_some() {
            return Err("--bypass requires the linux-gpio feature".into());
        }

        let transport = open_transport(&target.programmer)?;
        log::debug!("Using profile {}", profile.name);

        Ok(Self {
            flash: Is25lp::new(transport, profile),
            #[cfg(feature = "linux-gpio")]
            _bypass: bypass,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_programmer_string() {
        let (name, opts) = parse_programmer_string("linux_spi:dev=/dev/spidev0.1,spispeed=8000");
        assert_eq!(name, "linux_spi");
        assert_eq!(opts, [("dev", "/dev/spidev0.1"), ("spispeed", "8000")]);

        let (name, opts) = parse_programmer_string("dummy");
        assert_eq!(name, "dummy");
        assert!(opts.is_empty());
    }

    #[test]
    fn test_parse_option_list_skips_malformed() {
        assert_eq!(
            parse_option_list("gpiochip=0,bogus,line=17"),
            [("gpiochip", "0"), ("line", "17")]
        );
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_find_programmer_aliases() {
        assert_eq!(find_programmer("emulator"), Some("dummy"));
        assert_eq!(find_programmer("ch341a"), None);
    }

    #[cfg(feature = "linux-spi")]
    #[test]
    fn test_find_linux_spi_alias() {
        assert_eq!(find_programmer("spidev"), Some("linux_spi"));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy_identifies() {
        let transport = open_transport("dummy:busy=1").unwrap();
        let mut flash = Is25lp::begin(transport);
        assert!(flash.verify_jedec_id().is_ok());
    }

    #[test]
    fn test_unknown_programmer() {
        assert!(open_transport("nonexistent").is_err());
    }
}
