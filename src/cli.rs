//! CLI argument parsing

use crate::programmers;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use, name[:key=value,...] [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "is25flash")]
#[command(author, version, about = "IS25LP256 SPI NOR flash tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the flash is and what it is
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(
        short,
        long,
        global = true,
        default_value = "linux_spi:dev=/dev/spidev0.0",
        help = programmer_help()
    )]
    pub programmer: String,

    /// Drive a GPIO line while the flash is in use (gpiochip=N,line=N[,active_low=1])
    #[arg(long, global = true)]
    pub bypass: Option<String>,

    /// Chip profile name
    #[arg(long, global = true, default_value = "IS25LP256")]
    pub profile: String,

    /// Load additional chip profiles from a RON file
    #[arg(long, global = true)]
    pub profile_file: Option<PathBuf>,
}

/// Erase granularity selected on the command line
#[derive(Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
pub struct EraseTarget {
    /// 4 KiB sector number
    #[arg(long, value_parser = parse_hex_u32)]
    pub sector: Option<u32>,

    /// 32 KiB block number
    #[arg(long, value_parser = parse_hex_u32)]
    pub block32: Option<u32>,

    /// 64 KiB block number
    #[arg(long, value_parser = parse_hex_u32)]
    pub block64: Option<u32>,

    /// Whole chip
    #[arg(long)]
    pub chip: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read JEDEC and unique ID
    Id,

    /// Show the status register
    Status,

    /// Read flash contents (hex dump, or raw to a file)
    Dump {
        /// Start address (hex, e.g., 0x10000)
        #[arg(long, default_value = "0", value_parser = parse_hex_u32)]
        start: u32,

        /// Number of bytes (hex or decimal)
        #[arg(long, default_value = "256", value_parser = parse_hex_u32)]
        length: u32,

        /// Write raw bytes to this file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the Fast Read command
        #[arg(long)]
        fast: bool,
    },

    /// Erase a sector, block or the whole chip
    Erase {
        #[command(flatten)]
        target: EraseTarget,

        /// Return as soon as the command is issued
        #[arg(long)]
        no_wait: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Write a binary image to flash
    Program {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Start address, sector aligned (hex or decimal)
        #[arg(long, default_value = "0", value_parser = parse_hex_u32)]
        start: u32,

        /// Verify after writing
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        verify: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Verify flash contents against file
    Verify {
        /// Input file path to verify against
        #[arg(short, long)]
        input: PathBuf,

        /// Start address (hex or decimal)
        #[arg(long, default_value = "0", value_parser = parse_hex_u32)]
        start: u32,
    },

    /// Identify, erase one sector and program test patterns
    Selftest {
        /// Sector used for the write tests (its contents are lost)
        #[arg(long, default_value = "0", value_parser = parse_hex_u32)]
        sector: u32,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Put the chip into deep power down
    PowerDown,

    /// Release the chip from deep power down
    Wake,

    /// List supported programmers
    ListProgrammers,

    /// List known chip profiles
    ListProfiles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hex_u32() {
        assert_eq!(parse_hex_u32("0x1000"), Ok(0x1000));
        assert_eq!(parse_hex_u32("0XfF"), Ok(0xFF));
        assert_eq!(parse_hex_u32("4096"), Ok(4096));
        assert!(parse_hex_u32("0xZZ").is_err());
        assert!(parse_hex_u32("ten").is_err());
    }

    #[test]
    fn test_erase_requires_one_target() {
        assert!(Cli::try_parse_from(["is25flash", "erase"]).is_err());
        assert!(
            Cli::try_parse_from(["is25flash", "erase", "--sector", "1", "--chip"]).is_err()
        );

        let cli = Cli::try_parse_from(["is25flash", "erase", "--block64", "0x10", "-y"]).unwrap();
        match cli.command {
            Commands::Erase { target, yes, .. } => {
                assert_eq!(target.block64, Some(0x10));
                assert!(yes);
            }
            _ => panic!("expected erase"),
        }
    }

    #[test]
    fn test_global_target_options() {
        let cli = Cli::try_parse_from([
            "is25flash",
            "id",
            "-p",
            "dummy",
            "--profile",
            "IS25LP256-UID8",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.target.programmer, "dummy");
        assert_eq!(cli.target.profile, "IS25LP256-UID8");
        assert_eq!(cli.verbose, 2);
        assert!(cli.target.bypass.is_none());
    }
}
