//! is25flash - dump, erase and program IS25LP256 SPI NOR flash
//!
//! The chip is reached through a programmer backend selected at runtime
//! (`-p linux_spi:dev=/dev/spidev0.0`, `-p dummy`). Boards that share the
//! flash with another bus master can route it to the host through a GPIO
//! line with `--bypass gpiochip=0,line=17`; the line is released again
//! when the command finishes.

mod cli;
mod commands;
mod error;
mod hexdump;
mod programmers;
mod prompt;

use clap::Parser;
use cli::{Cli, Commands};
use programmers::Session;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_level(level)
        .init();

    match cli.command {
        Commands::ListProgrammers => {
            commands::list_programmers();
            return Ok(());
        }
        Commands::ListProfiles => return commands::list_profiles(&cli.target),
        _ => {}
    }

    let mut session = Session::open(&cli.target)?;
    let flash = &mut session.flash;

    match cli.command {
        Commands::Id => commands::run_id(flash),
        Commands::Status => commands::run_status(flash),
        Commands::Dump {
            start,
            length,
            output,
            fast,
        } => commands::run_dump(flash, start, length, output.as_deref(), fast),
        Commands::Erase {
            target,
            no_wait,
            yes,
        } => commands::run_erase(flash, target, !no_wait, yes),
        Commands::Program {
            input,
            start,
            verify,
            yes,
        } => commands::run_program(flash, &input, start, verify, yes),
        Commands::Verify { input, start } => commands::run_verify(flash, &input, start),
        Commands::Selftest { sector, yes } => commands::run_selftest(flash, sector, yes),
        Commands::PowerDown => commands::run_power_down(flash),
        Commands::Wake => commands::run_wake(flash),
        Commands::ListProgrammers | Commands::ListProfiles => Ok(()),
    }
}
