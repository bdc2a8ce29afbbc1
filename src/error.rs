//! CLI error types

use thiserror::Error;

/// Errors raised by the command-line layer itself
#[derive(Debug, Error)]
pub enum CliError {
    /// No programmer with this name or alias is compiled in
    #[error("Unknown programmer: {0}")]
    UnknownProgrammer(String),

    /// Programmer or bypass options could not be parsed
    #[error("Invalid {programmer} parameters: {message}")]
    InvalidOptions {
        programmer: &'static str,
        message: String,
    },

    /// No profile with this name
    #[error("Unknown chip profile: {0} (see 'is25flash list-profiles')")]
    UnknownProfile(String),

    /// Address must sit on an erase boundary
    #[error("Start address 0x{addr:06X} is not aligned to {align} bytes")]
    Unaligned { addr: u32, align: u32 },

    /// Requested range does not fit the chip
    #[error("Range 0x{start:06X}+{len} exceeds {limit} bytes")]
    OutOfRange { start: u32, len: usize, limit: u32 },

    /// Read-back differs from the expected data
    #[error(
        "Verification failed: {count} byte(s) differ. First mismatch at 0x{addr:06X}: \
         expected 0x{expected:02X}, got 0x{actual:02X}"
    )]
    VerifyFailed {
        count: usize,
        addr: u32,
        expected: u8,
        actual: u8,
    },

    /// User declined a destructive operation
    #[error("Aborted")]
    Aborted,
}
