//! Protocol implementations
//!
//! `is25lp` encodes single commands and decodes their responses;
//! `sequencer` orders multi-step mutating operations and polls for
//! completion.

mod is25lp;
mod sequencer;

pub use is25lp::*;
pub use sequencer::*;
