//! CLI command implementations

mod hash;
mod layout;

pub use hash::run_hash;
pub use layout::run_layout;

use std::io;
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CommandError {
    /// I/O error reading an image file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Flash-level failure
    #[error("flash error: {0}")]
    Flash(#[from] fwflash_core::Error),

    /// Challenge argument could not be parsed
    #[error("invalid challenge: {0}")]
    InvalidChallenge(String),

    /// Progress bar template failed to parse
    #[error("progress template error: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}
