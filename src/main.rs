//! fwflash - firmware flash layout tool
//!
//! Host-side companion to the flash layout crates: prints the device's
//! sector table and computes firmware hashes of image files by loading
//! them into emulated flash. Hardware access is out of scope here; the
//! same layout and hash code runs on the target against the memory-mapped
//! device.

mod cli;
mod commands;

use clap::Parser;
use cli::{parse_hex_bytes, Cli, Commands};
use commands::CommandError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Layout => {
            commands::run_layout();
        }
        Commands::Hash { image, challenge } => {
            let challenge = match challenge {
                Some(s) => parse_hex_bytes(&s).map_err(CommandError::InvalidChallenge)?,
                None => Vec::new(),
            };
            commands::run_hash(&image, &challenge)?;
        }
    }

    Ok(())
}
