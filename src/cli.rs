//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a hex string (optionally 0x-prefixed) into bytes
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, String> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if hex.is_empty() || hex.len() % 2 != 0 {
        return Err(format!(
            "hex string must have a non-zero, even number of digits: {:?}",
            s
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("invalid hex value: {}", e))
        })
        .collect()
}

#[derive(Parser)]
#[command(name = "fwflash")]
#[command(author, version, about = "Firmware flash layout tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the flash sector table and region map
    Layout,

    /// Compute the firmware hash of an image loaded into emulated flash
    Hash {
        /// Firmware image file
        image: PathBuf,

        /// Challenge bytes as hex (e.g. 0xdeadbeef)
        #[arg(long)]
        challenge: Option<String>,
    },
}
