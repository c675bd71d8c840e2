//! Hash command implementation

use std::fs;
use std::path::Path;

use fwflash_core::hash::{self, HashProgress, HASH_CHUNK_SIZE};
use fwflash_core::layout::FIRMWARE;
use fwflash_emu::EmulatedFlash;
use indicatif::{ProgressBar, ProgressStyle};

use super::CommandError;

/// Bridges the core progress callback onto an indicatif bar
struct BarProgress<'a>(&'a ProgressBar);

impl HashProgress for BarProgress<'_> {
    fn progress(&mut self, current: u32, _total: u32) {
        self.0
            .set_position(current as u64 * HASH_CHUNK_SIZE as u64);
    }
}

/// Run the hash command
pub fn run_hash(image_path: &Path, challenge: &[u8]) -> Result<(), CommandError> {
    let image = fs::read(image_path)?;
    log::info!(
        "loaded image {} ({} bytes) into emulated flash",
        image_path.display(),
        image.len()
    );

    let flash = EmulatedFlash::with_image(&image)?;

    let pb = ProgressBar::new(FIRMWARE.len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) Hashing")?
            .progress_chars("#>-"),
    );

    // The emulated buffer stays live for the whole call; the region walk
    // stays within the firmware bounds by construction.
    let digest = unsafe { hash::firmware_hash(&flash, challenge, &mut BarProgress(&pb)) };
    pb.finish_and_clear();

    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    println!("{}  {}", hex, image_path.display());
    Ok(())
}
