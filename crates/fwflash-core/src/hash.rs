//! Firmware and bootloader hashing
//!
//! Digests are computed over flash contents read through an address
//! translator, so the same routine serves both the memory-mapped device
//! and the emulated buffer. The firmware hash mixes in a caller-supplied
//! challenge and reports progress per chunk, which lets the UI animate
//! during the full-device walk.

use sha2::{Digest, Sha256};

use crate::layout::{FIRMWARE, LEGACY_BOOT};
use crate::translate::AddressTranslator;

/// Number of bytes hashed between two progress callbacks.
pub const HASH_CHUNK_SIZE: u32 = 1024;

// Progress accounting below assumes whole chunks.
const _: () = assert!(FIRMWARE.len % HASH_CHUNK_SIZE == 0);

/// Callback for progress reporting during a firmware hash
pub trait HashProgress {
    /// Called after each hashed chunk with the number of chunks done so
    /// far and the total number of chunks.
    fn progress(&mut self, current: u32, total: u32);
}

/// A no-op progress reporter
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl HashProgress for NoProgress {
    fn progress(&mut self, _current: u32, _total: u32) {}
}

/// Compute the firmware hash: SHA-256 over the challenge bytes followed
/// by the full firmware region.
///
/// The region is read through the translator in [`HASH_CHUNK_SIZE`]
/// chunks, re-translating each chunk's address so an emulated backend
/// whose base has moved is picked up mid-walk. `progress` is invoked
/// after every chunk with `(chunks_done, chunks_total)`.
///
/// # Safety
///
/// The translator's backing memory must cover the firmware region and
/// stay live for the duration of the call.
pub unsafe fn firmware_hash<T, P>(xlat: &T, challenge: &[u8], progress: &mut P) -> [u8; 32]
where
    T: AddressTranslator + ?Sized,
    P: HashProgress + ?Sized,
{
    let total_chunks = FIRMWARE.len / HASH_CHUNK_SIZE;
    log::trace!(
        "hashing firmware region: {} bytes in {} chunks, {} challenge bytes",
        FIRMWARE.len,
        total_chunks,
        challenge.len()
    );

    let mut hasher = Sha256::new();
    if !challenge.is_empty() {
        hasher.update(challenge);
    }

    let mut done = 0;
    let mut addr = FIRMWARE.start;
    while addr < FIRMWARE.end() {
        let chunk =
            unsafe { core::slice::from_raw_parts(xlat.translate(addr), HASH_CHUNK_SIZE as usize) };
        hasher.update(chunk);
        addr += HASH_CHUNK_SIZE;
        done += 1;
        progress.progress(done, total_chunks);
    }

    hasher.finalize().into()
}

/// Compute the bootloader hash: SHA-256 applied twice over the legacy
/// boot region.
///
/// The region has zero length in the standalone layout; the routine is
/// retained for API compatibility and yields the double hash of empty
/// input.
///
/// # Safety
///
/// The translator's backing memory must cover the legacy boot region and
/// stay live for the duration of the call. Trivially satisfied while the
/// region is empty.
pub unsafe fn bootloader_hash<T: AddressTranslator + ?Sized>(xlat: &T) -> [u8; 32] {
    let region: &[u8] = if LEGACY_BOOT.is_empty() {
        &[]
    } else {
        unsafe { core::slice::from_raw_parts(xlat.translate(LEGACY_BOOT.start), LEGACY_BOOT.len as usize) }
    };
    let first = Sha256::digest(region);
    Sha256::digest(first).into()
}
