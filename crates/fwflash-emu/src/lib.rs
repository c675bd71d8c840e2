//! fwflash-emu - In-memory flash emulator
//!
//! This crate provides a host-side buffer standing in for the 1 MiB
//! flash device. It implements the core address-translator and
//! protection-control traits, so code written against the hardware
//! layout runs unmodified in tests and tooling.
//!
//! Program and erase go through safe, flash-faithful operations:
//! programming can only clear bits, erase works at sector granularity and
//! restores 0xFF, and both respect the lock latch and per-sector
//! protection. Raw writes through the translator bypass all of that,
//! exactly as a stray pointer store would on hardware.

use fwflash_core::error::{Error, Result};
use fwflash_core::layout::{
    sector_range, FLASH_ORIGIN, FLASH_TOTAL_SIZE, SECTOR_COUNT,
};
use fwflash_core::protect::{ProtectionControl, SectorMask};
use fwflash_core::translate::AddressTranslator;

/// The erased value for flash memory (all bits set)
const ERASED_VALUE: u8 = 0xFF;

/// Emulated flash device
///
/// Owns the backing buffer for the whole device. The buffer base is
/// re-read on every translation, so callers must never cache translated
/// pointers across operations that may replace the buffer.
pub struct EmulatedFlash {
    /// Backing allocation, one byte per flash byte
    ptr: *mut u8,
    /// Lock latch; program/erase refuse until `write_unlock`
    unlocked: bool,
    /// Per-sector write protection
    protected: SectorMask,
}

impl EmulatedFlash {
    /// Create a new emulated flash, fully erased.
    pub fn new() -> Self {
        let buf = vec![ERASED_VALUE; FLASH_TOTAL_SIZE as usize].into_boxed_slice();
        Self {
            ptr: Box::into_raw(buf) as *mut u8,
            unlocked: false,
            protected: SectorMask::empty(),
        }
    }

    /// Create an emulated flash seeded with a firmware image.
    pub fn with_image(image: &[u8]) -> Result<Self> {
        let mut flash = Self::new();
        flash.load_image(image)?;
        Ok(flash)
    }

    /// Seed the backing store with a firmware image.
    ///
    /// This is a harness facility, not a programming operation: the old
    /// backing allocation is replaced by a fresh erased one with the image
    /// copied in, regardless of lock or protection state. The buffer base
    /// moves, which is why translated pointers must never be cached across
    /// calls.
    pub fn load_image(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > FLASH_TOTAL_SIZE as usize {
            return Err(Error::ImageTooLarge);
        }
        let mut buf = vec![ERASED_VALUE; FLASH_TOTAL_SIZE as usize].into_boxed_slice();
        buf[..image.len()].copy_from_slice(image);
        let old = std::mem::replace(&mut self.ptr, Box::into_raw(buf) as *mut u8);
        let slice = std::ptr::slice_from_raw_parts_mut(old, FLASH_TOTAL_SIZE as usize);
        unsafe { drop(Box::from_raw(slice)) };
        log::debug!("loaded {} byte image into emulated flash", image.len());
        Ok(())
    }

    /// Get a reference to the flash contents
    pub fn data(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, FLASH_TOTAL_SIZE as usize) }
    }

    /// Get a mutable reference to the flash contents
    pub fn data_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, FLASH_TOTAL_SIZE as usize) }
    }

    /// Whether the device is unlocked for program/erase
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Currently protected sectors
    pub fn protected_sectors(&self) -> SectorMask {
        self.protected
    }

    /// Re-engage the lock latch
    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    /// Erase a sector, restoring it to 0xFF.
    ///
    /// Requires the device to be unlocked and the sector unprotected.
    pub fn erase_sector(&mut self, index: u8) -> Result<()> {
        let mask = SectorMask::single(index).ok_or(Error::InvalidSector)?;
        if !self.unlocked {
            return Err(Error::WriteLocked);
        }
        if self.protected.intersects(mask) {
            return Err(Error::SectorProtected);
        }

        let range = sector_range(index);
        let offset = (range.start - FLASH_ORIGIN) as usize;
        self.data_mut()[offset..offset + range.len as usize].fill(ERASED_VALUE);
        log::debug!("erased sector {} ({} bytes)", index, range.len);
        Ok(())
    }

    /// Program bytes at a flash address.
    ///
    /// Flash programming can only change 1 -> 0; bits already cleared
    /// stay cleared until the sector is erased. Requires the device to be
    /// unlocked and every spanned sector unprotected.
    pub fn program(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        if !self.unlocked {
            return Err(Error::WriteLocked);
        }

        let offset = addr.checked_sub(FLASH_ORIGIN).ok_or(Error::AddressOutOfBounds)? as usize;
        if offset + data.len() > FLASH_TOTAL_SIZE as usize {
            return Err(Error::AddressOutOfBounds);
        }

        let end = addr + data.len() as u32;
        for index in 0..SECTOR_COUNT {
            let range = sector_range(index);
            if addr < range.end() && range.start < end {
                if let Some(mask) = SectorMask::single(index) {
                    if self.protected.intersects(mask) {
                        return Err(Error::SectorProtected);
                    }
                }
            }
        }

        let dest = &mut self.data_mut()[offset..offset + data.len()];
        for (have, want) in dest.iter_mut().zip(data) {
            *have &= want;
        }
        Ok(())
    }
}

impl Default for EmulatedFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EmulatedFlash {
    fn drop(&mut self) {
        let slice = std::ptr::slice_from_raw_parts_mut(self.ptr, FLASH_TOTAL_SIZE as usize);
        unsafe { drop(Box::from_raw(slice)) };
    }
}

impl AddressTranslator for EmulatedFlash {
    #[inline]
    fn translate(&self, addr: u32) -> *mut u8 {
        debug_assert!(addr >= FLASH_ORIGIN && addr - FLASH_ORIGIN < FLASH_TOTAL_SIZE);
        // Rebase against the current allocation on every call
        unsafe { self.ptr.add((addr - FLASH_ORIGIN) as usize) }
    }
}

impl ProtectionControl for EmulatedFlash {
    fn protect(&mut self) -> Result<()> {
        self.protected = SectorMask::CODE;
        log::debug!("write protection enabled on {:?}", self.protected);
        Ok(())
    }

    fn write_unlock(&mut self) -> Result<()> {
        self.unlocked = true;
        log::debug!("flash unlocked for program/erase");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwflash_core::access;
    use fwflash_core::hash::{self, HashProgress, NoProgress, HASH_CHUNK_SIZE};
    use fwflash_core::layout::FIRMWARE;
    use sha2::{Digest, Sha256};

    #[test]
    fn translate_origin_yields_buffer_base() {
        let flash = EmulatedFlash::new();
        assert_eq!(flash.translate(FLASH_ORIGIN) as *const u8, flash.data().as_ptr());
    }

    #[test]
    fn translate_is_computed_per_call() {
        let flash = EmulatedFlash::new();
        let base = flash.data().as_ptr() as usize;
        assert_eq!(flash.translate(FLASH_ORIGIN + 0x100) as usize, base + 0x100);
        assert_eq!(
            flash.translate(FLASH_ORIGIN + FLASH_TOTAL_SIZE - 1) as usize,
            base + FLASH_TOTAL_SIZE as usize - 1
        );
    }

    #[test]
    fn write32_read_back_little_endian() {
        let flash = EmulatedFlash::new();
        let addr = FLASH_ORIGIN + 8;
        unsafe { access::write32(&flash, addr, 0xA1B2_C3D4) };
        assert_eq!(unsafe { access::read32(&flash, addr) }, 0xA1B2_C3D4);
        // Little-endian byte image in the backing store
        assert_eq!(&flash.data()[8..12], &[0xD4, 0xC3, 0xB2, 0xA1]);
    }

    #[test]
    fn write8_leaves_neighbors_untouched() {
        let flash = EmulatedFlash::new();
        let addr = FLASH_ORIGIN + 100;
        unsafe { access::write8(&flash, addr, 0x5A) };
        assert_eq!(unsafe { access::read8(&flash, addr) }, 0x5A);
        assert_eq!(flash.data()[99], 0xFF);
        assert_eq!(flash.data()[101], 0xFF);
    }

    #[test]
    fn program_requires_unlock() {
        let mut flash = EmulatedFlash::new();
        assert_eq!(flash.program(FLASH_ORIGIN, &[0x00]), Err(Error::WriteLocked));
        flash.write_unlock().unwrap();
        flash.program(FLASH_ORIGIN, &[0x00]).unwrap();
        assert_eq!(flash.data()[0], 0x00);
    }

    #[test]
    fn lock_latch_reengages() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        flash.lock();
        assert_eq!(flash.program(FLASH_ORIGIN, &[0x00]), Err(Error::WriteLocked));
        assert_eq!(flash.erase_sector(0), Err(Error::WriteLocked));
    }

    #[test]
    fn protection_blocks_program_and_erase() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        flash.protect().unwrap();
        assert_eq!(
            flash.program(FLASH_ORIGIN + 0x4000, &[0x12]),
            Err(Error::SectorProtected)
        );
        assert_eq!(flash.erase_sector(5), Err(Error::SectorProtected));
    }

    #[test]
    fn program_only_clears_bits() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        let addr = FLASH_ORIGIN + 0x40;
        flash.program(addr, &[0xF0]).unwrap();
        flash.program(addr, &[0x0F]).unwrap();
        assert_eq!(flash.data()[0x40], 0x00);
    }

    #[test]
    fn erase_restores_only_the_target_sector() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        // One byte in sector 0, one in sector 1
        flash.program(FLASH_ORIGIN + 0x10, &[0x00]).unwrap();
        flash.program(FLASH_ORIGIN + 0x4010, &[0x00]).unwrap();
        flash.erase_sector(0).unwrap();
        assert_eq!(flash.data()[0x10], 0xFF);
        assert_eq!(flash.data()[0x4010], 0x00);
    }

    #[test]
    fn program_spanning_a_protected_sector_is_refused() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        flash.protected = SectorMask::SECTOR1;
        // Write straddling the sector 0 / sector 1 boundary at 0x08004000
        let result = flash.program(FLASH_ORIGIN + 0x3FFF, &[0x00, 0x00]);
        assert_eq!(result, Err(Error::SectorProtected));
        // Entirely within sector 0 is fine
        flash.program(FLASH_ORIGIN + 0x3FFE, &[0x00]).unwrap();
    }

    #[test]
    fn bounds_are_enforced() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        assert_eq!(
            flash.program(FLASH_ORIGIN + FLASH_TOTAL_SIZE - 2, &[0; 4]),
            Err(Error::AddressOutOfBounds)
        );
        assert_eq!(flash.program(FLASH_ORIGIN - 4, &[0]), Err(Error::AddressOutOfBounds));
        assert_eq!(flash.erase_sector(SECTOR_COUNT), Err(Error::InvalidSector));
    }

    #[test]
    fn load_image_rejects_oversized_images() {
        let mut flash = EmulatedFlash::new();
        let image = vec![0u8; FLASH_TOTAL_SIZE as usize + 1];
        assert_eq!(flash.load_image(&image), Err(Error::ImageTooLarge));
    }

    #[test]
    fn translation_follows_a_reloaded_base() {
        let mut flash = EmulatedFlash::new();
        flash.load_image(&[0xAB]).unwrap();
        // The backing allocation was replaced; translation must track the
        // new base, not a stale one
        assert_eq!(flash.translate(FLASH_ORIGIN) as *const u8, flash.data().as_ptr());
        assert_eq!(unsafe { access::read8(&flash, FLASH_ORIGIN) }, 0xAB);
    }

    #[test]
    fn load_image_resets_and_copies() {
        let mut flash = EmulatedFlash::new();
        flash.write_unlock().unwrap();
        flash.program(FLASH_ORIGIN + 0x8_0000, &[0x00]).unwrap();
        flash.load_image(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(&flash.data()[..3], &[0x01, 0x02, 0x03]);
        assert_eq!(flash.data()[3], 0xFF);
        assert_eq!(flash.data()[0x8_0000], 0xFF);
    }

    #[test]
    fn firmware_hash_matches_reference_digest() {
        let image: Vec<u8> = (0..1024u32).map(|i| (i % 251) as u8).collect();
        let flash = EmulatedFlash::with_image(&image).unwrap();
        let challenge = [0xAA; 16];

        let digest = unsafe { hash::firmware_hash(&flash, &challenge, &mut NoProgress) };

        let mut expected = Sha256::new();
        expected.update(challenge);
        expected.update(flash.data());
        assert_eq!(digest, <[u8; 32]>::from(expected.finalize()));
    }

    #[test]
    fn firmware_hash_without_challenge() {
        let flash = EmulatedFlash::new();
        let digest = unsafe { hash::firmware_hash(&flash, &[], &mut NoProgress) };
        let expected = Sha256::digest(flash.data());
        assert_eq!(digest, <[u8; 32]>::from(expected));
    }

    #[test]
    fn bootloader_hash_is_double_sha256_of_empty_region() {
        let flash = EmulatedFlash::new();
        let digest = unsafe { hash::bootloader_hash(&flash) };
        let expected = Sha256::digest(Sha256::digest(b""));
        assert_eq!(digest, <[u8; 32]>::from(expected));
    }

    #[test]
    fn hash_progress_is_monotonic_and_complete() {
        struct Recorder(Vec<(u32, u32)>);
        impl HashProgress for Recorder {
            fn progress(&mut self, current: u32, total: u32) {
                self.0.push((current, total));
            }
        }

        let flash = EmulatedFlash::new();
        let mut recorder = Recorder(Vec::new());
        unsafe { hash::firmware_hash(&flash, &[], &mut recorder) };

        let total_chunks = FIRMWARE.len / HASH_CHUNK_SIZE;
        assert_eq!(recorder.0.len() as u32, total_chunks);
        assert_eq!(recorder.0.last(), Some(&(total_chunks, total_chunks)));
        for (i, &(current, total)) in recorder.0.iter().enumerate() {
            assert_eq!(current, i as u32 + 1);
            assert_eq!(total, total_chunks);
        }
    }
}
