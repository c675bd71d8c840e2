//! Write protection control
//!
//! The flash controller keeps the device locked against program/erase
//! until an unlock sequence is performed, and additionally supports
//! per-sector write protection. Both knobs live behind a backend trait:
//! the register sequences on real hardware are owned by platform code
//! outside this crate, while the emulated backend models the same state
//! in memory.

use bitflags::bitflags;

use crate::error::Result;
use crate::layout::SECTOR_COUNT;

bitflags! {
    /// Per-sector write protection mask, one bit per sector
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectorMask: u16 {
        /// Sector 0 (16 KiB, vectors + code)
        const SECTOR0 = 1 << 0;
        /// Sector 1 (16 KiB)
        const SECTOR1 = 1 << 1;
        /// Sector 2 (16 KiB)
        const SECTOR2 = 1 << 2;
        /// Sector 3 (16 KiB)
        const SECTOR3 = 1 << 3;
        /// Sector 4 (64 KiB)
        const SECTOR4 = 1 << 4;
        /// Sector 5 (128 KiB)
        const SECTOR5 = 1 << 5;
        /// Sector 6 (128 KiB)
        const SECTOR6 = 1 << 6;
        /// Sector 7 (128 KiB)
        const SECTOR7 = 1 << 7;
        /// Sector 8 (128 KiB)
        const SECTOR8 = 1 << 8;
        /// Sector 9 (128 KiB)
        const SECTOR9 = 1 << 9;
        /// Sector 10 (128 KiB)
        const SECTOR10 = 1 << 10;
        /// Sector 11 (128 KiB)
        const SECTOR11 = 1 << 11;

        /// All code sectors (the entire device)
        const CODE = (1 << 12) - 1;
    }
}

impl SectorMask {
    /// Mask selecting a single sector, or `None` for an invalid index
    pub const fn single(index: u8) -> Option<SectorMask> {
        if index >= SECTOR_COUNT {
            return None;
        }
        SectorMask::from_bits(1 << index)
    }
}

impl Default for SectorMask {
    fn default() -> Self {
        SectorMask::empty()
    }
}

/// Flash protection backend (sync; program/erase sequences are
/// single-threaded with caller-enforced mutual exclusion)
pub trait ProtectionControl {
    /// Enable write protection on all code sectors.
    ///
    /// Called once at startup after self-checks pass. Idempotent.
    fn protect(&mut self) -> Result<()>;

    /// Unlock the device for program/erase operations.
    fn write_unlock(&mut self) -> Result<()>;
}
