//! Volatile flash access primitives
//!
//! Thin wrappers around volatile loads and stores through a translated
//! flash address. Volatile access guarantees the compiler treats every
//! access as an observable side effect: nothing is cached, eliminated, or
//! reordered within the translation unit, which is required when the
//! pointer targets a memory-mapped flash controller.
//!
//! These primitives perform no call-time validation beyond
//! `debug_assert!` checks that vanish in release builds. Bounds and
//! permission enforcement is the caller's job, via the external
//! protect/unlock sequence; an out-of-range or locked-region access is a
//! hardware fault or silent corruption, not a recoverable error.

use core::ptr;

use crate::layout::{FLASH_ORIGIN, FLASH_TOTAL_SIZE};
use crate::translate::AddressTranslator;

#[inline]
fn in_bounds(addr: u32, len: u32) -> bool {
    addr >= FLASH_ORIGIN && addr - FLASH_ORIGIN <= FLASH_TOTAL_SIZE - len
}

/// Write a 32-bit word to a flash address.
///
/// # Safety
///
/// The caller must ensure that:
/// - `addr` is word aligned and within flash bounds
/// - the containing sector has been unlocked and erased
/// - the translator's backing memory is live for the duration of the call
#[inline]
pub unsafe fn write32<T: AddressTranslator + ?Sized>(xlat: &T, addr: u32, word: u32) {
    debug_assert!(addr & 3 == 0, "unaligned 32-bit flash write");
    debug_assert!(in_bounds(addr, 4));
    unsafe { ptr::write_volatile(xlat.translate(addr).cast::<u32>(), word) }
}

/// Write a single byte to a flash address.
///
/// # Safety
///
/// Same contract as [`write32`], without the alignment requirement.
#[inline]
pub unsafe fn write8<T: AddressTranslator + ?Sized>(xlat: &T, addr: u32, byte: u8) {
    debug_assert!(in_bounds(addr, 1));
    unsafe { ptr::write_volatile(xlat.translate(addr), byte) }
}

/// Read a 32-bit word from a flash address.
///
/// # Safety
///
/// `addr` must be word aligned and within flash bounds, and the
/// translator's backing memory must be live for the duration of the call.
#[inline]
pub unsafe fn read32<T: AddressTranslator + ?Sized>(xlat: &T, addr: u32) -> u32 {
    debug_assert!(addr & 3 == 0, "unaligned 32-bit flash read");
    debug_assert!(in_bounds(addr, 4));
    unsafe { ptr::read_volatile(xlat.translate(addr).cast::<u32>()) }
}

/// Read a single byte from a flash address.
///
/// # Safety
///
/// `addr` must be within flash bounds and the translator's backing
/// memory must be live for the duration of the call.
#[inline]
pub unsafe fn read8<T: AddressTranslator + ?Sized>(xlat: &T, addr: u32) -> u8 {
    debug_assert!(in_bounds(addr, 1));
    unsafe { ptr::read_volatile(xlat.translate(addr)) }
}
