//! Error types for fwflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Address/size errors
    /// Address is outside the flash device
    AddressOutOfBounds,
    /// Operation requires an aligned address or size
    InvalidAlignment,
    /// Sector index does not exist on this device
    InvalidSector,
    /// Image is larger than the flash device
    ImageTooLarge,

    // Protection errors
    /// Flash is locked; write-unlock has not been performed
    WriteLocked,
    /// Target sector is write protected
    SectorProtected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::InvalidAlignment => write!(f, "invalid alignment"),
            Self::InvalidSector => write!(f, "invalid sector index"),
            Self::ImageTooLarge => write!(f, "image larger than flash device"),
            Self::WriteLocked => write!(f, "flash is locked for writing"),
            Self::SectorProtected => write!(f, "sector is write protected"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
