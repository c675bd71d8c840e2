//! fwflash-core - Flash layout table and access primitives
//!
//! This crate defines the compile-time flash layout of the standalone
//! firmware image (sector map, region constants, build-time invariants)
//! together with the low-level volatile access primitives the rest of
//! the firmware builds on. It is `no_std` so the same code serves the
//! target and host-side tooling.
//!
//! # Features
//!
//! - `std` - Enable standard library support (serde derives, `std::error::Error`)
//!
//! # Example
//!
//! ```ignore
//! use fwflash_core::access;
//! use fwflash_core::layout::FIRMWARE;
//! use fwflash_core::translate::DirectMap;
//!
//! // On hardware: unlock, then program the first word of the image.
//! unsafe { access::write32(&DirectMap, FIRMWARE.start, 0x2002_0000) };
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod access;
pub mod error;
pub mod hash;
pub mod layout;
pub mod protect;
pub mod translate;

pub use error::{Error, Result};
