//! Flash layout table
//!
//! Address layout of the 1 MiB on-chip flash for the standalone firmware
//! image (no bootloader):
//!
//! ```text
//!    name    |          range          |  size   |     function
//! -----------+-------------------------+---------+------------------
//!  Sector  0 | 0x08000000 - 0x08003FFF |  16 KiB | firmware (vectors + code)
//!  Sector  1 | 0x08004000 - 0x08007FFF |  16 KiB | firmware
//!  Sector  2 | 0x08008000 - 0x0800BFFF |  16 KiB | firmware
//!  Sector  3 | 0x0800C000 - 0x0800FFFF |  16 KiB | firmware
//!  Sector  4 | 0x08010000 - 0x0801FFFF |  64 KiB | firmware
//!  Sector  5 | 0x08020000 - 0x0803FFFF | 128 KiB | firmware
//!  Sector  6 | 0x08040000 - 0x0805FFFF | 128 KiB | firmware
//!  Sector  7 | 0x08060000 - 0x0807FFFF | 128 KiB | firmware
//!  Sector  8 | 0x08080000 - 0x0809FFFF | 128 KiB | firmware
//!  Sector  9 | 0x080A0000 - 0x080BFFFF | 128 KiB | firmware
//!  Sector 10 | 0x080C0000 - 0x080DFFFF | 128 KiB | firmware
//!  Sector 11 | 0x080E0000 - 0x080FFFFF | 128 KiB | firmware
//! ```
//!
//! Everything in this module is a compile-time constant. The const
//! assertions at the bottom fail the build if the table is edited into an
//! inconsistent state, most importantly if the firmware region is ever
//! moved away from the flash origin again.

/// Base physical address of the flash device.
pub const FLASH_ORIGIN: u32 = 0x0800_0000;

/// Total flash capacity in bytes.
pub const FLASH_TOTAL_SIZE: u32 = 1024 * 1024;

/// A contiguous byte range within the flash address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashRange {
    /// Start address (inclusive)
    pub start: u32,
    /// Length in bytes
    pub len: u32,
}

impl FlashRange {
    /// Create a new range
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// End address (exclusive)
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Check if the range has zero length
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if an address is within this range
    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr < self.end()
    }

    /// Check if this range overlaps with another
    pub const fn overlaps(&self, other: &FlashRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// A run of equally sized sectors
///
/// The device has a non-uniform sector layout, so the full map is a list
/// of size/count runs rather than a single sector size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SectorRun {
    /// Size of each sector in this run, in bytes
    pub size: u32,
    /// Number of sectors in this run
    pub count: u32,
}

impl SectorRun {
    /// Create a new sector run
    pub const fn new(size: u32, count: u32) -> Self {
        Self { size, count }
    }

    /// Total bytes covered by this run
    pub const fn total_size(&self) -> u32 {
        self.size * self.count
    }
}

/// Physical sector map of the device: 4x16 KiB, 1x64 KiB, 7x128 KiB.
pub const SECTOR_MAP: [SectorRun; 3] = [
    SectorRun::new(16 * 1024, 4),
    SectorRun::new(64 * 1024, 1),
    SectorRun::new(128 * 1024, 7),
];

const fn sector_map_count() -> u8 {
    let mut count = 0;
    let mut i = 0;
    while i < SECTOR_MAP.len() {
        count += SECTOR_MAP[i].count;
        i += 1;
    }
    count as u8
}

const fn sector_map_bytes() -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < SECTOR_MAP.len() {
        total += SECTOR_MAP[i].total_size();
        i += 1;
    }
    total
}

/// Number of sectors on the device.
pub const SECTOR_COUNT: u8 = sector_map_count();

/// Size in bytes of the given sector.
///
/// Panics if `index` is not a valid sector number.
pub const fn sector_size(index: u8) -> u32 {
    assert!(index < SECTOR_COUNT, "sector index out of range");
    let mut remaining = index as u32;
    let mut i = 0;
    while i < SECTOR_MAP.len() {
        if remaining < SECTOR_MAP[i].count {
            return SECTOR_MAP[i].size;
        }
        remaining -= SECTOR_MAP[i].count;
        i += 1;
    }
    unreachable!()
}

/// Start address of the given sector.
///
/// Panics if `index` is not a valid sector number.
pub const fn sector_start(index: u8) -> u32 {
    assert!(index < SECTOR_COUNT, "sector index out of range");
    let mut addr = FLASH_ORIGIN;
    let mut sector = 0;
    while sector < index {
        addr += sector_size(sector);
        sector += 1;
    }
    addr
}

/// Address range of the given sector.
///
/// Panics if `index` is not a valid sector number.
pub const fn sector_range(index: u8) -> FlashRange {
    FlashRange::new(sector_start(index), sector_size(index))
}

/// Sector containing the given flash address, or `None` if the address
/// lies outside the device.
pub const fn sector_at(addr: u32) -> Option<u8> {
    if addr < FLASH_ORIGIN || addr >= FLASH_ORIGIN + FLASH_TOTAL_SIZE {
        return None;
    }
    let mut sector = 0;
    while sector < SECTOR_COUNT {
        if sector_range(sector).contains(addr) {
            return Some(sector);
        }
        sector += 1;
    }
    None
}

/// Firmware code region: the entire flash, starting at the origin.
pub const FIRMWARE: FlashRange = FlashRange::new(FLASH_ORIGIN, FLASH_TOTAL_SIZE);

/// Legacy bootloader region. Zero length, retained for symbol
/// compatibility only; the boot flow no longer uses it.
pub const LEGACY_BOOT: FlashRange = FlashRange::new(FLASH_ORIGIN, 0);

/// Legacy storage region. Zero length, retained for symbol compatibility.
pub const LEGACY_STORAGE: FlashRange = FlashRange::new(FLASH_ORIGIN, 0);

/// Legacy firmware header region. Zero length, retained for symbol
/// compatibility.
pub const LEGACY_FWHEADER: FlashRange = FlashRange::new(FIRMWARE.start, 0);

/// First sector of the firmware code region.
pub const CODE_SECTOR_FIRST: u8 = 0;
/// Last sector of the firmware code region (inclusive).
pub const CODE_SECTOR_LAST: u8 = 11;

/// First sector of the legacy boot region.
pub const BOOT_SECTOR_FIRST: u8 = 0;
/// Last sector of the legacy boot region.
pub const BOOT_SECTOR_LAST: u8 = 0;

/// First sector of the legacy storage region.
pub const STORAGE_SECTOR_FIRST: u8 = 0;
/// Last sector of the legacy storage region.
pub const STORAGE_SECTOR_LAST: u8 = 0;

// The firmware image is linked for the flash origin. Any other start
// address would reintroduce a bootloader offset scheme, so this is a
// build error, not something to detect at runtime.
const _: () = assert!(
    FIRMWARE.start == FLASH_ORIGIN,
    "firmware region must start at the flash origin (standalone image)"
);

const _: () = assert!(
    sector_map_bytes() == FLASH_TOTAL_SIZE,
    "sector map must cover the full flash capacity"
);

const _: () = assert!(
    FIRMWARE.end() <= FLASH_ORIGIN + FLASH_TOTAL_SIZE,
    "firmware region must lie within the flash device"
);

const _: () = assert!(
    sector_start(CODE_SECTOR_LAST) + sector_size(CODE_SECTOR_LAST)
        == FLASH_ORIGIN + FLASH_TOTAL_SIZE,
    "code sectors must extend to the end of the flash device"
);
