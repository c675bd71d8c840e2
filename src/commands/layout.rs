//! Layout command implementation

use fwflash_core::layout::{
    sector_range, CODE_SECTOR_FIRST, CODE_SECTOR_LAST, FIRMWARE, LEGACY_BOOT, LEGACY_FWHEADER,
    LEGACY_STORAGE, SECTOR_COUNT,
};

/// Print the sector table and region map
pub fn run_layout() {
    println!("   name    |          range          |  size   |     function");
    println!("-----------+-------------------------+---------+------------------");
    for index in 0..SECTOR_COUNT {
        let range = sector_range(index);
        let function = if index == 0 {
            "firmware (vectors + code)"
        } else {
            "firmware"
        };
        println!(
            " Sector {:2} | 0x{:08X} - 0x{:08X} | {:3} KiB | {}",
            index,
            range.start,
            range.end() - 1,
            range.len / 1024,
            function
        );
    }

    println!();
    println!(
        "firmware region: 0x{:08X} + 0x{:06X} bytes (sectors {}..={})",
        FIRMWARE.start, FIRMWARE.len, CODE_SECTOR_FIRST, CODE_SECTOR_LAST
    );
    println!(
        "legacy regions : boot 0x{:08X}+{}, storage 0x{:08X}+{}, fwheader 0x{:08X}+{}",
        LEGACY_BOOT.start,
        LEGACY_BOOT.len,
        LEGACY_STORAGE.start,
        LEGACY_STORAGE.len,
        LEGACY_FWHEADER.start,
        LEGACY_FWHEADER.len
    );
}
