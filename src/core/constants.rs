// Layout and bus constants for the board description EEPROM

use std::time::Duration;

/// Total size of the board description image in bytes
pub const IMAGE_CAPACITY: usize = 250;

/// Size of the fixed BoardInfo header
pub const HEADER_LEN: usize = 7;

/// Size of one resource entry (type, i2c address, bus index)
pub const RESOURCE_LEN: usize = 3;

/// Most resource entries that fit after the header: (250 - 7) / 3
pub const MAX_RESOURCES: usize = (IMAGE_CAPACITY - HEADER_LEN) / RESOURCE_LEN;

/// Hard stop for the decode scan, independent of the image size
pub const MAX_SCAN_ENTRIES: usize = 82;

/// Resource type code that terminates the list
pub const RESOURCE_TERMINATOR: u8 = 0;

/// 7-bit bus address of the PCA9500 EEPROM
pub const DEFAULT_DEVICE_ADDRESS: u8 = 0x56;

/// Write-cycle / turnaround time required after every bus transaction
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(5);

/// Linux i2c-dev node the expansion header is wired to
pub const DEFAULT_BUS_PATH: &str = "/dev/i2c-5";

/// Header field offsets
pub mod offset {
    pub const PARAMS: usize = 0;
    pub const MODEL: usize = 1;
    pub const DAY: usize = 2;
    pub const MONTH: usize = 3;
    pub const YEAR_HI: usize = 4;
    pub const YEAR_LO: usize = 5;
    pub const PCB_VER: usize = 6;
}

/// Byte offset of resource entry `index` inside the image
pub const fn resource_offset(index: usize) -> usize {
    HEADER_LEN + index * RESOURCE_LEN
}

/// Size of an encoded image holding `count` resources
pub const fn encoded_len(count: usize) -> usize {
    resource_offset(count)
}
