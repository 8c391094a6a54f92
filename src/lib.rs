// board-eeprom: read and program expansion board description EEPROMs
// Copyright 2024 - Licensed under GPLv3

pub mod bus;
pub mod codec;
pub mod core;
pub mod device;
pub mod formats;
pub mod memmap;

// Re-export commonly used types
pub use bus::{BusConfig, BusError, EepromBus, RetryPolicy};
pub use codec::{decode, encode, CodecError};
pub use self::core::{
    constants::*, profiles, validation, BoardInfo, EepromData, Resource, ResourceType,
};
pub use device::{BoardEeprom, DeviceError, ProgramOptions, ProgramReport, SharedBoardEeprom};
pub use formats::{load_profile, save_profile, ProfileError};
pub use memmap::MemoryMap;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
