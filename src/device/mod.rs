// Board EEPROM device operations
pub mod eeprom;
pub mod shared;

pub use eeprom::{BoardEeprom, ProgramOptions, ProgramReport};
pub use shared::SharedBoardEeprom;

use crate::bus::BusError;
use crate::codec::CodecError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DeviceError {
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Image error: {0}")]
    Codec(#[from] CodecError),

    #[error("Verify failed at offset {offset}: wrote 0x{expected:02X}, read back 0x{actual:02X}")]
    VerifyMismatch { offset: usize, expected: u8, actual: u8 },
}

pub type DeviceResult<T> = std::result::Result<T, DeviceError>;
