// I2C transport for the board EEPROM
pub mod comm;
pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

pub use comm::{parse_address, BusConfig, BusError, EepromBus, RetryPolicy};
pub use mock::{MockI2c, MockOp};
