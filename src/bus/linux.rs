// Linux i2c-dev backend

use super::comm::{BusConfig, BusError, EepromBus, Result};
use linux_embedded_hal::I2cdev;

/// Open the i2c-dev node named in `config` and wrap it
pub fn open(config: BusConfig) -> Result<EepromBus<I2cdev>> {
    config.validate()?;
    tracing::debug!(
        "Opening {} for device 0x{:02X}",
        config.bus_path,
        config.address
    );

    let i2c = I2cdev::new(&config.bus_path).map_err(|e| BusError::Open {
        path: config.bus_path.clone(),
        reason: e.to_string(),
    })?;

    EepromBus::new(i2c, config)
}
