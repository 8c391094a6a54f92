// Timed byte-addressed access to the board EEPROM over I2C
// Wraps any embedded-hal I2c implementation with the settle timing the part needs

use crate::core::{DEFAULT_BUS_PATH, DEFAULT_DEVICE_ADDRESS, DEFAULT_SETTLE_DELAY, IMAGE_CAPACITY};
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BusError {
    #[error("Failed to open I2C bus {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Write to register 0x{register:02X} failed: {kind} ({detail})")]
    Write {
        register: u8,
        kind: ErrorKind,
        detail: String,
    },

    #[error("Read of {len} bytes at register 0x{register:02X} failed: {kind} ({detail})")]
    Read {
        register: u8,
        len: usize,
        kind: ErrorKind,
        detail: String,
    },

    #[error("Access of {len} bytes at register 0x{register:02X} exceeds device capacity of {capacity}")]
    OutOfRange {
        register: u8,
        len: usize,
        capacity: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BusError>;

/// How often a failed transaction is attempted before giving up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per transaction; 1 means no retry
    pub attempts: u32,

    /// Wait before retry n is `backoff * n`
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        attempts: 1,
        backoff: Duration::ZERO,
    };

    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Bus and device configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BusConfig {
    /// i2c-dev node, used by the Linux backend
    pub bus_path: String,

    /// 7-bit device address
    pub address: u8,

    /// Pause after every physical transaction
    pub settle_delay: Duration,

    /// Addressable bytes on the device
    pub capacity: usize,

    pub retry: RetryPolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus_path: DEFAULT_BUS_PATH.to_string(),
            address: DEFAULT_DEVICE_ADDRESS,
            settle_delay: DEFAULT_SETTLE_DELAY,
            capacity: IMAGE_CAPACITY,
            retry: RetryPolicy::NONE,
        }
    }
}

pub const ENV_BUS: &str = "BOARD_EEPROM_BUS";
pub const ENV_ADDRESS: &str = "BOARD_EEPROM_ADDRESS";
pub const ENV_SETTLE_MS: &str = "BOARD_EEPROM_SETTLE_MS";

impl BusConfig {
    pub fn new(bus_path: impl Into<String>, address: u8) -> Self {
        Self {
            bus_path: bus_path.into(),
            address,
            ..Default::default()
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Defaults overlaid with `BOARD_EEPROM_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_BUS) {
            config.bus_path = path;
        }
        if let Some(raw) = lookup(ENV_ADDRESS) {
            config.address = parse_address(&raw)?;
        }
        if let Some(raw) = lookup(ENV_SETTLE_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                BusError::InvalidConfig(format!("{} must be milliseconds, got {:?}", ENV_SETTLE_MS, raw))
            })?;
            config.settle_delay = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.address > 0x7F {
            return Err(BusError::InvalidConfig(format!(
                "device address 0x{:02X} is not a 7-bit address",
                self.address
            )));
        }
        if self.settle_delay.is_zero() {
            return Err(BusError::InvalidConfig(
                "settle delay must be non-zero; the part needs time to commit each write".to_string(),
            ));
        }
        if self.capacity == 0 || self.capacity > 256 {
            return Err(BusError::InvalidConfig(format!(
                "capacity {} is not addressable with an 8-bit register",
                self.capacity
            )));
        }
        Ok(())
    }
}

/// Parse a device address written as decimal or 0x-prefixed hex
pub fn parse_address(raw: &str) -> Result<u8> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    let address =
        parsed.map_err(|_| BusError::InvalidConfig(format!("invalid device address {:?}", raw)))?;
    if address > 0x7F {
        return Err(BusError::InvalidConfig(format!(
            "device address 0x{:02X} is not a 7-bit address",
            address
        )));
    }
    Ok(address)
}

/// Register-addressed EEPROM on an I2C bus.
///
/// Every physical transaction is followed by `settle_delay`. Writes are sent
/// one data byte per transaction; the part does not accept page writes in
/// this configuration.
pub struct EepromBus<I> {
    i2c: I,
    config: BusConfig,
}

impl<I: I2c> EepromBus<I> {
    pub fn new(i2c: I, config: BusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { i2c, config })
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    fn check_range(&self, register: u8, len: usize) -> Result<()> {
        if register as usize + len > self.config.capacity {
            return Err(BusError::OutOfRange {
                register,
                len,
                capacity: self.config.capacity,
            });
        }
        Ok(())
    }

    /// Write `bytes` starting at `register`, one byte per transaction.
    ///
    /// The first failing transaction aborts the write; bytes before it are
    /// already committed to the device.
    pub async fn write(&mut self, register: u8, bytes: &[u8]) -> Result<()> {
        self.check_range(register, bytes.len())?;
        tracing::debug!(
            "Writing {} bytes at register 0x{:02X} on device 0x{:02X}: {:02X?}",
            bytes.len(),
            register,
            self.config.address,
            bytes
        );

        for (i, &byte) in bytes.iter().enumerate() {
            let reg = register + i as u8;
            self.write_byte(reg, byte).await?;
        }

        Ok(())
    }

    /// Write one byte and wait out the write cycle
    pub async fn write_byte(&mut self, register: u8, byte: u8) -> Result<()> {
        self.check_range(register, 1)?;
        let address = self.config.address;
        let mut attempt = 1;

        loop {
            match self.i2c.write(address, &[register, byte]) {
                Ok(()) => {
                    tokio::time::sleep(self.config.settle_delay).await;
                    return Ok(());
                }
                Err(e) if attempt < self.config.retry.attempts => {
                    tracing::warn!(
                        "Write to register 0x{:02X} failed ({:?}), attempt {}/{}",
                        register,
                        e,
                        attempt,
                        self.config.retry.attempts
                    );
                    self.backoff(attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(BusError::Write {
                        register,
                        kind: e.kind(),
                        detail: format!("{:?}", e),
                    })
                }
            }
        }
    }

    /// Read `len` bytes starting at `register`.
    ///
    /// Sends the register address, waits the settle delay, then reads the
    /// whole range in one transaction.
    pub async fn read(&mut self, register: u8, len: usize) -> Result<Vec<u8>> {
        self.check_range(register, len)?;
        let address = self.config.address;
        tracing::debug!(
            "Reading {} bytes at register 0x{:02X} on device 0x{:02X}",
            len,
            register,
            address
        );

        let mut buf = vec![0u8; len];
        let mut attempt = 1;

        loop {
            let result = match self.i2c.write(address, &[register]) {
                Ok(()) => {
                    tokio::time::sleep(self.config.settle_delay).await;
                    self.i2c.read(address, &mut buf)
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => return Ok(buf),
                Err(e) if attempt < self.config.retry.attempts => {
                    tracing::warn!(
                        "Read at register 0x{:02X} failed ({:?}), attempt {}/{}",
                        register,
                        e,
                        attempt,
                        self.config.retry.attempts
                    );
                    self.backoff(attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(BusError::Read {
                        register,
                        len,
                        kind: e.kind(),
                        detail: format!("{:?}", e),
                    })
                }
            }
        }
    }

    async fn backoff(&self, attempt: u32) {
        let wait = self.config.settle_delay + self.config.retry.backoff * attempt;
        tokio::time::sleep(wait).await;
    }
}
