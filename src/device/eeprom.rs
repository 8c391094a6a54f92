// Board description EEPROM: codec bound to the I2C transport

use super::{DeviceError, DeviceResult};
use crate::bus::EepromBus;
use crate::codec::{decode, encode};
use crate::core::constants::{encoded_len, RESOURCE_TERMINATOR};
use crate::core::EepromData;
use crate::memmap::MemoryMap;
use embedded_hal::i2c::I2c;

/// Extra steps around a plain [`BoardEeprom::write_board`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramOptions {
    /// Write a terminator after the last entry so a longer list left over
    /// from a previous programming cannot resurface
    pub terminate: bool,

    /// Read the image back and compare it with what was written
    pub verify: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            terminate: true,
            verify: true,
        }
    }
}

/// What [`BoardEeprom::program_board`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramReport {
    /// Bytes written, terminator included
    pub bytes_written: usize,
    pub terminated: bool,
    pub verified: bool,
}

/// The board description EEPROM on an expansion board
pub struct BoardEeprom<I> {
    bus: EepromBus<I>,
}

impl<I: I2c> BoardEeprom<I> {
    pub fn new(bus: EepromBus<I>) -> Self {
        Self { bus }
    }

    /// Read the whole device image
    pub async fn read_image(&mut self) -> DeviceResult<MemoryMap> {
        let capacity = self.bus.capacity();
        let data = self.bus.read(0, capacity).await?;
        Ok(MemoryMap::new(data))
    }

    /// Read and decode the board description
    pub async fn read_board(&mut self) -> DeviceResult<EepromData> {
        let image = self.read_image().await?;
        let data = decode(image.as_bytes())?;
        tracing::info!(
            "Read board model {} with {} resources",
            data.info.model,
            data.resources.len()
        );
        Ok(data)
    }

    /// Encode `data` and write exactly its `7 + 3 * N` bytes from register 0.
    ///
    /// Not atomic: a bus error part way leaves the device holding a mix of
    /// old and new bytes. Lists that do not fit are rejected before any
    /// bus traffic.
    pub async fn write_board(&mut self, data: &EepromData) -> DeviceResult<usize> {
        let buf = encode(data)?;
        tracing::info!(
            "Writing board model {} with {} resources ({} bytes)",
            data.info.model,
            data.resources.len(),
            buf.len()
        );
        self.bus.write(0, &buf).await?;
        Ok(buf.len())
    }

    /// Write `data`, then optionally terminate the list and verify
    pub async fn program_board(
        &mut self,
        data: &EepromData,
        options: ProgramOptions,
    ) -> DeviceResult<ProgramReport> {
        let mut expected = encode(data)?;
        self.write_board(data).await?;

        let end = encoded_len(data.resources.len());
        let terminated = options.terminate && end < self.bus.capacity();
        if terminated {
            self.bus.write_byte(end as u8, RESOURCE_TERMINATOR).await?;
            expected.push(RESOURCE_TERMINATOR);
        }

        if options.verify {
            let image = self.read_image().await?;
            if let Some(offset) = image.first_mismatch(&expected) {
                let actual = image.as_bytes().get(offset).copied().unwrap_or_default();
                tracing::warn!(
                    "Verify failed at offset {}: wrote 0x{:02X}, read 0x{:02X}",
                    offset,
                    expected[offset],
                    actual
                );
                return Err(DeviceError::VerifyMismatch {
                    offset,
                    expected: expected[offset],
                    actual,
                });
            }
            tracing::info!("Verified {} bytes", expected.len());
        }

        Ok(ProgramReport {
            bytes_written: expected.len(),
            terminated,
            verified: options.verify,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusConfig, BusError, MockI2c, MockOp};
    use crate::codec::CodecError;
    use crate::core::profiles::adlioiptx;
    use crate::core::{Resource, ResourceType, MAX_RESOURCES};
    use std::time::Duration;
    use tokio::time::Instant;

    fn device(mock: &MockI2c) -> BoardEeprom<MockI2c> {
        let bus = EepromBus::new(mock.clone(), BusConfig::default()).unwrap();
        BoardEeprom::new(bus)
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_then_read_reference_board() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);

        let start = Instant::now();
        let written = dev.write_board(&adlioiptx()).await.unwrap();
        assert_eq!(written, 34);
        assert_eq!(start.elapsed(), Duration::from_millis(34 * 5));
        assert_eq!(mock.write_count(), 34);

        let data = dev.read_board().await.unwrap();
        assert_eq!(data, adlioiptx());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_addresses_each_byte() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);
        dev.write_board(&adlioiptx()).await.unwrap();

        let log = mock.log();
        assert_eq!(log[0], MockOp::Write(vec![0, 14]));
        assert_eq!(log[5], MockOp::Write(vec![5, 0xE5]));
        assert_eq!(log[33], MockOp::Write(vec![33, 4]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifth_write_failure_aborts() {
        let mock = MockI2c::new(0x56, 250);
        mock.fail_on_write(5);
        let mut dev = device(&mock);

        let err = dev.write_board(&adlioiptx()).await.unwrap_err();

        assert!(matches!(
            err,
            DeviceError::Bus(BusError::Write { register: 4, .. })
        ));
        assert_eq!(mock.write_count(), 5);
        assert_eq!(&mock.memory()[..6], &[14, 1, 25, 12, 0, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflow_rejected_without_bus_traffic() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);
        let mut data = adlioiptx();
        data.resources = vec![Resource::on_bus(ResourceType::Relay, 0); MAX_RESOURCES + 1];

        let err = dev.write_board(&data).await.unwrap_err();

        assert_eq!(
            err,
            DeviceError::Codec(CodecError::CapacityExceeded { count: 82, max: 81 })
        );
        assert!(mock.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_failure_returns_no_record() {
        let mock = MockI2c::new(0x56, 250);
        mock.fail_reads(true);
        let mut dev = device(&mock);

        let err = dev.read_board().await.unwrap_err();
        assert!(matches!(err, DeviceError::Bus(BusError::Read { len: 250, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tail_resurfaces_without_terminator() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);
        dev.write_board(&adlioiptx()).await.unwrap();

        let mut shorter = adlioiptx();
        shorter.resources.truncate(2);
        dev.write_board(&shorter).await.unwrap();

        let data = dev.read_board().await.unwrap();
        assert_eq!(data.resources.len(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_program_terminates_and_verifies() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);
        dev.write_board(&adlioiptx()).await.unwrap();

        let mut shorter = adlioiptx();
        shorter.resources.truncate(2);
        let report = dev
            .program_board(&shorter, ProgramOptions::default())
            .await
            .unwrap();

        assert_eq!(
            report,
            ProgramReport {
                bytes_written: 14,
                terminated: true,
                verified: true,
            }
        );
        assert_eq!(mock.memory()[13], 0);
        assert_eq!(dev.read_board().await.unwrap(), shorter);
    }

    #[tokio::test(start_paused = true)]
    async fn test_program_full_image_needs_no_terminator() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);
        let mut data = adlioiptx();
        data.resources = vec![Resource::on_bus(ResourceType::Motor, 1); MAX_RESOURCES];

        let report = dev
            .program_board(&data, ProgramOptions::default())
            .await
            .unwrap();

        assert!(!report.terminated);
        assert_eq!(report.bytes_written, 250);
        assert_eq!(dev.read_board().await.unwrap(), data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_detects_bad_cell() {
        let mock = MockI2c::new(0x56, 250);
        mock.corrupt_register(9);
        let mut dev = device(&mock);

        let err = dev
            .program_board(&adlioiptx(), ProgramOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DeviceError::VerifyMismatch {
                offset: 9,
                expected: 0,
                actual: 0xFF,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_program_without_extras() {
        let mock = MockI2c::new(0x56, 250);
        let mut dev = device(&mock);
        let options = ProgramOptions {
            terminate: false,
            verify: false,
        };

        let report = dev.program_board(&adlioiptx(), options).await.unwrap();

        assert_eq!(report.bytes_written, 34);
        assert!(!mock.log().contains(&MockOp::Read(250)));
        assert_eq!(mock.write_count(), 34);
    }
}
