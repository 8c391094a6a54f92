// Shared handle for callers that need the EEPROM from several tasks

use super::{BoardEeprom, DeviceResult, ProgramOptions, ProgramReport};
use crate::core::EepromData;
use embedded_hal::i2c::I2c;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle that serializes all access to one device.
///
/// The bus has no arbitration of its own, so every operation holds the lock
/// for its full duration, settle delays included.
pub struct SharedBoardEeprom<I> {
    inner: Arc<Mutex<BoardEeprom<I>>>,
}

impl<I> Clone for SharedBoardEeprom<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: I2c> SharedBoardEeprom<I> {
    pub fn new(eeprom: BoardEeprom<I>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(eeprom)),
        }
    }

    pub async fn read_board(&self) -> DeviceResult<EepromData> {
        self.inner.lock().await.read_board().await
    }

    pub async fn write_board(&self, data: &EepromData) -> DeviceResult<usize> {
        self.inner.lock().await.write_board(data).await
    }

    pub async fn program_board(
        &self,
        data: &EepromData,
        options: ProgramOptions,
    ) -> DeviceResult<ProgramReport> {
        self.inner.lock().await.program_board(data, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusConfig, EepromBus, MockI2c, MockOp};
    use crate::core::profiles::adlioiptx;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_writers_do_not_interleave() {
        let mock = MockI2c::new(0x56, 250);
        let bus = EepromBus::new(mock.clone(), BusConfig::default()).unwrap();
        let shared = SharedBoardEeprom::new(BoardEeprom::new(bus));

        let mut other = adlioiptx();
        other.info.model = 2;

        let a = {
            let shared = shared.clone();
            tokio::spawn(async move { shared.write_board(&adlioiptx()).await })
        };
        let b = {
            let shared = shared.clone();
            tokio::spawn(async move { shared.write_board(&other).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // each write is one contiguous run of registers 0..34
        let registers: Vec<u8> = mock
            .log()
            .into_iter()
            .filter_map(|op| match op {
                MockOp::Write(bytes) => bytes.first().copied(),
                MockOp::Read(_) => None,
            })
            .collect();
        let expected: Vec<u8> = (0..34).chain(0..34).collect();
        assert_eq!(registers, expected);
    }
}
