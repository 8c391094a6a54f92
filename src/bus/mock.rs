// Mock I2C EEPROM for testing without hardware

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};
use std::sync::{Arc, Mutex};

/// One bus operation as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOp {
    Write(Vec<u8>),
    Read(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub ErrorKind);

impl embedded_hal::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Debug)]
struct MockState {
    memory: Vec<u8>,
    pointer: usize,
    log: Vec<MockOp>,
    writes: usize,
    fail_on_write: Option<usize>,
    fail_reads: bool,
    /// Register whose stored value gets bit-flipped on write
    corrupt_register: Option<u8>,
}

/// In-memory EEPROM answering on one 7-bit address.
///
/// A write operation's first byte sets the internal address pointer; any
/// further bytes are stored from there. Reads return bytes from the pointer.
/// Clones share state so a test can inspect the device after handing a copy
/// to the code under test.
#[derive(Debug, Clone)]
pub struct MockI2c {
    address: u8,
    state: Arc<Mutex<MockState>>,
}

impl MockI2c {
    pub fn new(address: u8, size: usize) -> Self {
        Self {
            address,
            state: Arc::new(Mutex::new(MockState {
                memory: vec![0u8; size],
                pointer: 0,
                log: Vec::new(),
                writes: 0,
                fail_on_write: None,
                fail_reads: false,
                corrupt_register: None,
            })),
        }
    }

    /// Preload device memory without logging
    pub fn load(&self, offset: usize, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.memory[offset..offset + data.len()].copy_from_slice(data);
    }

    pub fn memory(&self) -> Vec<u8> {
        self.state.lock().unwrap().memory.clone()
    }

    pub fn log(&self) -> Vec<MockOp> {
        self.state.lock().unwrap().log.clone()
    }

    /// Number of write operations attempted, failed ones included
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    /// Make the nth write operation (1-based, counted from now) fail once
    pub fn fail_on_write(&self, n: usize) {
        let mut state = self.state.lock().unwrap();
        state.fail_on_write = Some(state.writes + n);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Store the inverse of whatever gets written to `register`
    pub fn corrupt_register(&self, register: u8) {
        self.state.lock().unwrap().corrupt_register = Some(register);
    }
}

impl MockState {
    fn write(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        self.writes += 1;
        self.log.push(MockOp::Write(bytes.to_vec()));

        if self.fail_on_write == Some(self.writes) {
            self.fail_on_write = None;
            return Err(MockError(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)));
        }

        let Some((&register, data)) = bytes.split_first() else {
            return Ok(());
        };
        self.pointer = register as usize;
        for &byte in data {
            let stored = if self.corrupt_register == Some(self.pointer as u8) {
                !byte
            } else {
                byte
            };
            let slot = self
                .memory
                .get_mut(self.pointer)
                .ok_or(MockError(ErrorKind::Overrun))?;
            *slot = stored;
            self.pointer += 1;
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), MockError> {
        self.log.push(MockOp::Read(buf.len()));

        if self.fail_reads {
            return Err(MockError(ErrorKind::Bus));
        }

        for item in buf.iter_mut() {
            *item = *self
                .memory
                .get(self.pointer)
                .ok_or(MockError(ErrorKind::Overrun))?;
            self.pointer += 1;
        }
        Ok(())
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl I2c<SevenBitAddress> for MockI2c {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(MockError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        let mut state = self.state.lock().unwrap();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => state.write(bytes)?,
                Operation::Read(buf) => state.read(buf)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_semantics() {
        let mut mock = MockI2c::new(0x56, 16);
        mock.write(0x56, &[4, 0xAA, 0xBB]).unwrap();

        let mut buf = [0u8; 3];
        mock.write(0x56, &[3]).unwrap();
        mock.read(0x56, &mut buf).unwrap();
        assert_eq!(buf, [0, 0xAA, 0xBB]);

        assert_eq!(
            mock.log(),
            vec![
                MockOp::Write(vec![4, 0xAA, 0xBB]),
                MockOp::Write(vec![3]),
                MockOp::Read(3),
            ]
        );
    }

    #[test]
    fn test_fault_injection_is_one_shot() {
        let mut mock = MockI2c::new(0x56, 16);
        mock.fail_on_write(1);
        assert!(mock.write(0x56, &[0, 1]).is_err());
        assert!(mock.write(0x56, &[0, 1]).is_ok());
        assert_eq!(mock.write_count(), 2);
        assert_eq!(mock.memory()[0], 1);
    }

    #[test]
    fn test_wrong_address_nacks() {
        let mut mock = MockI2c::new(0x56, 16);
        let err = mock.write(0x50, &[0, 1]).unwrap_err();
        assert_eq!(
            err.0,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert!(mock.log().is_empty());
    }

    #[test]
    fn test_overrun() {
        let mut mock = MockI2c::new(0x56, 4);
        let mut buf = [0u8; 8];
        mock.write(0x56, &[0]).unwrap();
        assert!(mock.read(0x56, &mut buf).is_err());
    }
}
