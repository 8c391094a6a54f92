// Raw EEPROM image as read from, or destined for, the device

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MemoryMapError {
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    #[error("Image of {len} bytes exceeds capacity of {capacity}")]
    TooLarge { len: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, MemoryMapError>;

/// Fixed-capacity byte image of the board EEPROM
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMap {
    data: Vec<u8>,
}

impl MemoryMap {
    /// Wrap bytes read from the device
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Place `prefix` at offset 0 of a zeroed image of `capacity` bytes
    pub fn zero_padded(prefix: &[u8], capacity: usize) -> Result<Self> {
        if prefix.len() > capacity {
            return Err(MemoryMapError::TooLarge {
                len: prefix.len(),
                capacity,
            });
        }
        let mut data = vec![0u8; capacity];
        data[..prefix.len()].copy_from_slice(prefix);
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get `length` bytes starting at `start`
    pub fn get(&self, start: usize, length: usize) -> Result<&[u8]> {
        let end = start
            .checked_add(length)
            .ok_or(MemoryMapError::IndexOutOfBounds(start))?;
        if end > self.data.len() {
            return Err(MemoryMapError::IndexOutOfBounds(end));
        }
        Ok(&self.data[start..end])
    }

    pub fn set_bytes(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        let end = pos
            .checked_add(bytes.len())
            .ok_or(MemoryMapError::IndexOutOfBounds(pos))?;
        if end > self.data.len() {
            return Err(MemoryMapError::IndexOutOfBounds(end));
        }
        self.data[pos..end].copy_from_slice(bytes);
        Ok(())
    }

    /// First offset at which this image differs from `expected`, comparing
    /// only the range `expected` covers
    pub fn first_mismatch(&self, expected: &[u8]) -> Option<usize> {
        expected
            .iter()
            .enumerate()
            .find(|(i, b)| self.data.get(*i) != Some(*b))
            .map(|(i, _)| i)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// hexdump -C style rendering of `start..end`
    pub fn printable(&self, start: Option<usize>, end: Option<usize>) -> String {
        let end = end.unwrap_or(self.data.len()).min(self.data.len());
        let start = start.unwrap_or(0).min(end);
        hexdump(&self.data[start..end], start)
    }
}

impl From<Vec<u8>> for MemoryMap {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for MemoryMap {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryMap({} bytes)", self.data.len())
    }
}

fn hexdump(data: &[u8], base: usize) -> String {
    let mut output = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", base + i * 16));

        for j in 0..16 {
            if j == 8 {
                output.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => output.push_str(&format!("{:02x} ", byte)),
                None => output.push_str("   "),
            }
        }

        output.push_str(" |");
        for byte in chunk {
            if byte.is_ascii_graphic() || *byte == b' ' {
                output.push(*byte as char);
            } else {
                output.push('.');
            }
        }
        output.push_str("|\n");
    }

    output
}
