// JSON board profile files
//
// Example:
// {
//   "info": { "params": 14, "model": 1, "day": 25, "month": 12, "year": 2021, "pcb_ver": 1 },
//   "resources": [ { "type": "RELAY", "bus_index": 0 }, { "type": "MOTOR", "bus_index": 1 } ]
// }

use crate::core::EepromData;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;

/// Load a board description from a JSON profile
pub fn load_profile(path: impl AsRef<Path>) -> Result<EepromData> {
    let file = File::open(path)?;
    let data = serde_json::from_reader(BufReader::new(file))?;
    Ok(data)
}

/// Save a board description as pretty-printed JSON
pub fn save_profile(path: impl AsRef<Path>, data: &EepromData) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn to_json(data: &EepromData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}
