// Binary layout of the board description image
//
// Byte layout:
// - 0:      params
// - 1:      model
// - 2:      day
// - 3:      month
// - 4-5:    year (big-endian)
// - 6:      pcb_ver
// - 7 + 3i: resource i as (type, i2c_address, bus_index)
//
// The resource list ends at the first entry whose type byte is 0.

pub mod decode;
pub mod encode;

pub use decode::{decode, decode_header};
pub use encode::{encode, encode_header};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("{count} resources exceed image capacity of {max} entries")]
    CapacityExceeded { count: usize, max: usize },

    #[error("Resource {index} uses the reserved terminator type code 0")]
    ReservedType { index: usize },

    #[error("Image too short: {len} bytes, header needs {needed}")]
    Truncated { len: usize, needed: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
