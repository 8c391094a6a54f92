// Byte image -> board description

use super::{CodecError, Result};
use crate::core::constants::{offset, resource_offset, HEADER_LEN, MAX_SCAN_ENTRIES, RESOURCE_LEN};
use crate::core::{BoardInfo, EepromData, Resource, ResourceType};

/// Parse the 7-byte header from the start of `buf`
pub fn decode_header(buf: &[u8]) -> Result<BoardInfo> {
    if buf.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            len: buf.len(),
            needed: HEADER_LEN,
        });
    }

    Ok(BoardInfo {
        params: buf[offset::PARAMS],
        model: buf[offset::MODEL],
        day: buf[offset::DAY],
        month: buf[offset::MONTH],
        year: u16::from_be_bytes([buf[offset::YEAR_HI], buf[offset::YEAR_LO]]),
        pcb_ver: buf[offset::PCB_VER],
    })
}

/// Parse a device image.
///
/// Resources are scanned from offset 7 until a zero type byte, the end of
/// the image, or [`MAX_SCAN_ENTRIES`] entries, whichever comes first. A
/// trailing partial entry is ignored. Unrecognized type codes are returned
/// as [`ResourceType::Unknown`].
pub fn decode(buf: &[u8]) -> Result<EepromData> {
    let info = decode_header(buf)?;
    let mut resources = Vec::new();

    for i in 0..MAX_SCAN_ENTRIES {
        let off = resource_offset(i);
        let Some(entry) = buf.get(off..off + RESOURCE_LEN) else {
            break;
        };
        let Some(kind) = ResourceType::from_code(entry[0]) else {
            break;
        };
        resources.push(Resource::new(kind, entry[1], entry[2]));
    }

    Ok(EepromData { info, resources })
}
