// Board description -> byte image

use super::{CodecError, Result};
use crate::core::constants::{
    encoded_len, offset, resource_offset, HEADER_LEN, MAX_RESOURCES,
    RESOURCE_TERMINATOR,
};
use crate::core::{BoardInfo, EepromData};

/// Serialize the 7-byte header
pub fn encode_header(info: &BoardInfo) -> [u8; HEADER_LEN] {
    let mut buf = [0u8; HEADER_LEN];
    let year = info.year.to_be_bytes();

    buf[offset::PARAMS] = info.params;
    buf[offset::MODEL] = info.model;
    buf[offset::DAY] = info.day;
    buf[offset::MONTH] = info.month;
    buf[offset::YEAR_HI] = year[0];
    buf[offset::YEAR_LO] = year[1];
    buf[offset::PCB_VER] = info.pcb_ver;
    buf
}

/// Serialize a record into exactly `7 + 3 * resources.len()` bytes.
///
/// No terminator is appended. Lists longer than [`MAX_RESOURCES`] are
/// rejected rather than truncated, as is any entry whose type code would
/// itself read back as the terminator.
pub fn encode(data: &EepromData) -> Result<Vec<u8>> {
    let count = data.resources.len();
    if count > MAX_RESOURCES {
        return Err(CodecError::CapacityExceeded {
            count,
            max: MAX_RESOURCES,
        });
    }

    let mut buf = vec![0u8; encoded_len(count)];
    buf[..HEADER_LEN].copy_from_slice(&encode_header(&data.info));

    for (i, res) in data.resources.iter().enumerate() {
        let code = res.kind.code();
        if code == RESOURCE_TERMINATOR {
            return Err(CodecError::ReservedType { index: i });
        }
        let off = resource_offset(i);
        buf[off] = code;
        buf[off + 1] = res.i2c_address;
        buf[off + 2] = res.bus_index;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profiles::{adlioiptx, ADLIOIPTX_INFO};
    use crate::core::{Resource, ResourceType};

    #[test]
    fn test_header_bytes() {
        let header = encode_header(&ADLIOIPTX_INFO);
        assert_eq!(header, [14, 1, 25, 12, 0x07, 0xE5, 1]);
    }

    #[test]
    fn test_year_is_big_endian() {
        let info = BoardInfo {
            year: 0x1234,
            ..Default::default()
        };
        let header = encode_header(&info);
        assert_eq!(&header[4..6], &[0x12, 0x34]);
    }

    #[test]
    fn test_reference_board_length() {
        let buf = encode(&adlioiptx()).unwrap();
        assert_eq!(buf.len(), 34);
        let types: Vec<u8> = buf[7..].chunks(3).map(|entry| entry[0]).collect();
        assert_eq!(types, vec![1, 2, 3, 4, 4, 5, 5, 6, 6]);
        assert_eq!(&buf[7..10], &[ResourceType::Relay.code(), 0, 0]);
        assert_eq!(&buf[31..34], &[ResourceType::AnalogOut.code(), 0, 4]);
    }

    #[test]
    fn test_resource_field_order() {
        let data = EepromData::new(
            BoardInfo::default(),
            vec![Resource::new(ResourceType::UartRs422, 0x20, 3)],
        );
        let buf = encode(&data).unwrap();
        assert_eq!(&buf[7..], &[ResourceType::UartRs422.code(), 0x20, 3]);
    }

    #[test]
    fn test_empty_list_is_header_only() {
        let data = EepromData::new(ADLIOIPTX_INFO, Vec::new());
        assert_eq!(encode(&data).unwrap().len(), HEADER_LEN);
    }

    #[test]
    fn test_terminator_code_rejected() {
        let data = EepromData::new(
            ADLIOIPTX_INFO,
            vec![
                Resource::on_bus(ResourceType::Relay, 0),
                Resource::on_bus(ResourceType::Unknown(0), 1),
            ],
        );
        assert_eq!(encode(&data), Err(CodecError::ReservedType { index: 1 }));
    }

    #[test]
    fn test_capacity_limit() {
        let res = Resource::on_bus(ResourceType::Relay, 0);

        let full = EepromData::new(ADLIOIPTX_INFO, vec![res; MAX_RESOURCES]);
        assert_eq!(encode(&full).unwrap().len(), 250);

        let over = EepromData::new(ADLIOIPTX_INFO, vec![res; MAX_RESOURCES + 1]);
        assert_eq!(
            encode(&over),
            Err(CodecError::CapacityExceeded { count: 82, max: 81 })
        );
    }
}
