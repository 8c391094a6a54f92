// Built-in board profiles

use super::board::{BoardInfo, EepromData, Resource, ResourceType};

/// ADL-IO-IPTX expansion board, PCB rev 1
pub const ADLIOIPTX_INFO: BoardInfo = BoardInfo {
    params: 14,
    model: 1,
    day: 25,
    month: 12,
    year: 2021,
    pcb_ver: 0x01,
};

pub const ADLIOIPTX_RESOURCES: [Resource; 9] = [
    Resource::on_bus(ResourceType::Relay, 0),
    Resource::on_bus(ResourceType::UartRs485, 1),
    Resource::on_bus(ResourceType::UartRs422, 2),
    Resource::on_bus(ResourceType::Motor, 1),
    Resource::on_bus(ResourceType::Motor, 2),
    Resource::on_bus(ResourceType::AnalogIn, 1),
    Resource::on_bus(ResourceType::AnalogIn, 2),
    Resource::on_bus(ResourceType::AnalogOut, 3),
    Resource::on_bus(ResourceType::AnalogOut, 4),
];

pub fn adlioiptx() -> EepromData {
    EepromData::new(ADLIOIPTX_INFO, ADLIOIPTX_RESOURCES.to_vec())
}

/// Look up a built-in profile by name (case-insensitive)
pub fn builtin(name: &str) -> Option<EepromData> {
    match name.to_ascii_uppercase().as_str() {
        "ADLIOIPTX" | "ADL-IO-IPTX" => Some(adlioiptx()),
        _ => None,
    }
}

/// Names accepted by [`builtin`]
pub const BUILTIN_NAMES: &[&str] = &["ADLIOIPTX"];
