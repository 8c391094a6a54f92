// Board description record stored in the expansion EEPROM

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Unknown resource type name: {0}")]
    UnknownResourceName(String),

    #[error("Resource type code 0 is reserved as the list terminator")]
    ReservedType,
}

/// Kind of peripheral attached to the board.
///
/// Codes outside the known set are kept as [`ResourceType::Unknown`] so that
/// images written by newer tools still round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ResourceTypeRepr", into = "ResourceTypeRepr")]
pub enum ResourceType {
    Relay,
    UartRs485,
    UartRs422,
    Motor,
    AnalogIn,
    AnalogOut,
    Unknown(u8),
}

impl ResourceType {
    /// All named kinds, in code order
    pub const KNOWN: [ResourceType; 6] = [
        ResourceType::Relay,
        ResourceType::UartRs485,
        ResourceType::UartRs422,
        ResourceType::Motor,
        ResourceType::AnalogIn,
        ResourceType::AnalogOut,
    ];

    /// Map a raw type byte. Returns None for the terminator.
    pub fn from_code(code: u8) -> Option<Self> {
        let kind = match code {
            0 => return None,
            1 => Self::Relay,
            2 => Self::UartRs485,
            3 => Self::UartRs422,
            4 => Self::Motor,
            5 => Self::AnalogIn,
            6 => Self::AnalogOut,
            other => Self::Unknown(other),
        };
        Some(kind)
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Relay => 1,
            Self::UartRs485 => 2,
            Self::UartRs422 => 3,
            Self::Motor => 4,
            Self::AnalogIn => 5,
            Self::AnalogOut => 6,
            Self::Unknown(code) => code,
        }
    }

    /// Name used in dumps and profile files; None for unknown codes
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Relay => Some("RELAY"),
            Self::UartRs485 => Some("UART_RS485"),
            Self::UartRs422 => Some("UART_RS422"),
            Self::Motor => Some("MOTOR"),
            Self::AnalogIn => Some("ANALOG_IN"),
            Self::AnalogOut => Some("ANALOG_OUT"),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN(0x{:02X})", self.code()),
        }
    }
}

impl FromStr for ResourceType {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.name() == Some(wanted.as_str()))
            .ok_or_else(|| BoardError::UnknownResourceName(s.to_string()))
    }
}

/// Serialized form: a name for known kinds, the raw code otherwise
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ResourceTypeRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<ResourceTypeRepr> for ResourceType {
    type Error = BoardError;

    fn try_from(repr: ResourceTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            ResourceTypeRepr::Code(code) => Self::from_code(code).ok_or(BoardError::ReservedType),
            ResourceTypeRepr::Name(name) => name.parse(),
        }
    }
}

impl From<ResourceType> for ResourceTypeRepr {
    fn from(kind: ResourceType) -> Self {
        match kind.name() {
            Some(name) => ResourceTypeRepr::Name(name.to_string()),
            None => ResourceTypeRepr::Code(kind.code()),
        }
    }
}

/// Fixed 7-byte board header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardInfo {
    /// Opaque parameter / layout version byte
    pub params: u8,

    /// Board model identifier
    pub model: u8,

    /// Build date; not validated
    pub day: u8,
    pub month: u8,
    pub year: u16,

    /// PCB revision
    pub pcb_ver: u8,
}

/// One peripheral attached to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceType,

    /// Sub-address on its bus, 0 when not applicable
    #[serde(default)]
    pub i2c_address: u8,

    /// Physical bus / channel index
    #[serde(default)]
    pub bus_index: u8,
}

impl Resource {
    pub const fn new(kind: ResourceType, i2c_address: u8, bus_index: u8) -> Self {
        Self {
            kind,
            i2c_address,
            bus_index,
        }
    }

    /// Resource without a bus sub-address
    pub const fn on_bus(kind: ResourceType, bus_index: u8) -> Self {
        Self::new(kind, 0, bus_index)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} addr=0x{:02X} bus={}",
            self.kind.to_string(),
            self.i2c_address,
            self.bus_index
        )
    }
}

/// Complete board description: header plus resources in storage order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EepromData {
    pub info: BoardInfo,

    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl EepromData {
    pub fn new(info: BoardInfo, resources: Vec<Resource>) -> Self {
        Self { info, resources }
    }

    /// Resources of a given kind, in storage order
    pub fn resources_of(&self, kind: ResourceType) -> impl Iterator<Item = &Resource> + '_ {
        self.resources.iter().filter(move |r| r.kind == kind)
    }
}

impl fmt::Display for EepromData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.info;
        writeln!(f, "Board model {} (params {})", info.model, info.params)?;
        writeln!(
            f,
            "  Built:    {:04}-{:02}-{:02}",
            info.year, info.month, info.day
        )?;
        writeln!(f, "  PCB rev:  {}", info.pcb_ver)?;
        writeln!(f, "  Resources ({}):", self.resources.len())?;
        for (i, res) in self.resources.iter().enumerate() {
            writeln!(f, "    [{:2}] {}", i, res)?;
        }
        Ok(())
    }
}
