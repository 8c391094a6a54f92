// Pre-write checks on a board description

use super::board::EepromData;
use super::constants::MAX_RESOURCES;

/// Result of checking one aspect of a record
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationMessage {
    Warning(String),
    Error(String),
}

impl ValidationMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Warning(msg) | Self::Error(msg) => msg,
        }
    }
}

/// Check a record before it is written.
///
/// Only the resource count is an error; the date fields and type codes are
/// stored as-is, so anything odd about them is reported as a warning.
pub fn validate_board(data: &EepromData) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let info = &data.info;

    if data.resources.len() > MAX_RESOURCES {
        messages.push(ValidationMessage::Error(format!(
            "{} resources do not fit, at most {} are allowed",
            data.resources.len(),
            MAX_RESOURCES
        )));
    }

    if !(1..=31).contains(&info.day) {
        messages.push(ValidationMessage::Warning(format!(
            "Build day {} is outside 1-31",
            info.day
        )));
    }

    if !(1..=12).contains(&info.month) {
        messages.push(ValidationMessage::Warning(format!(
            "Build month {} is outside 1-12",
            info.month
        )));
    }

    for (i, res) in data.resources.iter().enumerate() {
        if !res.kind.is_known() {
            messages.push(ValidationMessage::Warning(format!(
                "Resource {} has unrecognized type code 0x{:02X}",
                i,
                res.kind.code()
            )));
        }
    }

    messages
}

pub fn has_errors(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(|m| m.is_error())
}

pub fn has_warnings(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(|m| m.is_warning())
}
