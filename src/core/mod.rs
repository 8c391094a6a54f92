// Board description data model and layout constants
pub mod board;
pub mod constants;
pub mod profiles;
pub mod validation;

pub use board::{BoardError, BoardInfo, EepromData, Resource, ResourceType};
pub use constants::*;
pub use validation::{validate_board, ValidationMessage};
