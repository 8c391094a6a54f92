// Board profile file format
pub mod profile;

pub use profile::{load_profile, save_profile, to_json, ProfileError};
