//! Settings Row
//!
//! A single row shared by the whole app, addressed by a fixed id.

use serde::{Deserialize, Serialize};

pub const SETTINGS_ID: &str = "1";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
}
