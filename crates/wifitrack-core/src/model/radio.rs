// ── Radio state ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Power state of the wireless radio as reported by the platform.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RadioState {
    Disabling,
    Disabled,
    Enabling,
    Enabled,
    #[default]
    Unknown,
}

impl RadioState {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}
