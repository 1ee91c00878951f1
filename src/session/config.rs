use serde::{Deserialize, Serialize};

use crate::variant::VariantSettings;

/// Tuning for [`super::MatchSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Write attempts per accepted mutation before the failure is reported.
    pub save_attempts: u32,
    /// Targets used when resolving built-in variants.
    pub variants: VariantSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_attempts: 2,
            variants: VariantSettings::default(),
        }
    }
}
