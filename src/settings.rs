//! Tunable input settings with TOML persistence.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serializable knobs for the input core.
///
/// Everything here has a working default; a missing file or a partial one is
/// not an error condition for callers that use [`InputSettings::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Pass raw mouse sums through the smoothing filter before attenuation.
    pub mouse_smoothing: bool,
    /// Seed for the mouse sampling-rate estimate, in Hz.
    pub mouse_sample_rate: f32,
    /// Deadzone threshold applied to normalized gamepad axes.
    pub gamepad_deadzone: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        InputSettings {
            mouse_smoothing: false,
            mouse_sample_rate: 125.0,
            gamepad_deadzone: 0.05,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write settings file: {0}")]
    Write(#[source] io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl InputSettings {
    /// Loads settings from a TOML file. Unknown keys are ignored; missing
    /// keys fall back to their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path.as_ref()).map_err(SettingsError::Read)?;
        let settings: InputSettings = toml::from_str(&text)?;
        debug!(?settings, "loaded input settings");
        Ok(settings)
    }

    /// Writes the settings as TOML.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), text).map_err(SettingsError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = InputSettings::default();
        assert!(!settings.mouse_smoothing);
        assert_eq!(settings.mouse_sample_rate, 125.0);
        assert_eq!(settings.gamepad_deadzone, 0.05);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let settings: InputSettings = toml::from_str("mouse_smoothing = true").unwrap();
        assert!(settings.mouse_smoothing);
        assert_eq!(settings.mouse_sample_rate, 125.0);
    }

    #[test]
    fn toml_round_trip() {
        let settings = InputSettings {
            mouse_smoothing: true,
            mouse_sample_rate: 500.0,
            gamepad_deadzone: 0.1,
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: InputSettings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
