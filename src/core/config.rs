//=========================================================================
// Configuration
//=========================================================================
//
// Tunables for the scene system and its window host, loadable from TOML.
//
// Example (scenes.toml):
//   max_frame_delta = 0.1
//   default_duration_ms = 800
//   default_easing = "easeOutQuart"
//   initial_quality = "medium"
//   window_title = "Portfolio"
//
// Missing keys take their defaults.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;
use crate::core::quality::QualityLevel;
use crate::core::scene::DEFAULT_MAX_FRAME_DELTA;
use crate::core::transition::{Easing, TransitionOptions};

//=== SceneSystemConfig ===================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSystemConfig {
    /// Ceiling for a single frame's delta, in seconds.
    pub max_frame_delta: f32,
    pub default_duration_ms: u64,
    /// Easing name such as `"easeInOutCubic"`; unknown names mean linear.
    pub default_easing: String,
    pub initial_quality: QualityLevel,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for SceneSystemConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            default_duration_ms: 1000,
            default_easing: "easeInOutCubic".to_string(),
            initial_quality: QualityLevel::High,
            window_title: "Portfolio".to_string(),
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl SceneSystemConfig {
    //--- Loading & Saving -------------------------------------------------

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        debug!("Loaded scene config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    //--- Validation -------------------------------------------------------

    /// Rejects values the system cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_frame_delta > 0.0 && self.max_frame_delta.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "max_frame_delta",
                reason: format!("must be a positive number of seconds, got {}", self.max_frame_delta),
            });
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid {
                field: "window_width/window_height",
                reason: format!("must be non-zero, got {}x{}", self.window_width, self.window_height),
            });
        }
        Ok(())
    }

    //--- Derived Values ---------------------------------------------------

    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    pub fn default_easing(&self) -> Easing {
        Easing::from_name(&self.default_easing)
    }

    /// Options used by transitions requested without explicit ones.
    pub fn transition_options(&self) -> TransitionOptions {
        TransitionOptions::new()
            .with_duration(self.default_duration())
            .with_easing(self.default_easing())
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transition::EasingFamily;

    #[test]
    fn missing_keys_take_defaults() {
        let config = SceneSystemConfig::from_toml_str("default_duration_ms = 250").unwrap();
        assert_eq!(config.default_duration(), Duration::from_millis(250));
        assert_eq!(config.max_frame_delta, DEFAULT_MAX_FRAME_DELTA);
        assert_eq!(config.initial_quality, QualityLevel::High);
    }

    #[test]
    fn parses_quality_and_easing() {
        let config = SceneSystemConfig::from_toml_str(
            r#"
            initial_quality = "medium"
            default_easing = "easeOutQuart"
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_quality, QualityLevel::Medium);
        assert_eq!(config.default_easing(), Easing::ease_out(EasingFamily::Quart));
    }

    #[test]
    fn default_options_use_in_out_cubic() {
        let options = SceneSystemConfig::default().transition_options();
        assert_eq!(options.duration, Duration::from_secs(1));
        assert_eq!(options.easing, Easing::ease_in_out(EasingFamily::Cubic));
        assert!(!options.interrupt);
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let config = SceneSystemConfig {
            window_title: "Gallery".into(),
            initial_quality: QualityLevel::Ultra,
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(SceneSystemConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SceneSystemConfig::from_toml_str("max_frame_delta = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_frame_delta", .. }));

        let err = SceneSystemConfig::from_toml_str("window_width = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SceneSystemConfig::from_toml_str("initial_quality = \"extreme\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneSystemConfig::load_from_file("/nonexistent/scenes.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
