use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::DispatchMode;
use crate::style::{Argb, StrokeStyle};
use crate::tracker::TOUCH_TOLERANCE;

/// Errors that can occur while loading or saving the engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything a [`crate::DrawingEngine`] is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old configs
pub struct EngineConfig {
    /// Raster fill colour; always treated as opaque
    pub background: Argb,
    pub stroke: StrokeStyle,
    /// Per-axis movement needed to extend a curve
    pub tolerance: f32,
    pub dispatch: DispatchMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            background: Argb::WHITE,
            stroke: StrokeStyle::default(),
            tolerance: TOUCH_TOLERANCE,
            dispatch: DispatchMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!("tolerance must be >= 0, got {}", self.tolerance)));
        }
        if !self.stroke.width.is_finite() || self.stroke.width <= 0.0 {
            return Err(ConfigError::Invalid(format!("stroke width must be > 0, got {}", self.stroke.width)));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.background, Argb::WHITE);
        assert_eq!(config.stroke.color, Argb::GREEN);
        assert_eq!(config.tolerance, 10.0);
        assert_eq!(config.dispatch, DispatchMode::SecondaryUpRestarts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "tolerance": 4.0 }"#).unwrap();
        assert_eq!(config.tolerance, 4.0);
        assert_eq!(config.stroke, StrokeStyle::default());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = EngineConfig {
            tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_positive_width_rejected() {
        for width in [0.0, -3.0, f32::NAN] {
            let config = EngineConfig {
                stroke: StrokeStyle::new(Argb::BLACK, width),
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "width {}", width);
        }
    }

    #[test]
    fn test_load_rejects_zero_width() {
        let path = std::env::temp_dir().join(format!("finger_paint_zero_width_{}.json", std::process::id()));
        fs::write(&path, r#"{ "stroke": { "width": 0.0 } }"#).unwrap();
        let result = EngineConfig::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("finger_paint_config_{}.json", std::process::id()));
        let config = EngineConfig {
            background: Argb(0xFF10_2030),
            stroke: StrokeStyle::new(Argb(0x8000_00FF), 7.5),
            tolerance: 3.0,
            dispatch: DispatchMode::SecondaryUpEnds,
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = EngineConfig::load("/definitely/not/here/finger_paint.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
