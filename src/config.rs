//! Gameplay tuning
//!
//! Defaults reproduce the shipped balance. Hosts may load a partial JSON
//! override; anything missing falls back to the default value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Immutable gameplay tunables (per-frame units at ~60 Hz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Velocity set by a jump (negative = upward)
    pub jump_force: f32,
    /// Downward acceleration with no news effect active
    pub base_gravity: f32,
    /// Gravity reduction applied by positive news
    pub positive_gravity_effect: f32,
    /// Gravity increase applied by negative news
    pub negative_gravity_effect: f32,
    /// Frames a news gravity effect lasts
    pub effect_duration: u32,
    /// Scroll speed of the market line and news
    pub base_speed: f32,
    /// Upper bound for scroll speed (reserved, the speed is currently constant)
    pub max_speed: f32,
    /// Frames between news spawns while running
    pub news_interval: u32,
    /// Terrain hits allowed per run
    pub stop_loss: u8,
    /// Seconds counted down before a run starts
    pub countdown_seconds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            jump_force: -6.5,
            base_gravity: 0.3,
            positive_gravity_effect: 0.15,
            negative_gravity_effect: 0.45,
            effect_duration: 120,
            base_speed: 2.5,
            max_speed: 5.0,
            news_interval: 90,
            stop_loss: 3,
            countdown_seconds: 5,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("jump_force", self.jump_force),
            ("base_gravity", self.base_gravity),
            ("positive_gravity_effect", self.positive_gravity_effect),
            ("negative_gravity_effect", self.negative_gravity_effect),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite number",
                });
            }
        }

        if self.jump_force >= 0.0 {
            return Err(invalid("jump_force", "must be negative (upward)"));
        }
        if self.base_gravity < 0.0 {
            return Err(invalid("base_gravity", "must not be negative"));
        }
        if self.positive_gravity_effect < 0.0 {
            return Err(invalid("positive_gravity_effect", "must not be negative"));
        }
        if self.negative_gravity_effect < 0.0 {
            return Err(invalid("negative_gravity_effect", "must not be negative"));
        }
        if self.base_speed <= 0.0 {
            return Err(invalid("base_speed", "must be positive"));
        }
        if self.max_speed < self.base_speed {
            return Err(invalid("max_speed", "must be at least base_speed"));
        }
        if self.effect_duration == 0 {
            return Err(invalid("effect_duration", "must be at least one frame"));
        }
        if self.news_interval == 0 {
            return Err(invalid("news_interval", "must be at least one frame"));
        }
        if self.stop_loss == 0 {
            return Err(invalid("stop_loss", "must be at least one"));
        }
        if self.countdown_seconds == 0 {
            return Err(invalid("countdown_seconds", "must be at least one second"));
        }
        Ok(())
    }

    /// Gravity while a positive news effect is active
    pub fn bullish_gravity(&self) -> f32 {
        self.base_gravity - self.positive_gravity_effect
    }

    /// Gravity while a negative news effect is active
    pub fn bearish_gravity(&self) -> f32 {
        self.base_gravity + self.negative_gravity_effect
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json(r#"{ "news_interval": 45, "stop_loss": 5 }"#).unwrap();
        assert_eq!(config.news_interval, 45);
        assert_eq!(config.stop_loss, 5);
        assert_eq!(config.effect_duration, 120);
        assert!((config.base_gravity - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = GameConfig::from_json(r#"{ "base_speed": 6.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_speed",
                ..
            }
        ));

        let err = GameConfig::from_json(r#"{ "jump_force": 3.0 }"#).unwrap_err();
        assert!(err.to_string().contains("jump_force"));

        let err = GameConfig::from_json(r#"{ "stop_loss": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "stop_loss", .. }));
    }

    #[test]
    fn test_effect_gravities() {
        let config = GameConfig::default();
        assert!((config.bullish_gravity() - 0.15).abs() < 1e-6);
        assert!((config.bearish_gravity() - 0.75).abs() < 1e-6);
    }
}
