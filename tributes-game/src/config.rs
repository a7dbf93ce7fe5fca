//! Roster and presentation configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_COMMAND_PREFIX, DEFAULT_MAX_NAME_LEN, DEFAULT_MAX_TRIBUTES, DEFAULT_MIN_TRIBUTES,
    DEFAULT_TITLE, DEFAULT_TRIBUTES_PER_DISTRICT,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("max_tributes {max} is below min_tributes {min}")]
    CapacityBelowMinimum { min: usize, max: usize },
    #[error("default_title must not be blank")]
    BlankTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_max_tributes")]
    pub max_tributes: usize,
    #[serde(default = "GameConfig::default_min_tributes")]
    pub min_tributes: usize,
    #[serde(default = "GameConfig::default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "GameConfig::default_tributes_per_district")]
    pub tributes_per_district: usize,
    #[serde(default = "GameConfig::default_title")]
    pub default_title: String,
    #[serde(default = "GameConfig::default_command_prefix")]
    pub command_prefix: String,
}

impl GameConfig {
    const fn default_max_tributes() -> usize {
        DEFAULT_MAX_TRIBUTES
    }

    const fn default_min_tributes() -> usize {
        DEFAULT_MIN_TRIBUTES
    }

    const fn default_max_name_len() -> usize {
        DEFAULT_MAX_NAME_LEN
    }

    const fn default_tributes_per_district() -> usize {
        DEFAULT_TRIBUTES_PER_DISTRICT
    }

    fn default_title() -> String {
        DEFAULT_TITLE.to_string()
    }

    fn default_command_prefix() -> String {
        DEFAULT_COMMAND_PREFIX.to_string()
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min_violation = |field, min, value| ConfigError::MinViolation { field, min, value };
        if self.min_tributes < DEFAULT_MIN_TRIBUTES {
            return Err(min_violation(
                "min_tributes",
                DEFAULT_MIN_TRIBUTES,
                self.min_tributes,
            ));
        }
        if self.max_tributes < self.min_tributes {
            return Err(ConfigError::CapacityBelowMinimum {
                min: self.min_tributes,
                max: self.max_tributes,
            });
        }
        if self.max_name_len == 0 {
            return Err(min_violation("max_name_len", 1, 0));
        }
        if self.tributes_per_district == 0 {
            return Err(min_violation("tributes_per_district", 1, 0));
        }
        if self.default_title.trim().is_empty() {
            return Err(ConfigError::BlankTitle);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_tributes: Self::default_max_tributes(),
            min_tributes: Self::default_min_tributes(),
            max_name_len: Self::default_max_name_len(),
            tributes_per_district: Self::default_tributes_per_district(),
            default_title: Self::default_title(),
            command_prefix: Self::default_command_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_takes_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.max_tributes, 24);
        assert_eq!(config.max_name_len, 32);
        assert_eq!(config.default_title, "The Hunger Games");
    }

    #[test]
    fn validation_rejects_bad_bounds() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "min_tributes": 1 }"#),
            Err(ConfigError::MinViolation {
                field: "min_tributes",
                ..
            })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "min_tributes": 6, "max_tributes": 4 }"#),
            Err(ConfigError::CapacityBelowMinimum { min: 6, max: 4 })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "tributes_per_district": 0 }"#),
            Err(ConfigError::MinViolation { .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "default_title": "  " }"#),
            Err(ConfigError::BlankTitle)
        ));
    }
}
