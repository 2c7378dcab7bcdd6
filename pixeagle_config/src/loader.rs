//! TOML configuration loading with a defaults-then-overrides merge.
//!
//! Mirrors the teacher's `load_config`/`load_config_from_strings` split
//! (a real-file entrypoint and a string entrypoint used by tests), generalized
//! from three separate config files (cu/machine/io) to a single layered tree:
//! compiled-in defaults merged under an on-disk override file, then validated
//! as one unit.

use std::path::Path;

use crate::error::ConfigError;
use crate::sections::PixEagleConfig;

/// Load configuration from an override TOML file on disk, merged over
/// compiled-in defaults.
pub fn load_config(override_path: &Path) -> Result<PixEagleConfig, ConfigError> {
    let toml_str = std::fs::read_to_string(override_path).map_err(|e| {
        ConfigError::IoError(format!("failed to read {}: {e}", override_path.display()))
    })?;
    load_config_from_str(&toml_str)
}

/// Load configuration from a TOML string, merged over compiled-in defaults.
/// Used directly by tests and by [`load_config`].
pub fn load_config_from_str(toml_str: &str) -> Result<PixEagleConfig, ConfigError> {
    let config: PixEagleConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_falls_back_to_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, PixEagleConfig::default());
    }

    #[test]
    fn partial_override_only_changes_named_keys() {
        let config = load_config_from_str(
            r#"
[follower]
kp = 1.5
"#,
        )
        .unwrap();
        assert_eq!(config.follower.kp, 1.5);
        assert_eq!(config.follower.ki, PixEagleConfig::default().follower.ki);
    }

    #[test]
    fn invalid_value_fails_validation() {
        let err = load_config_from_str(
            r#"
[tracker]
drift_confidence_threshold = 2.0
"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = load_config_from_str("not valid toml @@@");
        assert!(matches!(err, Err(ConfigError::ParseError(_))));
    }
}
