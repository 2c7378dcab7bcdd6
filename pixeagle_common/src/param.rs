//! `ParameterMetadata` and the config hot-reload tier classification.
//!
//! Grounded on the reload-tier discipline the teacher enforces in its
//! `validate_reload_scope` function: not every configuration change can be
//! applied in place, and the tier a parameter belongs to determines what the
//! `AppController` must do after a `set_parameter` call commits.

use serde::{Deserialize, Serialize};

/// Describes how a live config change to a given parameter must be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadTier {
    /// Takes effect on the next read, no restart needed.
    Immediate,
    /// Requires the active follower to be torn down and reconstructed.
    FollowerRestart,
    /// Requires the active tracker to be torn down and reconstructed.
    TrackerRestart,
    /// Requires the whole process to exit with [`crate::health::EXIT_RESTART_REQUESTED`].
    SystemRestart,
}

/// Static description of one configuration parameter, used by `ConfigStore`
/// for validation bounds, `search`, and the dashboard-facing schema export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterMetadata {
    pub section: String,
    pub key: String,
    pub doc: String,
    pub reload_tier: ReloadTier,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ParameterMetadata {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }

    /// Validates a numeric value against this parameter's declared bounds.
    pub fn in_bounds(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterMetadata {
        ParameterMetadata {
            section: "follower".into(),
            key: "kp".into(),
            doc: "proportional gain".into(),
            reload_tier: ReloadTier::Immediate,
            min: Some(0.0),
            max: Some(10.0),
        }
    }

    #[test]
    fn full_name_joins_section_and_key() {
        assert_eq!(sample().full_name(), "follower.kp");
    }

    #[test]
    fn in_bounds_rejects_outside_range() {
        let meta = sample();
        assert!(meta.in_bounds(5.0));
        assert!(!meta.in_bounds(-1.0));
        assert!(!meta.in_bounds(11.0));
    }
}
