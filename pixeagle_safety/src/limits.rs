//! Per-follower sparse limit overrides layered on the global `SafetyLimits`.

use std::collections::HashMap;

use pixeagle_common::safety::{RateLimits, SafetyAction, SafetyLimits, VelocityLimits};

/// Follower-specific overrides. Any `None` field falls back to the global
/// limit; this is the only place overrides are resolved, so no follower can
/// observe a different effective limit than `SafetyManager` enforces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimitOverride {
    pub forward: Option<f32>,
    pub lateral: Option<f32>,
    pub vertical: Option<f32>,
    pub magnitude: Option<f32>,
    pub yaw_rate: Option<f32>,
    pub pitch_rate: Option<f32>,
    pub roll_rate: Option<f32>,
    pub min_altitude_m: Option<f32>,
    pub max_altitude_m: Option<f32>,
}

#[derive(Debug, Default)]
pub struct OverrideTable {
    by_follower: HashMap<String, LimitOverride>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, follower: &str, over: LimitOverride) {
        self.by_follower.insert(follower.to_string(), over);
    }

    pub fn clear(&mut self, follower: &str) {
        self.by_follower.remove(follower);
    }

    /// Resolve effective limits for a follower: override fields win,
    /// everything else falls back to `global`.
    pub fn resolve(&self, follower: &str, global: &SafetyLimits) -> SafetyLimits {
        let Some(over) = self.by_follower.get(follower) else {
            return *global;
        };
        SafetyLimits {
            velocity: VelocityLimits {
                forward: over.forward.unwrap_or(global.velocity.forward),
                lateral: over.lateral.unwrap_or(global.velocity.lateral),
                vertical: over.vertical.unwrap_or(global.velocity.vertical),
                magnitude: over.magnitude.unwrap_or(global.velocity.magnitude),
            },
            rate: RateLimits {
                yaw: over.yaw_rate.unwrap_or(global.rate.yaw),
                pitch: over.pitch_rate.unwrap_or(global.rate.pitch),
                roll: over.roll_rate.unwrap_or(global.rate.roll),
            },
            min_altitude_m: over.min_altitude_m.unwrap_or(global.min_altitude_m),
            max_altitude_m: over.max_altitude_m.unwrap_or(global.max_altitude_m),
            altitude_warning_buffer_m: global.altitude_warning_buffer_m,
            altitude_enabled: global.altitude_enabled,
            on_violation_action: global.on_violation_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::safety::SafetyAction;

    fn global() -> SafetyLimits {
        SafetyLimits {
            velocity: VelocityLimits { forward: 10.0, lateral: 5.0, vertical: 3.0, magnitude: 20.0 },
            rate: RateLimits { yaw: 1.2, pitch: 1.2, roll: 1.2 },
            min_altitude_m: 2.0,
            max_altitude_m: 120.0,
            altitude_warning_buffer_m: 3.0,
            altitude_enabled: true,
            on_violation_action: SafetyAction::Halt,
        }
    }

    #[test]
    fn no_override_falls_back_entirely_to_global() {
        let table = OverrideTable::new();
        assert_eq!(table.resolve("velocity_chase", &global()), global());
    }

    #[test]
    fn override_replaces_only_set_fields() {
        let mut table = OverrideTable::new();
        table.set(
            "velocity_chase",
            LimitOverride {
                forward: Some(12.0),
                ..Default::default()
            },
        );
        let resolved = table.resolve("velocity_chase", &global());
        assert_eq!(resolved.velocity.forward, 12.0);
        assert_eq!(resolved.velocity.lateral, global().velocity.lateral);
    }

    #[test]
    fn clear_removes_override() {
        let mut table = OverrideTable::new();
        table.set(
            "gimbal_track",
            LimitOverride {
                yaw_rate: Some(0.5),
                ..Default::default()
            },
        );
        table.clear("gimbal_track");
        assert_eq!(table.resolve("gimbal_track", &global()), global());
    }
}
