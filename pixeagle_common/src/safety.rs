//! Shared safety-limit types, consumed by `pixeagle_safety` and every follower.

use serde::{Deserialize, Serialize};

/// Per-axis velocity bounds, matching `spec.md`'s `VelocityLimits`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityLimits {
    pub forward: f32,
    pub lateral: f32,
    pub vertical: f32,
    /// Bound on `‖(forward, lateral, vertical)‖`; exceeding it scales all
    /// three axes down uniformly rather than clipping any one independently.
    pub magnitude: f32,
}

/// Per-axis attitude-rate bounds, matching `spec.md`'s `RateLimits`. Stored
/// in rad/s internally; the config surface expresses these in deg/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimits {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Velocity, rate and altitude bounds enforced on every dispatched setpoint.
///
/// A `None` field means "no override for this follower", falling back to the
/// global limit; `SafetyManager` is the only place that resolves overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyLimits {
    pub velocity: VelocityLimits,
    pub rate: RateLimits,
    pub min_altitude_m: f32,
    pub max_altitude_m: f32,
    /// Band below `max_altitude_m` / above `min_altitude_m` that produces a
    /// warning instead of the configured violation action.
    pub altitude_warning_buffer_m: f32,
    pub altitude_enabled: bool,
    pub on_violation_action: SafetyAction,
}

impl SafetyLimits {
    pub const fn symmetric_clamp(value: f32, limit: f32) -> f32 {
        if value > limit {
            limit
        } else if value < -limit {
            -limit
        } else {
            value
        }
    }

    /// Clamp a 3-axis velocity to its per-axis limits, then scale the whole
    /// vector down uniformly if its norm still exceeds `magnitude`.
    pub fn clamp_velocity_3(&self, forward: f32, lateral: f32, vertical: f32) -> (f32, f32, f32) {
        let mut f = Self::symmetric_clamp(forward, self.velocity.forward);
        let mut l = Self::symmetric_clamp(lateral, self.velocity.lateral);
        let mut v = Self::symmetric_clamp(vertical, self.velocity.vertical);

        let norm = (f * f + l * l + v * v).sqrt();
        if norm > self.velocity.magnitude && norm > 0.0 {
            let scale = self.velocity.magnitude / norm;
            f *= scale;
            l *= scale;
            v *= scale;
        }
        (f, l, v)
    }
}

/// Action a follower/control loop must take in response to
/// `SafetyManager::check_safety`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyAction {
    None,
    Clamp,
    Halt,
    Rtl,
}
