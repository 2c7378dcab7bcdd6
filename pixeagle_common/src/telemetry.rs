//! Telemetry snapshot shared by `pixeagle_bridge` (producer) and every
//! follower (consumer), so the two crates agree on one shape without either
//! depending on the other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub altitude_m: f32,
    pub airspeed_m_s: f32,
    pub groundspeed_m_s: f32,
    pub heading_rad: f32,
    pub vertical_speed_m_s: f32,
    pub roll_rad: f32,
    pub pitch_rad: f32,
    pub yaw_rad: f32,
    pub armed: bool,
    /// Set by `AutopilotBridge` once the cache entry is older than
    /// `stale_after_ms`. Followers must refuse to enter offboard while set.
    pub is_stale: bool,
}
