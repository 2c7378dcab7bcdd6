//! Typed configuration sections, one struct per `[section]` table in the
//! TOML tree `ConfigStore` loads.
//!
//! Every section derives `Serialize`/`Deserialize` with `#[serde(default)]`
//! so that a user override file only needs to mention the keys it changes,
//! the same pattern the teacher uses for `CuAxisConfig`'s optional
//! peripheral fields.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSection {
    pub source_uri: String,
    pub stall_timeout_ms: u64,
    pub reopen_attempts: u32,
    pub reopen_backoff_ms: u64,
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            source_uri: "simulation://".to_string(),
            stall_timeout_ms: 2_000,
            reopen_attempts: 5,
            reopen_backoff_ms: 500,
        }
    }
}

impl VideoSection {
    pub fn validate(&self) -> Result<(), String> {
        if self.stall_timeout_ms == 0 {
            return Err("video.stall_timeout_ms must be > 0".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSection {
    pub backend: String,
    pub model: String,
    pub inference_timeout_ms: u64,
    pub skip_frame_on_timeout: bool,
}

impl Default for DetectorSection {
    fn default() -> Self {
        Self {
            backend: "simulation".to_string(),
            model: "default".to_string(),
            inference_timeout_ms: 80,
            skip_frame_on_timeout: true,
        }
    }
}

impl DetectorSection {
    pub fn validate(&self) -> Result<(), String> {
        if self.inference_timeout_ms == 0 {
            return Err("detector.inference_timeout_ms must be > 0".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSection {
    pub variant: String,
    pub track_history_len: usize,
    pub lost_timeout_ms: u64,
    pub drift_confidence_threshold: f32,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            variant: "classic".to_string(),
            track_history_len: 15,
            lost_timeout_ms: 1_000,
            drift_confidence_threshold: 0.4,
        }
    }
}

impl TrackerSection {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.drift_confidence_threshold) {
            return Err("tracker.drift_confidence_threshold must be in [0, 1]".into());
        }
        if self.track_history_len == 0 {
            return Err("tracker.track_history_len must be > 0".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerSection {
    /// One of: `velocity_baseline`, `velocity_chase`, `velocity_ground`,
    /// `velocity_distance`, `velocity_position`, `attitude_rate_mc`,
    /// `attitude_rate_fw`, `gimbal_pid_pursuit`, `gimbal_velocity_vector`.
    pub profile: String,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub tf: f64,
    pub tt: f64,
    pub smoothing_alpha: f32,
    pub oscillation_disable_after: u32,
    pub oscillation_window_s: f64,
    /// Action taken exactly once when a follower's target-loss timeout
    /// elapses: `hover`, `continue_velocity_timeout`, `rtl`, `orbit`, or
    /// `slow_forward`.
    pub target_loss_action: String,
    pub target_loss_slow_forward_mps: f32,

    /// Constant forward velocity, `velocity_baseline` (m/s).
    pub baseline_forward_velocity_mps: f32,
    /// `sideslip` (lateral velocity, zero yaw rate) or `coordinated_turn`
    /// (yaw rate, zero lateral), `velocity_baseline`.
    pub baseline_lateral_mode: String,

    /// Forward-velocity ramp acceleration, `velocity_chase` (m/s^2).
    pub chase_accel_mps2: f32,
    pub chase_max_velocity_mps: f32,
    /// Velocity past which lateral control auto-switches from sideslip to
    /// coordinated turn, `velocity_chase`.
    pub chase_mode_switch_velocity_mps: f32,
    pub chase_adaptive_vertical: bool,
    pub chase_pitch_compensation: bool,

    /// Floor the commanded descent may not cross, `velocity_ground` (m).
    pub ground_min_descent_height_m: f32,
    /// Altitude at which vertical gain scheduling is unity, `velocity_ground`.
    pub ground_gain_schedule_ref_altitude_m: f32,

    /// Desired standoff distance, `velocity_distance` (m).
    pub distance_standoff_m: f32,
    /// Apparent bbox height (px) observed at `distance_reference_distance_m`,
    /// used to estimate current distance from bbox size when no 3D estimate
    /// is available.
    pub distance_reference_bbox_height_px: f32,
    pub distance_reference_distance_m: f32,

    /// Base thrust the altitude-hold PID perturbs around, `attitude_rate_mc`
    /// (normalized `[0, 1]`).
    pub attitude_base_thrust: f32,

    /// L1 guidance look-ahead distance, `attitude_rate_fw` (m).
    pub fw_l1_distance_m: f32,
    pub fw_min_airspeed_mps: f32,
    pub fw_stall_margin_mps: f32,
    pub fw_stall_recovery_pitch_deg: f32,
    pub fw_stall_recovery_throttle: f32,
    /// TECS altitude/speed priority weight, `0..2`; `1.0` is balanced.
    pub fw_tecs_weight: f32,
    pub fw_orbit_radius_m: f32,

    /// `vertical` or `horizontal`, both gimbal followers.
    pub gimbal_mount_orientation: String,
    /// `positive` or `negative`.
    pub gimbal_roll_right_sign: String,
    pub gimbal_invert_forward: bool,
    pub gimbal_invert_lateral: bool,
    /// Analytic gain applied to the mount-transformed angle,
    /// `gimbal_velocity_vector`.
    pub gimbal_velocity_gain: f32,
}

impl Default for FollowerSection {
    fn default() -> Self {
        Self {
            profile: "velocity_baseline".to_string(),
            kp: 0.6,
            ki: 0.1,
            kd: 0.05,
            tf: 0.05,
            tt: 1.0,
            smoothing_alpha: 0.3,
            oscillation_disable_after: 4,
            oscillation_window_s: 3.0,
            target_loss_action: "hover".to_string(),
            target_loss_slow_forward_mps: 1.0,

            baseline_forward_velocity_mps: 2.0,
            baseline_lateral_mode: "sideslip".to_string(),

            chase_accel_mps2: 0.8,
            chase_max_velocity_mps: 6.0,
            chase_mode_switch_velocity_mps: 3.0,
            chase_adaptive_vertical: true,
            chase_pitch_compensation: false,

            ground_min_descent_height_m: 3.0,
            ground_gain_schedule_ref_altitude_m: 10.0,

            distance_standoff_m: 8.0,
            distance_reference_bbox_height_px: 100.0,
            distance_reference_distance_m: 8.0,

            attitude_base_thrust: 0.5,

            fw_l1_distance_m: 50.0,
            fw_min_airspeed_mps: 12.0,
            fw_stall_margin_mps: 1.0,
            fw_stall_recovery_pitch_deg: -10.0,
            fw_stall_recovery_throttle: 1.0,
            fw_tecs_weight: 1.0,
            fw_orbit_radius_m: 30.0,

            gimbal_mount_orientation: "horizontal".to_string(),
            gimbal_roll_right_sign: "positive".to_string(),
            gimbal_invert_forward: false,
            gimbal_invert_lateral: false,
            gimbal_velocity_gain: 0.05,
        }
    }
}

impl FollowerSection {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.smoothing_alpha) {
            return Err("follower.smoothing_alpha must be in [0, 1]".into());
        }
        if self.tf <= 0.0 || self.tt <= 0.0 {
            return Err("follower.tf and follower.tt must be > 0".into());
        }
        if !matches!(
            self.target_loss_action.as_str(),
            "hover" | "continue_velocity_timeout" | "rtl" | "orbit" | "slow_forward"
        ) {
            return Err("follower.target_loss_action must be one of hover/continue_velocity_timeout/rtl/orbit/slow_forward".into());
        }
        if !matches!(self.baseline_lateral_mode.as_str(), "sideslip" | "coordinated_turn") {
            return Err("follower.baseline_lateral_mode must be sideslip or coordinated_turn".into());
        }
        if self.chase_accel_mps2 <= 0.0 || self.chase_max_velocity_mps <= 0.0 {
            return Err("follower.chase_accel_mps2 and chase_max_velocity_mps must be > 0".into());
        }
        if self.distance_reference_bbox_height_px <= 0.0 || self.distance_reference_distance_m <= 0.0 {
            return Err("follower.distance_reference_bbox_height_px and distance_reference_distance_m must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.attitude_base_thrust) {
            return Err("follower.attitude_base_thrust must be in [0, 1]".into());
        }
        if !(0.0..=2.0).contains(&self.fw_tecs_weight) {
            return Err("follower.fw_tecs_weight must be in [0, 2]".into());
        }
        if self.fw_min_airspeed_mps <= 0.0 || self.fw_stall_margin_mps < 0.0 {
            return Err("follower.fw_min_airspeed_mps must be > 0 and fw_stall_margin_mps must be >= 0".into());
        }
        if !matches!(self.gimbal_mount_orientation.as_str(), "vertical" | "horizontal") {
            return Err("follower.gimbal_mount_orientation must be vertical or horizontal".into());
        }
        if !matches!(self.gimbal_roll_right_sign.as_str(), "positive" | "negative") {
            return Err("follower.gimbal_roll_right_sign must be positive or negative".into());
        }
        Ok(())
    }
}

/// Mirrors `spec.md`'s `SafetyLimits`: `VelocityLimits` (forward/lateral/
/// vertical/magnitude), `RateLimits` (yaw/pitch/roll, expressed here in
/// deg/s and converted to rad/s when built into `pixeagle_common::safety`),
/// and `AltitudeLimits`/`Behavior`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySection {
    pub max_forward_velocity: f32,
    pub max_lateral_velocity: f32,
    pub max_vertical_velocity: f32,
    pub max_velocity_magnitude: f32,
    pub max_yaw_rate_deg_s: f32,
    pub max_pitch_rate_deg_s: f32,
    pub max_roll_rate_deg_s: f32,
    pub min_altitude_m: f32,
    pub max_altitude_m: f32,
    pub altitude_warning_buffer_m: f32,
    pub altitude_limits_enabled: bool,
    /// One of `clamp`, `halt`, `rtl`; the action `check_safety` returns once
    /// an altitude breach passes the warning buffer.
    pub on_violation_action: String,
}

impl Default for SafetySection {
    fn default() -> Self {
        Self {
            max_forward_velocity: 8.0,
            max_lateral_velocity: 5.0,
            max_vertical_velocity: 3.0,
            max_velocity_magnitude: 10.0,
            max_yaw_rate_deg_s: 70.0,
            max_pitch_rate_deg_s: 70.0,
            max_roll_rate_deg_s: 70.0,
            min_altitude_m: 2.0,
            max_altitude_m: 120.0,
            altitude_warning_buffer_m: 3.0,
            altitude_limits_enabled: true,
            on_violation_action: "halt".to_string(),
        }
    }
}

impl SafetySection {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_altitude_m >= self.max_altitude_m {
            return Err("safety.min_altitude_m must be < safety.max_altitude_m".into());
        }
        if self.altitude_warning_buffer_m < 0.0 {
            return Err("safety.altitude_warning_buffer_m must be >= 0".into());
        }
        if self.max_forward_velocity <= 0.0 || self.max_lateral_velocity <= 0.0 || self.max_vertical_velocity <= 0.0 {
            return Err("safety velocity limits must be > 0".into());
        }
        if self.max_velocity_magnitude <= 0.0 {
            return Err("safety.max_velocity_magnitude must be > 0".into());
        }
        if !matches!(self.on_violation_action.as_str(), "clamp" | "halt" | "rtl") {
            return Err("safety.on_violation_action must be clamp, halt, or rtl".into());
        }
        Ok(())
    }

    pub fn violation_action(&self) -> pixeagle_common::safety::SafetyAction {
        match self.on_violation_action.as_str() {
            "clamp" => pixeagle_common::safety::SafetyAction::Clamp,
            "rtl" => pixeagle_common::safety::SafetyAction::Rtl,
            _ => pixeagle_common::safety::SafetyAction::Halt,
        }
    }

    pub fn to_safety_limits(&self) -> pixeagle_common::safety::SafetyLimits {
        pixeagle_common::safety::SafetyLimits {
            velocity: pixeagle_common::safety::VelocityLimits {
                forward: self.max_forward_velocity,
                lateral: self.max_lateral_velocity,
                vertical: self.max_vertical_velocity,
                magnitude: self.max_velocity_magnitude,
            },
            rate: pixeagle_common::safety::RateLimits {
                yaw: self.max_yaw_rate_deg_s.to_radians(),
                pitch: self.max_pitch_rate_deg_s.to_radians(),
                roll: self.max_roll_rate_deg_s.to_radians(),
            },
            min_altitude_m: self.min_altitude_m,
            max_altitude_m: self.max_altitude_m,
            altitude_warning_buffer_m: self.altitude_warning_buffer_m,
            altitude_enabled: self.altitude_limits_enabled,
            on_violation_action: self.violation_action(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    pub connection_string: String,
    pub stale_after_ms: u64,
    pub reconnect_initial_backoff_ms: u64,
    pub reconnect_max_backoff_ms: u64,
    /// AutopilotBridge drops a command stamped older than this rather than
    /// dispatch a setpoint computed against a frame the vehicle has long
    /// since moved past.
    pub cmd_max_age_ms: u64,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            connection_string: "simulation://".to_string(),
            stale_after_ms: 1_000,
            reconnect_initial_backoff_ms: 200,
            reconnect_max_backoff_ms: 10_000,
            cmd_max_age_ms: 250,
        }
    }
}

impl BridgeSection {
    pub fn validate(&self) -> Result<(), String> {
        if self.reconnect_initial_backoff_ms > self.reconnect_max_backoff_ms {
            return Err("bridge.reconnect_initial_backoff_ms must be <= max_backoff_ms".into());
        }
        if self.cmd_max_age_ms == 0 {
            return Err("bridge.cmd_max_age_ms must be > 0".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSection {
    pub control_rate_hz: f64,
    #[serde(default = "default_true")]
    pub backup_on_reload: bool,
    pub backup_ring_size: usize,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            control_rate_hz: 20.0,
            backup_on_reload: true,
            backup_ring_size: 16,
        }
    }
}

impl SystemSection {
    pub fn validate(&self) -> Result<(), String> {
        if self.control_rate_hz <= 0.0 {
            return Err("system.control_rate_hz must be > 0".into());
        }
        if self.backup_ring_size == 0 {
            return Err("system.backup_ring_size must be > 0".into());
        }
        Ok(())
    }
}

/// Top-level configuration tree, one field per section table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PixEagleConfig {
    pub video: VideoSection,
    pub detector: DetectorSection,
    pub tracker: TrackerSection,
    pub follower: FollowerSection,
    pub safety: SafetySection,
    pub bridge: BridgeSection,
    pub system: SystemSection,
}

impl PixEagleConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.video.validate()?;
        self.detector.validate()?;
        self.tracker.validate()?;
        self.follower.validate()?;
        self.safety.validate()?;
        self.bridge.validate()?;
        self.system.validate()?;
        Ok(())
    }
}
