//! `SafetyManager`: the single authority every follower output passes
//! through before it reaches `AutopilotBridge`.
//!
//! There is no code path that constructs a [`SetpointCommand`] and skips
//! `clamp` — `SafetyManager` takes `SafetyLimits` by value at construction,
//! not an `Option`, so there is no configuration state in which clamping
//! silently degrades to a no-op the way an unset `Option` might.

use std::time::Duration;

use pixeagle_common::safety::{RateLimits, SafetyAction, SafetyLimits, VelocityLimits};
use pixeagle_common::setpoint::SetpointCommand;

use crate::limits::{LimitOverride, OverrideTable};

/// Everything `check_safety` needs to decide on an action this tick.
#[derive(Debug, Clone, Copy)]
pub struct SafetyContext {
    pub altitude_m: f32,
    pub telemetry_stale: bool,
    pub target_lost_for: Option<Duration>,
}

/// How long a target may stay lost before `check_safety` escalates to RTL.
const TARGET_LOST_RTL_THRESHOLD: Duration = Duration::from_secs(10);

pub struct SafetyManager {
    global: SafetyLimits,
    overrides: OverrideTable,
    /// Edge-triggered: RTL is only returned once per lost-target episode.
    rtl_issued: bool,
    /// Edge-triggered: the altitude warning is logged once per excursion
    /// into the warning band, not every tick spent inside it.
    altitude_warning_issued: bool,
}

impl SafetyManager {
    pub fn new(global: SafetyLimits) -> Self {
        Self {
            global,
            overrides: OverrideTable::new(),
            rtl_issued: false,
            altitude_warning_issued: false,
        }
    }

    pub fn get_velocity_limits(&self, follower: &str) -> VelocityLimits {
        self.overrides.resolve(follower, &self.global).velocity
    }

    pub fn get_altitude_limits(&self, follower: &str) -> (f32, f32) {
        let limits = self.overrides.resolve(follower, &self.global);
        (limits.min_altitude_m, limits.max_altitude_m)
    }

    pub fn get_rate_limits(&self, follower: &str) -> RateLimits {
        self.overrides.resolve(follower, &self.global).rate
    }

    pub fn set_override(&mut self, follower: &str, over: LimitOverride) {
        self.overrides.set(follower, over);
    }

    pub fn clear_override(&mut self, follower: &str) {
        self.overrides.clear(follower);
    }

    /// Per-axis clamp to `(forward, lateral, down)`, then a uniform
    /// down-scale if the resulting 3-vector's norm still exceeds
    /// `VelocityLimits::magnitude`.
    pub fn clamp_velocity(&self, follower: &str, forward: f32, lateral: f32, down: f32) -> (f32, f32, f32) {
        let limits = self.overrides.resolve(follower, &self.global);
        limits.clamp_velocity_3(forward, lateral, down)
    }

    /// Symmetrically clamp every meaningful field of `cmd` to the resolved
    /// limits for `follower`. Fields outside `cmd.control_type`'s schema are
    /// already neutral (enforced by [`SetpointCommand::validate`]) and are
    /// left untouched.
    pub fn clamp(&self, follower: &str, mut cmd: SetpointCommand) -> SetpointCommand {
        let limits = self.overrides.resolve(follower, &self.global);
        let (vx, vy, vz) = limits.clamp_velocity_3(cmd.vx, cmd.vy, cmd.vz);
        cmd.vx = vx;
        cmd.vy = vy;
        cmd.vz = vz;
        cmd.roll_rate = SafetyLimits::symmetric_clamp(cmd.roll_rate, limits.rate.roll);
        cmd.pitch_rate = SafetyLimits::symmetric_clamp(cmd.pitch_rate, limits.rate.pitch);
        cmd.yaw_rate = SafetyLimits::symmetric_clamp(cmd.yaw_rate, limits.rate.yaw);
        cmd
    }

    /// Decide what the control loop must do this tick given `ctx`.
    ///
    /// Priority, highest first: stale telemetry always halts (no amount of
    /// clamping is meaningful without trustworthy state); an altitude
    /// breach past `min_altitude_m`/`max_altitude_m` triggers the
    /// configured `on_violation_action` (disabled entirely when
    /// `altitude_enabled` is false); a breach still inside the warning
    /// buffer only logs a warning and falls through to routine clamping; a
    /// target lost past the RTL threshold escalates once per episode;
    /// otherwise routine clamping is sufficient.
    pub fn check_safety(&mut self, follower: &str, ctx: SafetyContext) -> SafetyAction {
        let limits = self.overrides.resolve(follower, &self.global);

        if ctx.telemetry_stale {
            return SafetyAction::Halt;
        }

        if limits.altitude_enabled {
            let hard_breach = ctx.altitude_m < limits.min_altitude_m || ctx.altitude_m > limits.max_altitude_m;
            if hard_breach {
                self.altitude_warning_issued = false;
                return limits.on_violation_action;
            }

            let in_warning_band = ctx.altitude_m < limits.min_altitude_m + limits.altitude_warning_buffer_m
                || ctx.altitude_m > limits.max_altitude_m - limits.altitude_warning_buffer_m;
            if in_warning_band {
                if !self.altitude_warning_issued {
                    self.altitude_warning_issued = true;
                    tracing::warn!(follower, altitude_m = ctx.altitude_m, "altitude inside safety warning buffer");
                }
            } else {
                self.altitude_warning_issued = false;
            }
        }

        match ctx.target_lost_for {
            Some(lost) if lost >= TARGET_LOST_RTL_THRESHOLD => {
                if self.rtl_issued {
                    SafetyAction::None
                } else {
                    self.rtl_issued = true;
                    SafetyAction::Rtl
                }
            }
            Some(_) => SafetyAction::Clamp,
            None => {
                self.rtl_issued = false;
                SafetyAction::Clamp
            }
        }
    }

    /// Atomically replace the global limits, e.g. after a `ConfigStore`
    /// reload. Per-follower overrides are untouched.
    pub fn reload_config(&mut self, global: SafetyLimits) {
        self.global = global;
    }
}
