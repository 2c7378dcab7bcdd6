//! `FollowerManager`: owns the active [`Follower`] and the [`SafetyManager`]
//! every command passes through, and implements the forwarding policy
//! (`Tracking`/`Drifting` forward, `Lost` triggers the one-shot
//! `on_target_loss` action then suppresses).

use std::time::{Duration, Instant};

use pixeagle_common::capability::TrackerCapability;
use pixeagle_common::safety::{SafetyAction, SafetyLimits};
use pixeagle_common::setpoint::SetpointCommand;
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::{TrackerOutput, TrackingState};
use pixeagle_config::sections::FollowerSection;
use pixeagle_safety::limits::LimitOverride;
use pixeagle_safety::manager::{SafetyContext, SafetyManager};

use crate::error::FollowerError;
use crate::follower::Follower;
use crate::setpoint_handler::SetpointHandler;

pub struct FollowerManager {
    active: Follower,
    safety: SafetyManager,
    lost_since: Option<Instant>,
}

impl FollowerManager {
    /// Construct the manager around the profile named by `cfg.profile` and
    /// the process-wide safety limits. Per v5 semantics `SafetyManager` is
    /// a hard dependency — there is no code path that constructs a
    /// `FollowerManager` without one.
    pub fn new(cfg: &FollowerSection, global_limits: SafetyLimits) -> Result<Self, FollowerError> {
        Ok(Self {
            active: Follower::from_section(cfg)?,
            safety: SafetyManager::new(global_limits),
            lost_since: None,
        })
    }

    pub fn active_profile_name(&self) -> &'static str {
        self.active.profile_name()
    }

    pub fn set_override(&mut self, follower: &str, over: LimitOverride) {
        self.safety.set_override(follower, over);
    }

    pub fn clear_override(&mut self, follower: &str) {
        self.safety.clear_override(follower);
    }

    pub fn reload_safety_limits(&mut self, global_limits: SafetyLimits) {
        self.safety.reload_config(global_limits);
    }

    pub fn check_safety(&mut self, ctx: SafetyContext) -> SafetyAction {
        self.safety.check_safety(self.active.profile_name(), ctx)
    }

    /// Switch to a new follower profile. The new instance is fully
    /// constructed and validated against `tracker_capabilities` before it
    /// replaces the active one, the same scoped-acquisition discipline
    /// `Detector::switch_model` uses — a rejected switch leaves the active
    /// follower untouched and still dispatching.
    pub fn switch(&mut self, cfg: &FollowerSection, tracker_capabilities: TrackerCapability) -> Result<(), FollowerError> {
        let candidate = Follower::from_section(cfg)?;
        let required = candidate.required_capabilities();
        if !tracker_capabilities.contains(required) {
            return Err(FollowerError::CapabilityMismatch {
                required,
                available: tracker_capabilities,
            });
        }
        self.active = candidate;
        self.lost_since = None;
        Ok(())
    }

    /// Produce this tick's clamped command per `spec.md`'s forwarding
    /// policy: `Tracking`/`Drifting` forward the active follower's output;
    /// any other state runs the edge-triggered target-loss path.
    pub fn dispatch(&mut self, state: TrackingState, output: &TrackerOutput, telemetry: &Telemetry, dt: f64) -> Result<SetpointCommand, FollowerError> {
        let raw = if state.allows_follow() {
            self.lost_since = None;
            self.active.calculate_command(output, telemetry, dt)
        } else {
            let since = *self.lost_since.get_or_insert_with(Instant::now);
            self.active.on_target_loss(Instant::now().duration_since(since))
        };

        let clamped = self.safety.clamp(self.active.profile_name(), raw);
        SetpointHandler::finalize(clamped)
    }
}
