//! Edge-triggered target-loss handling shared by every follower: once
//! `elapsed_since_last_update >= TARGET_LOSS_TIMEOUT`, the configured
//! action fires exactly once, then commands are suppressed until
//! re-acquisition resets the latch.

use std::time::Duration;

use pixeagle_common::setpoint::{ControlType, SetpointCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLossAction {
    Hover,
    ContinueVelocityTimeout,
    Rtl,
    Orbit,
    SlowForward,
}

impl TargetLossAction {
    pub fn from_config_str(value: &str) -> Self {
        match value {
            "continue_velocity_timeout" => Self::ContinueVelocityTimeout,
            "rtl" => Self::Rtl,
            "orbit" => Self::Orbit,
            "slow_forward" => Self::SlowForward,
            _ => Self::Hover,
        }
    }
}

pub const TARGET_LOSS_TIMEOUT: Duration = Duration::from_millis(500);

/// Build the one-shot command a follower dispatches when its target-loss
/// latch fires. `last_command` is the most recent non-loss command this
/// follower produced, used by `ContinueVelocityTimeout`. `Rtl` resolves to a
/// neutral command here — the actual MAVLink RTL request is issued through
/// `SafetyManager`/`AutopilotBridge`'s own escalation path (see
/// `SafetyManager::check_safety`), not through a `SetpointCommand` field.
pub fn command_for(
    action: TargetLossAction,
    control_type: ControlType,
    last_command: Option<SetpointCommand>,
    slow_forward_mps: f32,
    orbit_yaw_rate_deg_s: f32,
) -> SetpointCommand {
    match action {
        TargetLossAction::Hover | TargetLossAction::Rtl => SetpointCommand::neutral(control_type),
        TargetLossAction::ContinueVelocityTimeout => {
            last_command.unwrap_or_else(|| SetpointCommand::neutral(control_type))
        }
        TargetLossAction::Orbit => {
            let mut cmd = SetpointCommand::neutral(control_type);
            cmd.yaw_rate = orbit_yaw_rate_deg_s;
            cmd
        }
        TargetLossAction::SlowForward => {
            let mut cmd = SetpointCommand::neutral(control_type);
            if control_type == ControlType::BodyVelocity {
                cmd.vx = slow_forward_mps;
            }
            cmd
        }
    }
}

#[derive(Debug, Default)]
pub struct TargetLossLatch {
    fired: bool,
}

impl TargetLossLatch {
    pub fn new() -> Self {
        Self { fired: false }
    }

    /// Returns `true` exactly once per loss episode — the instant
    /// `elapsed` first crosses the timeout. Call `reset` once the target
    /// is reacquired so the next loss fires again.
    pub fn should_fire(&mut self, elapsed: Duration) -> bool {
        if elapsed >= TARGET_LOSS_TIMEOUT && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }

    pub fn is_suppressing(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}

/// Per-follower bundle of the pieces needed to answer `on_target_loss`:
/// the configured action, the one-shot latch, and the last command sent
/// while the target was still valid (for `ContinueVelocityTimeout`).
#[derive(Debug, Clone)]
pub struct TargetLossState {
    action: TargetLossAction,
    slow_forward_mps: f32,
    orbit_yaw_rate_deg_s: f32,
    latch: TargetLossLatch,
    last_command: Option<SetpointCommand>,
}

impl TargetLossState {
    pub fn new(action: TargetLossAction, slow_forward_mps: f32, orbit_yaw_rate_deg_s: f32) -> Self {
        Self {
            action,
            slow_forward_mps,
            orbit_yaw_rate_deg_s,
            latch: TargetLossLatch::new(),
            last_command: None,
        }
    }

    /// Record a command produced while the target was valid, so it can be
    /// replayed by `ContinueVelocityTimeout`, and reset the latch so the
    /// next loss episode fires again.
    pub fn record(&mut self, cmd: SetpointCommand) {
        self.last_command = Some(cmd);
        self.latch.reset();
    }

    /// The command to dispatch this tick while the target has been lost
    /// for `elapsed`. Fires the configured action exactly once past
    /// [`TARGET_LOSS_TIMEOUT`], then returns a neutral command on every
    /// subsequent call until [`TargetLossState::record`] resets the latch.
    pub fn on_loss(&mut self, elapsed: Duration, control_type: ControlType) -> SetpointCommand {
        if self.latch.should_fire(elapsed) {
            command_for(self.action, control_type, self.last_command, self.slow_forward_mps, self.orbit_yaw_rate_deg_s)
        } else {
            SetpointCommand::neutral(control_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_loss_state_fires_once_then_suppresses() {
        let mut state = TargetLossState::new(TargetLossAction::Orbit, 1.0, 0.3);
        let first = state.on_loss(Duration::from_millis(600), ControlType::BodyVelocity);
        let second = state.on_loss(Duration::from_millis(700), ControlType::BodyVelocity);
        assert_eq!(first.yaw_rate, 0.3);
        assert_eq!(second, SetpointCommand::neutral(ControlType::BodyVelocity));
    }

    #[test]
    fn recording_a_fresh_command_resets_the_latch() {
        let mut state = TargetLossState::new(TargetLossAction::Hover, 1.0, 0.3);
        state.on_loss(Duration::from_millis(600), ControlType::BodyVelocity);
        state.record(SetpointCommand::neutral(ControlType::BodyVelocity));
        assert!(!state.latch.is_suppressing());
    }

    #[test]
    fn fires_exactly_once_past_timeout() {
        let mut latch = TargetLossLatch::new();
        assert!(!latch.should_fire(Duration::from_millis(100)));
        assert!(latch.should_fire(Duration::from_millis(600)));
        assert!(!latch.should_fire(Duration::from_millis(700)));
    }

    #[test]
    fn reset_allows_refiring_on_next_episode() {
        let mut latch = TargetLossLatch::new();
        latch.should_fire(Duration::from_millis(600));
        latch.reset();
        assert!(latch.should_fire(Duration::from_millis(600)));
    }

    #[test]
    fn hover_and_rtl_both_resolve_to_neutral() {
        let hover = command_for(TargetLossAction::Hover, ControlType::BodyVelocity, None, 1.0, 0.2);
        let rtl = command_for(TargetLossAction::Rtl, ControlType::BodyVelocity, None, 1.0, 0.2);
        assert_eq!(hover, SetpointCommand::neutral(ControlType::BodyVelocity));
        assert_eq!(rtl, SetpointCommand::neutral(ControlType::BodyVelocity));
    }

    #[test]
    fn continue_velocity_timeout_replays_last_command() {
        let mut last = SetpointCommand::neutral(ControlType::BodyVelocity);
        last.vx = 3.0;
        let cmd = command_for(TargetLossAction::ContinueVelocityTimeout, ControlType::BodyVelocity, Some(last), 1.0, 0.2);
        assert_eq!(cmd.vx, 3.0);
    }

    #[test]
    fn slow_forward_sets_only_vx() {
        let cmd = command_for(TargetLossAction::SlowForward, ControlType::BodyVelocity, None, 1.5, 0.2);
        assert_eq!(cmd.vx, 1.5);
        assert_eq!(cmd.vy, 0.0);
    }

    #[test]
    fn orbit_sets_only_yaw_rate() {
        let cmd = command_for(TargetLossAction::Orbit, ControlType::BodyVelocity, None, 1.5, 0.3);
        assert_eq!(cmd.yaw_rate, 0.3);
        assert_eq!(cmd.vx, 0.0);
    }
}
