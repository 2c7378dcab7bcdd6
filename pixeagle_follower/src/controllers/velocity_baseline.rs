//! Profile 1: velocity baseline (multicopter). Constant forward velocity,
//! dual-mode lateral control, vertical PID on normalized image Y.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::pid::{pid_compute, PidGains, PidState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateralMode {
    /// Lateral velocity holds the target centered horizontally, yaw stays fixed.
    Sideslip,
    /// Yaw rate holds the target centered horizontally, lateral velocity stays zero.
    CoordinatedTurn,
}

impl LateralMode {
    pub fn from_config_str(value: &str) -> Self {
        match value {
            "coordinated_turn" => Self::CoordinatedTurn,
            _ => Self::Sideslip,
        }
    }
}

pub struct VelocityBaseline {
    forward_velocity_mps: f32,
    lateral_mode: LateralMode,
    gains: PidGains,
    vertical: PidState,
    lateral: PidState,
}

impl VelocityBaseline {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            forward_velocity_mps: cfg.baseline_forward_velocity_mps,
            lateral_mode: LateralMode::from_config_str(&cfg.baseline_lateral_mode),
            gains: pid_gains(cfg),
            vertical: PidState::default(),
            lateral: PidState::default(),
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, _telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let error_x = x as f64;
        let error_y = y as f64;

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.vx = self.forward_velocity_mps;
        cmd.vz = pid_compute(&mut self.vertical, &self.gains, error_y, dt) as f32;

        match self.lateral_mode {
            LateralMode::Sideslip => {
                cmd.vy = pid_compute(&mut self.lateral, &self.gains, error_x, dt) as f32;
            }
            LateralMode::CoordinatedTurn => {
                cmd.yaw_rate = pid_compute(&mut self.lateral, &self.gains, error_x, dt) as f32;
            }
        }
        cmd
    }
}

pub(crate) fn pid_gains(cfg: &FollowerSection) -> PidGains {
    PidGains {
        kp: cfg.kp,
        ki: cfg.ki,
        kd: cfg.kd,
        tf: cfg.tf,
        tt: cfg.tt,
        out_max: 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::tracking::TrackingState;

    fn output(x: f32, y: f32) -> TrackerOutput {
        TrackerOutput {
            track_id: Some(1),
            bbox: None,
            position_2d: Some((x, y)),
            confidence: 0.9,
            state: TrackingState::Tracking,
            frame_sequence: 0,
            velocity_px_s: None,
        }
    }

    #[test]
    fn centered_target_produces_constant_forward_velocity_only() {
        let cfg = FollowerSection::default();
        let mut follower = VelocityBaseline::new(&cfg);
        let cmd = follower.calculate_command(&output(0.0, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.vx, cfg.baseline_forward_velocity_mps);
        assert_eq!(cmd.vy, 0.0);
        assert_eq!(cmd.yaw_rate, 0.0);
    }

    #[test]
    fn sideslip_mode_moves_laterally_not_yaw() {
        let mut cfg = FollowerSection::default();
        cfg.baseline_lateral_mode = "sideslip".to_string();
        let mut follower = VelocityBaseline::new(&cfg);
        let cmd = follower.calculate_command(&output(0.6, 0.0), &Telemetry::default(), 0.05);
        assert_ne!(cmd.vy, 0.0);
        assert_eq!(cmd.yaw_rate, 0.0);
    }

    #[test]
    fn coordinated_turn_mode_yaws_not_laterally() {
        let mut cfg = FollowerSection::default();
        cfg.baseline_lateral_mode = "coordinated_turn".to_string();
        let mut follower = VelocityBaseline::new(&cfg);
        let cmd = follower.calculate_command(&output(0.6, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.vy, 0.0);
        assert_ne!(cmd.yaw_rate, 0.0);
    }
}
