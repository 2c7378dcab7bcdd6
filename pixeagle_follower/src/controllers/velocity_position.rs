//! Profile 5: velocity position. Holds horizontal position fixed and
//! tracks the target purely by yaw and altitude.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::pid::{pid_compute, PidGains, PidState};

pub struct VelocityPosition {
    gains: PidGains,
    yaw: PidState,
    vertical: PidState,
}

impl VelocityPosition {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            gains: pid_gains(cfg),
            yaw: PidState::default(),
            vertical: PidState::default(),
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, _telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let error_x = x as f64;
        let error_y = y as f64;

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.yaw_rate = pid_compute(&mut self.yaw, &self.gains, error_x, dt) as f32;
        cmd.vz = pid_compute(&mut self.vertical, &self.gains, error_y, dt) as f32;
        cmd
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
    fn horizontal_velocity_is_always_zero() {
        let cfg = FollowerSection::default();
        let mut follower = VelocityPosition::new(&cfg);
        let cmd = follower.calculate_command(&output(0.8, -0.8), &Telemetry::default(), 0.05);
        assert_eq!(cmd.vx, 0.0);
        assert_eq!(cmd.vy, 0.0);
    }

    #[test]
    fn off_center_target_drives_yaw_and_vertical() {
        let cfg = FollowerSection::default();
        let mut follower = VelocityPosition::new(&cfg);
        let cmd = follower.calculate_command(&output(0.8, -0.8), &Telemetry::default(), 0.05);
        assert_ne!(cmd.yaw_rate, 0.0);
        assert_ne!(cmd.vz, 0.0);
    }
}
