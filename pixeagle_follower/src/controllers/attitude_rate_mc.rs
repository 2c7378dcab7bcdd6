//! Profile 6: attitude rate (multicopter). Commands `{roll_rate, pitch_rate,
//! yaw_rate, thrust}` directly; altitude is held by a thrust PID perturbing
//! a configured base thrust rather than by a velocity setpoint.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::pid::{pid_compute, PidGains, PidState};

pub struct AttitudeRateMc {
    base_thrust: f32,
    gains: PidGains,
    roll: PidState,
    pitch: PidState,
    thrust: PidState,
}

impl AttitudeRateMc {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            base_thrust: cfg.attitude_base_thrust,
            gains: pid_gains(cfg),
            roll: PidState::default(),
            pitch: PidState::default(),
            thrust: PidState::default(),
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, _telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let error_x = x as f64;
        let error_y = y as f64;

        let mut cmd = SetpointCommand::neutral(ControlType::AttitudeRate);
        cmd.roll_rate = pid_compute(&mut self.roll, &self.gains, error_x, dt) as f32;
        cmd.pitch_rate = -pid_compute(&mut self.pitch, &self.gains, error_y, dt) as f32;
        let thrust_trim = pid_compute(&mut self.thrust, &self.gains, -error_y, dt) as f32;
        cmd.thrust = (self.base_thrust + thrust_trim).clamp(0.0, 1.0);
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
    fn centered_target_holds_base_thrust() {
        let cfg = FollowerSection::default();
        let mut follower = AttitudeRateMc::new(&cfg);
        let cmd = follower.calculate_command(&output(0.0, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.thrust, cfg.attitude_base_thrust);
        assert_eq!(cmd.roll_rate, 0.0);
        assert_eq!(cmd.pitch_rate, 0.0);
    }

    #[test]
    fn thrust_is_always_clamped_to_unit_interval() {
        let mut cfg = FollowerSection::default();
        cfg.attitude_base_thrust = 0.95;
        cfg.kp = 50.0;
        let mut follower = AttitudeRateMc::new(&cfg);
        let cmd = follower.calculate_command(&output(0.0, 0.9), &Telemetry::default(), 0.05);
        assert!(cmd.thrust >= 0.0 && cmd.thrust <= 1.0);
    }
}
