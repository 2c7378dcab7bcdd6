//! Profile 3: velocity ground. Full 3-axis velocity for top-down tracking,
//! with altitude-dependent gain scheduling and an optional bounded descent.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::pid::{pid_compute, PidGains, PidState};

pub struct VelocityGround {
    min_descent_height_m: f32,
    gain_schedule_ref_altitude_m: f32,
    gains: PidGains,
    lateral: PidState,
    longitudinal: PidState,
    vertical: PidState,
}

impl VelocityGround {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            min_descent_height_m: cfg.ground_min_descent_height_m,
            gain_schedule_ref_altitude_m: cfg.ground_gain_schedule_ref_altitude_m.max(0.1),
            gains: pid_gains(cfg),
            lateral: PidState::default(),
            longitudinal: PidState::default(),
            vertical: PidState::default(),
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let error_x = x as f64;
        let error_y = y as f64;

        // Higher above the target, the same pixel error maps to a larger
        // ground-plane offset, so the gain is scheduled up with altitude
        // rather than left constant.
        let gain_scale = (telemetry.altitude_m / self.gain_schedule_ref_altitude_m).clamp(0.2, 3.0);

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.vx = pid_compute(&mut self.longitudinal, &self.gains, error_y, dt) as f32 * gain_scale;
        cmd.vy = pid_compute(&mut self.lateral, &self.gains, error_x, dt) as f32 * gain_scale;

        if telemetry.altitude_m > self.min_descent_height_m {
            // Descend only while reasonably centered over the target, so a
            // large lateral correction isn't compounded by also closing altitude.
            let centered = error_x.abs() < 0.15 && error_y.abs() < 0.15;
            let descent_setpoint = if centered { 1.0 } else { 0.0 };
            cmd.vz = pid_compute(&mut self.vertical, &self.gains, descent_setpoint, dt) as f32;
        } else {
            self.vertical.reset();
        }
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
    fn descent_is_suppressed_below_the_minimum_height() {
        let cfg = FollowerSection::default();
        let mut follower = VelocityGround::new(&cfg);
        let telemetry = Telemetry {
            altitude_m: cfg.ground_min_descent_height_m - 1.0,
            ..Telemetry::default()
        };
        let cmd = follower.calculate_command(&output(0.0, 0.0), &telemetry, 0.05);
        assert_eq!(cmd.vz, 0.0);
    }

    #[test]
    fn higher_altitude_scales_gain_up() {
        let mut cfg = FollowerSection::default();
        cfg.ground_gain_schedule_ref_altitude_m = 10.0;
        let mut low = VelocityGround::new(&cfg);
        let mut high = VelocityGround::new(&cfg);
        let low_cmd = low.calculate_command(&output(0.6, 0.0), &Telemetry { altitude_m: 2.0, ..Default::default() }, 0.05);
        let high_cmd = high.calculate_command(&output(0.6, 0.0), &Telemetry { altitude_m: 20.0, ..Default::default() }, 0.05);
        assert!(high_cmd.vy.abs() > low_cmd.vy.abs());
    }
}
