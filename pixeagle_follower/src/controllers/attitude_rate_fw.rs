//! Profile 7: fixed-wing attitude rate. L1 lateral guidance, TECS-derived
//! pitch/throttle, coordinated-bank roll, and stall protection below
//! `fw_min_airspeed_mps + fw_stall_margin_mps`.
//!
//! The tracker reports a normalized image offset, not a metric cross-track
//! distance. We convert one into the other via an assumed ground-projected
//! field of view (`ASSUMED_CROSS_TRACK_SCALE_M`) — the same simplification
//! the gimbal followers make for angle recovery, recorded as an open
//! question resolution.

use std::f32::consts::PI;

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::pid::{pid_compute, PidGains, PidState};

const GRAVITY_M_S2: f32 = 9.81;
const ASSUMED_CROSS_TRACK_SCALE_M: f32 = 60.0;
const CRUISE_AIRSPEED_MARGIN_MPS: f32 = 1.2;

pub struct AttitudeRateFw {
    l1_distance_m: f32,
    min_airspeed_mps: f32,
    stall_margin_mps: f32,
    stall_recovery_pitch_rad: f32,
    stall_recovery_throttle: f32,
    tecs_weight: f32,
    gains: PidGains,
    roll: PidState,
    tecs_pitch: PidState,
    tecs_throttle: PidState,
}

impl AttitudeRateFw {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            l1_distance_m: cfg.fw_l1_distance_m,
            min_airspeed_mps: cfg.fw_min_airspeed_mps,
            stall_margin_mps: cfg.fw_stall_margin_mps,
            stall_recovery_pitch_rad: cfg.fw_stall_recovery_pitch_deg.to_radians(),
            stall_recovery_throttle: cfg.fw_stall_recovery_throttle,
            tecs_weight: cfg.fw_tecs_weight,
            gains: pid_gains(cfg),
            roll: PidState::default(),
            tecs_pitch: PidState::default(),
            tecs_throttle: PidState::default(),
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let airspeed = telemetry.airspeed_m_s.max(self.min_airspeed_mps * 0.1);

        let cross_track_m = x * (ASSUMED_CROSS_TRACK_SCALE_M / 2.0);
        let eta = (cross_track_m / self.l1_distance_m.max(1.0)).atan();
        let lateral_accel = 2.0 * airspeed * airspeed * eta.sin() / self.l1_distance_m.max(1.0);
        let yaw_rate = lateral_accel / airspeed;
        let bank_cmd_rad = (yaw_rate * airspeed / GRAVITY_M_S2).atan();

        let mut cmd = SetpointCommand::neutral(ControlType::AttitudeRate);
        cmd.yaw_rate = yaw_rate;

        if airspeed < self.min_airspeed_mps + self.stall_margin_mps {
            cmd.pitch_rate = self.stall_recovery_pitch_rad;
            cmd.thrust = self.stall_recovery_throttle;
            cmd.roll_rate = pid_compute(&mut self.roll, &self.gains, -telemetry.roll_rad as f64, dt) as f32;
            return cmd;
        }

        let climb_rate_cmd = -y * self.min_airspeed_mps;
        let target_airspeed = self.min_airspeed_mps * CRUISE_AIRSPEED_MARGIN_MPS;

        let climb_error = (climb_rate_cmd - telemetry.vertical_speed_m_s) as f64;
        let airspeed_error = (target_airspeed - telemetry.airspeed_m_s) as f64;

        cmd.pitch_rate = pid_compute(&mut self.tecs_pitch, &self.gains, climb_error, dt) as f32 * self.tecs_weight;
        let throttle_trim = pid_compute(&mut self.tecs_throttle, &self.gains, airspeed_error, dt) as f32 * (2.0 - self.tecs_weight);
        cmd.thrust = (0.5 + throttle_trim).clamp(0.0, 1.0);

        cmd.roll_rate = pid_compute(&mut self.roll, &self.gains, (bank_cmd_rad - telemetry.roll_rad) as f64, dt) as f32;
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
    fn airspeed_below_threshold_triggers_stall_recovery() {
        let cfg = FollowerSection::default();
        let mut follower = AttitudeRateFw::new(&cfg);
        let telemetry = Telemetry {
            airspeed_m_s: cfg.fw_min_airspeed_mps + 0.5,
            ..Telemetry::default()
        };
        let cmd = follower.calculate_command(&output(0.0, 0.0), &telemetry, 0.05);
        assert_eq!(cmd.pitch_rate, cfg.fw_stall_recovery_pitch_deg.to_radians());
        assert_eq!(cmd.thrust, cfg.fw_stall_recovery_throttle);
    }

    #[test]
    fn cross_track_right_of_center_yaws_right() {
        let cfg = FollowerSection::default();
        let mut follower = AttitudeRateFw::new(&cfg);
        let telemetry = Telemetry {
            airspeed_m_s: cfg.fw_min_airspeed_mps + 6.0,
            ..Telemetry::default()
        };
        let cmd = follower.calculate_command(&output(0.6, 0.0), &telemetry, 0.05);
        assert!(cmd.yaw_rate > 0.0);
    }

    #[test]
    fn nominal_flight_keeps_roll_within_a_quarter_turn() {
        let cfg = FollowerSection::default();
        let mut follower = AttitudeRateFw::new(&cfg);
        let telemetry = Telemetry {
            airspeed_m_s: cfg.fw_min_airspeed_mps + 6.0,
            ..Telemetry::default()
        };
        let cmd = follower.calculate_command(&output(0.2, 0.0), &telemetry, 0.05);
        assert!(cmd.roll_rate.abs() < PI);
    }
}
