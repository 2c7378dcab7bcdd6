//! Profile 2: velocity chase. Baseline plus a forward-velocity ramp with
//! automatic lateral-mode switching, adaptive dive/climb guarded against
//! oscillation, and optional pitch compensation.

use std::time::Instant;

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::oscillation::SignChangeDetector;
use crate::pid::{pid_compute, PidGains, PidState};
use crate::smoothing::Ema;

/// Vertical correction applied per unit of EMA-smoothed target Y-rate when
/// the adaptive term is active.
const ADAPTIVE_VERTICAL_GAIN: f32 = 1.5;

pub struct VelocityChase {
    accel_mps2: f32,
    max_velocity_mps: f32,
    mode_switch_velocity_mps: f32,
    adaptive_vertical: bool,
    pitch_compensation: bool,
    gains: PidGains,
    current_forward_mps: f32,
    vertical: PidState,
    lateral: PidState,
    y_rate_ema: Ema,
    oscillation_guard: SignChangeDetector,
    prev_error_y: Option<f64>,
}

impl VelocityChase {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            accel_mps2: cfg.chase_accel_mps2,
            max_velocity_mps: cfg.chase_max_velocity_mps,
            mode_switch_velocity_mps: cfg.chase_mode_switch_velocity_mps,
            adaptive_vertical: cfg.chase_adaptive_vertical,
            pitch_compensation: cfg.chase_pitch_compensation,
            gains: pid_gains(cfg),
            current_forward_mps: 0.0,
            vertical: PidState::default(),
            lateral: PidState::default(),
            y_rate_ema: Ema::new(0.3),
            oscillation_guard: SignChangeDetector::new(cfg.oscillation_disable_after, std::time::Duration::from_secs_f64(cfg.oscillation_window_s)),
            prev_error_y: None,
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let error_x = x as f64;
        let error_y = y as f64;

        self.current_forward_mps = (self.current_forward_mps + self.accel_mps2 * dt as f32).clamp(0.0, self.max_velocity_mps);

        let mut forward = self.current_forward_mps;
        if self.pitch_compensation {
            let cos_pitch = telemetry.pitch_rad.cos().max(0.2);
            forward /= cos_pitch;
        }

        let pid_vertical = pid_compute(&mut self.vertical, &self.gains, error_y, dt) as f32;
        let vz = if self.adaptive_vertical {
            let y_rate = match self.prev_error_y {
                Some(prev) if dt > 0.0 => ((error_y - prev) / dt) as f32,
                _ => 0.0,
            };
            let smoothed_rate = self.y_rate_ema.update(y_rate);
            let active = self.oscillation_guard.observe(smoothed_rate, Instant::now());
            if active {
                pid_vertical + smoothed_rate * ADAPTIVE_VERTICAL_GAIN
            } else {
                pid_vertical
            }
        } else {
            pid_vertical
        };
        self.prev_error_y = Some(error_y);

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.vx = forward;
        cmd.vz = vz;

        if self.current_forward_mps >= self.mode_switch_velocity_mps {
            cmd.yaw_rate = pid_compute(&mut self.lateral, &self.gains, error_x, dt) as f32;
        } else {
            cmd.vy = pid_compute(&mut self.lateral, &self.gains, error_x, dt) as f32;
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
    fn forward_velocity_ramps_up_then_clips_at_max() {
        let cfg = FollowerSection::default();
        let mut follower = VelocityChase::new(&cfg);
        for _ in 0..1000 {
            follower.calculate_command(&output(0.0, 0.0), &Telemetry::default(), 0.05);
        }
        assert_eq!(follower.current_forward_mps, cfg.chase_max_velocity_mps);
    }

    #[test]
    fn below_switch_velocity_uses_sideslip() {
        let mut cfg = FollowerSection::default();
        cfg.chase_mode_switch_velocity_mps = 100.0;
        let mut follower = VelocityChase::new(&cfg);
        let cmd = follower.calculate_command(&output(0.6, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.yaw_rate, 0.0);
        assert_ne!(cmd.vy, 0.0);
    }

    #[test]
    fn above_switch_velocity_uses_coordinated_turn() {
        let mut cfg = FollowerSection::default();
        cfg.chase_mode_switch_velocity_mps = 0.0;
        let mut follower = VelocityChase::new(&cfg);
        let cmd = follower.calculate_command(&output(0.6, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.vy, 0.0);
        assert_ne!(cmd.yaw_rate, 0.0);
    }
}
