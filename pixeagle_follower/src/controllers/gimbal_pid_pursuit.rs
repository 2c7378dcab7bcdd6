//! Profile 8: gimbal PID pursuit. Converts a mount-transformed gimbal
//! yaw/pitch offset into forward/lateral velocity via PID.
//!
//! The tracker output carries a normalized image offset rather than a
//! gimbal-reported angle; we recover an equivalent yaw/pitch pair assuming
//! a fixed field of view (`ASSUMED_FOV_DEG`), matching `spec.md`'s open
//! question on gimbal angle units by documenting the choice here rather
//! than threading a new schema field through `TrackerOutput`.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::mount::{MountConfig, MountOrientation};
use crate::pid::{pid_compute, PidGains, PidState};

const ASSUMED_FOV_DEG: f32 = 60.0;

pub struct GimbalPidPursuit {
    mount: MountConfig,
    gains: PidGains,
    forward: PidState,
    lateral: PidState,
}

impl GimbalPidPursuit {
    pub fn new(cfg: &FollowerSection, mount: MountConfig) -> Self {
        Self {
            mount,
            gains: pid_gains(cfg),
            forward: PidState::default(),
            lateral: PidState::default(),
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, _telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let yaw_deg = x * (ASSUMED_FOV_DEG / 2.0);
        let pitch_neutral = match self.mount.orientation {
            MountOrientation::Vertical => 90.0,
            MountOrientation::Horizontal => 0.0,
        };
        let pitch_deg = pitch_neutral + y * (ASSUMED_FOV_DEG / 2.0);
        let (forward_error, lateral_error) = self.mount.transform(yaw_deg, pitch_deg);

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.vx = pid_compute(&mut self.forward, &self.gains, forward_error as f64, dt) as f32;
        cmd.vy = pid_compute(&mut self.lateral, &self.gains, lateral_error as f64, dt) as f32;
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mount::{MountOrientation, RollRightSign};
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

    fn mount() -> MountConfig {
        MountConfig {
            orientation: MountOrientation::Horizontal,
            roll_right_sign: RollRightSign::Positive,
            invert_forward: false,
            invert_lateral: false,
        }
    }

    #[test]
    fn centered_target_produces_no_command() {
        let cfg = FollowerSection::default();
        let mut follower = GimbalPidPursuit::new(&cfg, mount());
        let cmd = follower.calculate_command(&output(0.0, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.vx, 0.0);
        assert_eq!(cmd.vy, 0.0);
    }

    #[test]
    fn off_center_target_drives_velocity() {
        let cfg = FollowerSection::default();
        let mut follower = GimbalPidPursuit::new(&cfg, mount());
        let cmd = follower.calculate_command(&output(0.6, 0.0), &Telemetry::default(), 0.05);
        assert_ne!(cmd.vx, 0.0);
    }
}
