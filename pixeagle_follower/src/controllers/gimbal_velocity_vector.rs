//! Profile 9: gimbal velocity vector. Direct analytic conversion of gimbal
//! angles to a body-frame velocity vector — no PID loop, just the
//! mount-aware transform scaled by a configured gain.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::mount::{MountConfig, MountOrientation};

const ASSUMED_FOV_DEG: f32 = 60.0;

pub struct GimbalVelocityVector {
    mount: MountConfig,
    gain: f32,
}

impl GimbalVelocityVector {
    pub fn new(cfg: &FollowerSection, mount: MountConfig) -> Self {
        Self {
            mount,
            gain: cfg.gimbal_velocity_gain,
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, _telemetry: &Telemetry, _dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let yaw_deg = x * (ASSUMED_FOV_DEG / 2.0);
        let pitch_neutral = match self.mount.orientation {
            MountOrientation::Vertical => 90.0,
            MountOrientation::Horizontal => 0.0,
        };
        let pitch_deg = pitch_neutral + y * (ASSUMED_FOV_DEG / 2.0);
        let (forward, lateral) = self.mount.transform(yaw_deg, pitch_deg);

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.vx = forward * self.gain;
        cmd.vy = lateral * self.gain;
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mount::RollRightSign;
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
            orientation: MountOrientation::Vertical,
            roll_right_sign: RollRightSign::Positive,
            invert_forward: false,
            invert_lateral: false,
        }
    }

    #[test]
    fn centered_target_commands_zero_velocity() {
        let cfg = FollowerSection::default();
        let mut follower = GimbalVelocityVector::new(&cfg, mount());
        let cmd = follower.calculate_command(&output(0.0, 0.0), &Telemetry::default(), 0.05);
        assert_eq!(cmd.vx, 0.0);
        assert_eq!(cmd.vy, 0.0);
    }

    #[test]
    fn vertical_mount_maps_pitch_offset_to_forward() {
        let cfg = FollowerSection::default();
        let mut follower = GimbalVelocityVector::new(&cfg, mount());
        let cmd = follower.calculate_command(&output(0.0, 0.6), &Telemetry::default(), 0.05);
        assert_ne!(cmd.vx, 0.0);
        assert_eq!(cmd.vy, 0.0);
    }
}
