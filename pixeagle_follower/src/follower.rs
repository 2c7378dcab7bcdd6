//! `Follower`: the single contract all nine control laws satisfy, mirroring
//! `pixeagle_tracker::Tracker`'s closed-enum dispatch.

use std::time::Duration;

use pixeagle_common::capability::TrackerCapability;
use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::attitude_rate_fw::AttitudeRateFw;
use crate::controllers::attitude_rate_mc::AttitudeRateMc;
use crate::controllers::gimbal_pid_pursuit::GimbalPidPursuit;
use crate::controllers::gimbal_velocity_vector::GimbalVelocityVector;
use crate::controllers::velocity_baseline::VelocityBaseline;
use crate::controllers::velocity_chase::VelocityChase;
use crate::controllers::velocity_distance::VelocityDistance;
use crate::controllers::velocity_ground::VelocityGround;
use crate::controllers::velocity_position::VelocityPosition;
use crate::error::FollowerError;
use crate::mount::{MountConfig, MountOrientation, RollRightSign};
use crate::target_loss::{TargetLossAction, TargetLossState};

enum FollowerVariant {
    VelocityBaseline(VelocityBaseline),
    VelocityChase(VelocityChase),
    VelocityGround(VelocityGround),
    VelocityDistance(VelocityDistance),
    VelocityPosition(VelocityPosition),
    AttitudeRateMc(AttitudeRateMc),
    AttitudeRateFw(AttitudeRateFw),
    GimbalPidPursuit(GimbalPidPursuit),
    GimbalVelocityVector(GimbalVelocityVector),
}

/// A constructed follower, bundling its control-law variant with the
/// shared target-loss bookkeeping every profile's base contract requires.
pub struct Follower {
    variant: FollowerVariant,
    control_type: ControlType,
    loss: TargetLossState,
}

fn mount_config(cfg: &FollowerSection) -> MountConfig {
    MountConfig {
        orientation: match cfg.gimbal_mount_orientation.as_str() {
            "vertical" => MountOrientation::Vertical,
            _ => MountOrientation::Horizontal,
        },
        roll_right_sign: match cfg.gimbal_roll_right_sign.as_str() {
            "negative" => RollRightSign::Negative,
            _ => RollRightSign::Positive,
        },
        invert_forward: cfg.gimbal_invert_forward,
        invert_lateral: cfg.gimbal_invert_lateral,
    }
}

impl Follower {
    /// Construct the follower named by `cfg.profile`, fully initialized
    /// from the given configuration snapshot.
    pub fn from_section(cfg: &FollowerSection) -> Result<Self, FollowerError> {
        let loss = TargetLossState::new(
            TargetLossAction::from_config_str(&cfg.target_loss_action),
            cfg.target_loss_slow_forward_mps,
            cfg.fw_orbit_radius_m.recip() * cfg.fw_min_airspeed_mps,
        );

        let (variant, control_type) = match cfg.profile.as_str() {
            "velocity_baseline" => (FollowerVariant::VelocityBaseline(VelocityBaseline::new(cfg)), ControlType::BodyVelocity),
            "velocity_chase" => (FollowerVariant::VelocityChase(VelocityChase::new(cfg)), ControlType::BodyVelocity),
            "velocity_ground" => (FollowerVariant::VelocityGround(VelocityGround::new(cfg)), ControlType::BodyVelocity),
            "velocity_distance" => (FollowerVariant::VelocityDistance(VelocityDistance::new(cfg)), ControlType::BodyVelocity),
            "velocity_position" => (FollowerVariant::VelocityPosition(VelocityPosition::new(cfg)), ControlType::BodyVelocity),
            "attitude_rate_mc" => (FollowerVariant::AttitudeRateMc(AttitudeRateMc::new(cfg)), ControlType::AttitudeRate),
            "attitude_rate_fw" => (FollowerVariant::AttitudeRateFw(AttitudeRateFw::new(cfg)), ControlType::AttitudeRate),
            "gimbal_pid_pursuit" => (
                FollowerVariant::GimbalPidPursuit(GimbalPidPursuit::new(cfg, mount_config(cfg))),
                ControlType::BodyVelocity,
            ),
            "gimbal_velocity_vector" => (
                FollowerVariant::GimbalVelocityVector(GimbalVelocityVector::new(cfg, mount_config(cfg))),
                ControlType::BodyVelocity,
            ),
            other => return Err(FollowerError::UnknownProfile(other.to_string())),
        };

        Ok(Self { variant, control_type, loss })
    }

    pub fn profile_name(&self) -> &'static str {
        match &self.variant {
            FollowerVariant::VelocityBaseline(_) => "velocity_baseline",
            FollowerVariant::VelocityChase(_) => "velocity_chase",
            FollowerVariant::VelocityGround(_) => "velocity_ground",
            FollowerVariant::VelocityDistance(_) => "velocity_distance",
            FollowerVariant::VelocityPosition(_) => "velocity_position",
            FollowerVariant::AttitudeRateMc(_) => "attitude_rate_mc",
            FollowerVariant::AttitudeRateFw(_) => "attitude_rate_fw",
            FollowerVariant::GimbalPidPursuit(_) => "gimbal_pid_pursuit",
            FollowerVariant::GimbalVelocityVector(_) => "gimbal_velocity_vector",
        }
    }

    pub fn control_type(&self) -> ControlType {
        self.control_type
    }

    /// Tracker output fields this profile reads. Every profile here only
    /// needs `position_2d`/`bbox`, already covered by the weakest tracker
    /// (classic); kept as a method so `FollowerManager::switch` has a
    /// uniform seam even though today every variant returns the same set.
    pub fn required_capabilities(&self) -> TrackerCapability {
        match &self.variant {
            FollowerVariant::VelocityDistance(_) => TrackerCapability::POSITION_2D | TrackerCapability::BBOX,
            _ => TrackerCapability::POSITION_2D,
        }
    }

    /// Compute this tick's command from a valid tracker output, then record
    /// it so a subsequent target loss can replay it under
    /// `continue_velocity_timeout`.
    pub fn calculate_command(&mut self, output: &TrackerOutput, telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let cmd = match &mut self.variant {
            FollowerVariant::VelocityBaseline(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::VelocityChase(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::VelocityGround(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::VelocityDistance(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::VelocityPosition(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::AttitudeRateMc(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::AttitudeRateFw(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::GimbalPidPursuit(f) => f.calculate_command(output, telemetry, dt),
            FollowerVariant::GimbalVelocityVector(f) => f.calculate_command(output, telemetry, dt),
        };
        self.loss.record(cmd);
        cmd
    }

    /// The command to dispatch while the target has been lost for
    /// `elapsed`: the configured one-shot action, then neutral until
    /// `calculate_command` runs again.
    pub fn on_target_loss(&mut self, elapsed: Duration) -> SetpointCommand {
        self.loss.on_loss(elapsed, self.control_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::tracking::TrackingState;

    fn output() -> TrackerOutput {
        TrackerOutput {
            track_id: Some(1),
            bbox: None,
            position_2d: Some((0.6, 0.5)),
            confidence: 0.9,
            state: TrackingState::Tracking,
            frame_sequence: 0,
            velocity_px_s: None,
        }
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let mut cfg = FollowerSection::default();
        cfg.profile = "not_a_profile".to_string();
        assert!(matches!(Follower::from_section(&cfg), Err(FollowerError::UnknownProfile(_))));
    }

    #[test]
    fn every_known_profile_constructs() {
        for profile in [
            "velocity_baseline",
            "velocity_chase",
            "velocity_ground",
            "velocity_distance",
            "velocity_position",
            "attitude_rate_mc",
            "attitude_rate_fw",
            "gimbal_pid_pursuit",
            "gimbal_velocity_vector",
        ] {
            let mut cfg = FollowerSection::default();
            cfg.profile = profile.to_string();
            let follower = Follower::from_section(&cfg).unwrap();
            assert_eq!(follower.profile_name(), profile);
        }
    }

    #[test]
    fn attitude_profiles_use_attitude_rate_control_type() {
        let mut cfg = FollowerSection::default();
        cfg.profile = "attitude_rate_mc".to_string();
        let follower = Follower::from_section(&cfg).unwrap();
        assert_eq!(follower.control_type(), ControlType::AttitudeRate);
    }

    #[test]
    fn target_loss_fires_once_after_a_valid_command() {
        let mut cfg = FollowerSection::default();
        cfg.target_loss_action = "hover".to_string();
        let mut follower = Follower::from_section(&cfg).unwrap();
        follower.calculate_command(&output(), &Telemetry::default(), 0.05);
        let first = follower.on_target_loss(Duration::from_millis(600));
        let second = follower.on_target_loss(Duration::from_millis(700));
        assert_eq!(first, SetpointCommand::neutral(ControlType::BodyVelocity));
        assert_eq!(second, SetpointCommand::neutral(ControlType::BodyVelocity));
    }
}
