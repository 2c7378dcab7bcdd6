//! Profile 4: velocity distance. Maintains a desired standoff, estimating
//! distance from the tracked bbox's apparent size when no 3D estimate is
//! available.

use pixeagle_common::detection::BoundingBox;
use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::TrackerOutput;
use pixeagle_config::sections::FollowerSection;

use crate::controllers::position_or_center;
use crate::controllers::velocity_baseline::pid_gains;
use crate::pid::{pid_compute, PidGains, PidState};

pub struct VelocityDistance {
    standoff_m: f32,
    reference_bbox_height_px: f32,
    reference_distance_m: f32,
    gains: PidGains,
    longitudinal: PidState,
    lateral: PidState,
    vertical: PidState,
}

impl VelocityDistance {
    pub fn new(cfg: &FollowerSection) -> Self {
        Self {
            standoff_m: cfg.distance_standoff_m,
            reference_bbox_height_px: cfg.distance_reference_bbox_height_px,
            reference_distance_m: cfg.distance_reference_distance_m,
            gains: pid_gains(cfg),
            longitudinal: PidState::default(),
            lateral: PidState::default(),
            vertical: PidState::default(),
        }
    }

    /// Inverse-proportional distance estimate from apparent bbox height: a
    /// target twice as far appears half as tall.
    fn estimate_distance_m(&self, bbox: Option<&BoundingBox>) -> f32 {
        match bbox {
            Some(bbox) if bbox.height > 0.0 => {
                self.reference_distance_m * (self.reference_bbox_height_px / bbox.height)
            }
            _ => self.standoff_m,
        }
    }

    pub fn calculate_command(&mut self, output: &TrackerOutput, _telemetry: &Telemetry, dt: f64) -> SetpointCommand {
        let (x, y) = position_or_center(output.position_2d);
        let error_x = x as f64;
        let error_y = y as f64;

        let estimated_distance = self.estimate_distance_m(output.bbox.as_ref());
        let distance_error = (estimated_distance - self.standoff_m) as f64;

        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.vx = pid_compute(&mut self.longitudinal, &self.gains, distance_error, dt) as f32;
        cmd.vy = pid_compute(&mut self.lateral, &self.gains, error_x, dt) as f32;
        cmd.vz = pid_compute(&mut self.vertical, &self.gains, error_y, dt) as f32;
        cmd
    }
}
