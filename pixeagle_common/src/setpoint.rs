//! `SetpointCommand` schema and its field-set enforcement.
//!
//! A `SetpointCommand` always carries every field defined on the struct, but
//! only the fields named by its `control_type` are semantically meaningful;
//! the rest are defined to the neutral value. This mirrors the MAVLink
//! offboard message families themselves, which are fixed-width wire structs
//! with a type mask selecting which fields the autopilot should honor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selects which MAVLink offboard message family a [`SetpointCommand`] maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    /// Body-frame velocity setpoint (`SET_POSITION_TARGET_LOCAL_NED` velocity fields).
    BodyVelocity,
    /// Attitude + thrust / attitude-rate setpoint (`SET_ATTITUDE_TARGET`).
    AttitudeRate,
}

impl ControlType {
    /// Names of the fields this control type requires to be meaningful, used
    /// both for documentation and for [`SetpointCommand::validate`].
    pub const fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::BodyVelocity => &["vx", "vy", "vz", "yaw_rate"],
            Self::AttitudeRate => &["roll_rate", "pitch_rate", "yaw_rate", "thrust"],
        }
    }

    /// Name of the [`crate::safety::SafetyLimits`] field that bounds a given
    /// setpoint field, used by `SafetyManager::clamp`. Forward/lateral and
    /// yaw/pitch/roll each map to their own distinct limit.
    pub fn limit_name_for(field: &str) -> Option<&'static str> {
        match field {
            "vx" => Some("velocity.forward"),
            "vy" => Some("velocity.lateral"),
            "vz" => Some("velocity.vertical"),
            "roll_rate" => Some("rate.roll"),
            "pitch_rate" => Some("rate.pitch"),
            "yaw_rate" => Some("rate.yaw"),
            "thrust" => None,
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SetpointError {
    #[error("field '{0}' is not part of control type {1:?}'s schema")]
    UnknownField(String, ControlType),
}

/// A fully-populated setpoint ready for dispatch to `AutopilotBridge`.
///
/// Fields not named by `control_type` are left at their neutral default
/// (`0.0`) rather than omitted, so the struct has one fixed shape regardless
/// of which control law produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetpointCommand {
    pub control_type: ControlType,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub roll_rate: f32,
    pub pitch_rate: f32,
    pub yaw_rate: f32,
    pub thrust: f32,
}

impl SetpointCommand {
    pub fn neutral(control_type: ControlType) -> Self {
        Self {
            control_type,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            roll_rate: 0.0,
            pitch_rate: 0.0,
            yaw_rate: 0.0,
            thrust: 0.0,
        }
    }

    /// Rejects a command that sets a non-neutral value on a field outside
    /// its own `control_type`'s schema, since such a field would silently be
    /// ignored by whichever MAVLink message family is actually sent.
    pub fn validate(&self) -> Result<(), SetpointError> {
        let allowed = self.control_type.field_names();
        let all = ["vx", "vy", "vz", "roll_rate", "pitch_rate", "yaw_rate", "thrust"];
        for field in all {
            if allowed.contains(&field) {
                continue;
            }
            let value = self.field_value(field);
            if value != 0.0 {
                return Err(SetpointError::UnknownField(field.to_string(), self.control_type));
            }
        }
        Ok(())
    }

    fn field_value(&self, field: &str) -> f32 {
        match field {
            "vx" => self.vx,
            "vy" => self.vy,
            "vz" => self.vz,
            "roll_rate" => self.roll_rate,
            "pitch_rate" => self.pitch_rate,
            "yaw_rate" => self.yaw_rate,
            "thrust" => self.thrust,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_passes_validation_for_every_control_type() {
        assert!(SetpointCommand::neutral(ControlType::BodyVelocity).validate().is_ok());
        assert!(SetpointCommand::neutral(ControlType::AttitudeRate).validate().is_ok());
    }

    #[test]
    fn stray_field_outside_schema_is_rejected() {
        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.thrust = 0.5;
        assert_eq!(
            cmd.validate(),
            Err(SetpointError::UnknownField("thrust".into(), ControlType::BodyVelocity))
        );
    }

    #[test]
    fn yaw_rate_is_shared_by_both_control_types() {
        let mut cmd = SetpointCommand::neutral(ControlType::AttitudeRate);
        cmd.yaw_rate = 1.0;
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn limit_name_maps_velocity_fields_correctly() {
        assert_eq!(ControlType::limit_name_for("vx"), Some("velocity.forward"));
        assert_eq!(ControlType::limit_name_for("vy"), Some("velocity.lateral"));
        assert_eq!(ControlType::limit_name_for("vz"), Some("velocity.vertical"));
        assert_eq!(ControlType::limit_name_for("thrust"), None);
    }

    #[test]
    fn limit_name_maps_rate_fields_independently() {
        assert_eq!(ControlType::limit_name_for("yaw_rate"), Some("rate.yaw"));
        assert_eq!(ControlType::limit_name_for("pitch_rate"), Some("rate.pitch"));
        assert_eq!(ControlType::limit_name_for("roll_rate"), Some("rate.roll"));
    }
}
