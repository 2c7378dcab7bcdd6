//! `SetpointHandler`: the narrow seam between a follower's raw output and
//! the wire-facing [`SetpointCommand`] schema. Enforces that the field set
//! a command carries is exactly the one its `control_type` requires, and
//! maps a field name to the safety-limit name that bounds it.

use pixeagle_common::setpoint::{ControlType, SetpointCommand};

use crate::error::FollowerError;

pub struct SetpointHandler;

impl SetpointHandler {
    /// Validate `cmd` against its own control-type schema. Missing fields
    /// are never a problem — [`SetpointCommand::neutral`] already defaults
    /// them — only a non-neutral value on a field the control type doesn't
    /// own is rejected.
    pub fn finalize(cmd: SetpointCommand) -> Result<SetpointCommand, FollowerError> {
        cmd.validate()?;
        Ok(cmd)
    }

    /// Safety-limit name bounding `field`, `None` if the field is unbounded
    /// (e.g. `thrust`, which is clamped to `[0, 1]` by the caller instead).
    pub fn limit_name_for(field: &str) -> Option<&'static str> {
        ControlType::limit_name_for(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_command_finalizes_cleanly() {
        let cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        assert!(SetpointHandler::finalize(cmd).is_ok());
    }

    #[test]
    fn stray_field_is_rejected_at_finalize() {
        let mut cmd = SetpointCommand::neutral(ControlType::BodyVelocity);
        cmd.thrust = 1.0;
        assert!(SetpointHandler::finalize(cmd).is_err());
    }

    #[test]
    fn limit_name_delegates_to_control_type() {
        assert_eq!(SetpointHandler::limit_name_for("vz"), Some("velocity.vertical"));
    }
}
