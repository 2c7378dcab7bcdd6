//! Error type for the follower layer.

use pixeagle_common::capability::TrackerCapability;
use pixeagle_common::setpoint::SetpointError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FollowerError {
    #[error("unknown follower profile '{0}'")]
    UnknownProfile(String),

    #[error("profile requires tracker capabilities {required:?}, active tracker only provides {available:?}")]
    CapabilityMismatch {
        required: TrackerCapability,
        available: TrackerCapability,
    },

    #[error("setpoint command violates its own control-type schema: {0}")]
    InvalidSetpoint(#[from] SetpointError),
}
