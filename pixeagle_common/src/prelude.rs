//! Convenience re-exports: `use pixeagle_common::prelude::*;`

pub use crate::capability::TrackerCapability;
pub use crate::detection::{BoundingBox, Detection};
pub use crate::frame::{Frame, PixelFormat};
pub use crate::health::{HealthSnapshot, SubsystemHealth, SubsystemStatus};
pub use crate::param::{ParameterMetadata, ReloadTier};
pub use crate::safety::{RateLimits, SafetyAction, SafetyLimits, VelocityLimits};
pub use crate::setpoint::{ControlType, SetpointCommand, SetpointError};
pub use crate::slot::LatestWinsSlot;
pub use crate::telemetry::Telemetry;
pub use crate::tracking::{TrackerOutput, TrackingState};
