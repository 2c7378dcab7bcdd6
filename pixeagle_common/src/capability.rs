//! `TrackerCapability` bitflags: the compatibility contract between a
//! tracker instance and the follower profile `FollowerManager` is about to
//! switch to.
//!
//! Generalizes the teacher's bitflag error-state pattern
//! (`evo_common::control_unit::error::{PowerError, MotionError, ...}`) from
//! "which faults are currently latched" to "which optional `TrackerOutput`
//! fields can this tracker instance actually populate" — a follower declares
//! the subset it requires, and `FollowerManager::switch` rejects a profile
//! whose requirements aren't a subset of what the active tracker declares.

use bitflags::bitflags;

bitflags! {
    /// Which optional [`crate::tracking::TrackerOutput`] fields a tracker
    /// instance is able to populate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrackerCapability: u8 {
        /// `position_2d` is populated.
        const POSITION_2D = 0x01;
        /// `bbox` is populated.
        const BBOX        = 0x02;
        /// `velocity_px_s` is populated (motion prediction available).
        const VELOCITY    = 0x04;
        /// Tracker maintains more than one concurrent track id.
        const MULTI_TARGET = 0x08;
    }
}

impl Default for TrackerCapability {
    fn default() -> Self {
        Self::empty()
    }
}
