//! `SafetyManager`: velocity/rate/altitude envelope enforcement shared by
//! every follower.
//!
//! # Module Structure
//!
//! - [`limits`] - per-follower sparse limit overrides
//! - [`manager`] - `SafetyManager`, `SafetyContext`

pub mod limits;
pub mod manager;

pub use limits::{LimitOverride, OverrideTable};
pub use manager::{SafetyContext, SafetyManager};
