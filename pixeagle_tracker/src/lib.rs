//! Tracker family and `TrackingStateManager`.
//!
//! # Module Structure
//!
//! - [`roi`] - region-of-interest validation shared by `Tracker::start`
//! - [`classic`] - correlation-filter-class single-object tracker
//! - [`association`] - IoU/motion/embedding detection-to-track scoring
//! - [`smart`] - detector-driven multi-object tracker with click/select
//! - [`tracker`] - `Tracker`, the contract both families satisfy
//! - [`state`] - `TrackingStateManager`, tracker-agnostic confidence/timeout machine

pub mod association;
pub mod classic;
pub mod error;
pub mod roi;
pub mod smart;
pub mod state;
pub mod tracker;

pub use error::TrackerError;
pub use smart::AssociationVariant;
pub use state::{TrackingEvent, TrackingStateManager, TransitionResult};
pub use tracker::Tracker;
