//! Shared types for the PixEagle runtime.
//!
//! This crate provides the schema types, parameter metadata, and the
//! cross-task concurrency primitive used by every other crate in the
//! workspace.
//!
//! # Module Structure
//!
//! - [`frame`] - captured video frame representation
//! - [`detection`] - detector output
//! - [`tracking`] - `TrackerOutput` and `TrackingState`
//! - [`capability`] - `TrackerCapability` bitflags, the tracker/follower compatibility contract
//! - [`setpoint`] - `SetpointCommand` schema
//! - [`safety`] - `SafetyLimits` and safety check results
//! - [`telemetry`] - `Telemetry`, shared between `pixeagle_bridge` and every follower
//! - [`param`] - `ParameterMetadata` and reload tiers
//! - [`slot`] - `LatestWinsSlot<T>`
//! - [`health`] - per-subsystem health snapshot
//! - [`prelude`] - common re-exports
//!
//! # Usage
//!
//! ```rust
//! use pixeagle_common::prelude::*;
//! ```

pub mod capability;
pub mod detection;
pub mod frame;
pub mod health;
pub mod param;
pub mod prelude;
pub mod safety;
pub mod setpoint;
pub mod slot;
pub mod telemetry;
pub mod tracking;
