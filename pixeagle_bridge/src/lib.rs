//! `AutopilotBridge`: translates a [`pixeagle_common::setpoint::SetpointCommand`]
//! into the appropriate MAVLink offboard message family and writes it via an
//! async connection, while maintaining an always-fresh telemetry cache the
//! rest of the pipeline reads without blocking.
//!
//! # Module Structure
//!
//! - [`backend`] - `BridgeBackend` trait every transport implementation satisfies
//! - [`registry`] - `BridgeBackendRegistry`, constructor-injected, no global state
//! - [`mavlink_backend`] - real MAVLink offboard transport
//! - [`simulation`] - loopback backend for tests and the no-autopilot path
//! - [`bridge`] - `AutopilotBridge`, the transport task's handle
//! - [`error`] - `BridgeError`

pub mod backend;
pub mod bridge;
pub mod error;
pub mod mavlink_backend;
pub mod registry;
pub mod simulation;

pub use backend::{BridgeBackend, BridgeBackendFactory};
pub use bridge::AutopilotBridge;
pub use error::BridgeError;
pub use registry::{default_registry, BridgeBackendRegistry};

pub use pixeagle_common::telemetry::Telemetry;
