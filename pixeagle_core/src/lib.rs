//! Wires the vision, tracking, following, safety, config and transport
//! crates into the `AppController` pipeline and task set `spec.md` §4-§5
//! describe, the same role the teacher's `evo_control_unit` crate plays
//! for its own per-cycle read/process/write loop.
//!
//! # Module Structure
//!
//! - [`config_handle`] - `ConfigHandle`, the Config task's shared `ConfigStore` ownership
//! - [`cycle`] - `CycleStats`/`TickClock`, O(1) per-tick timing and fixed-period pacing
//! - [`controller`] - `AppController`, the seven-step per-tick pipeline
//! - [`tasks`] - Capture/Inference/Control/Transport task wiring
//! - [`health`] - `HealthSnapshot` construction from per-subsystem state
//! - [`error`] - `CoreError`

pub mod config_handle;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod health;
pub mod tasks;

pub use config_handle::ConfigHandle;
pub use controller::{AppController, TickOutput};
pub use error::CoreError;
pub use tasks::{spawn, Runtime};
