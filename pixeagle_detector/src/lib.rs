//! Pluggable, model-backed object detector. [`Detector`] wraps a
//! [`backend::DetectorBackend`] with skip-frame/degrade policy and a model
//! directory ([`model::ModelRegistry`]) supporting hot model swap.
//!
//! # Module Structure
//!
//! - [`backend`] - the `DetectorBackend` trait every detector implementation satisfies
//! - [`registry`] - `DetectorBackendRegistry`, constructor-injected, no global state
//! - [`simulation`] - scripted backend for tests
//! - [`model`] - model directory: list/upload/delete/download
//! - [`detector`] - `Detector`, the inference task's handle
//! - [`options`] - per-call `DetectOptions`

pub mod backend;
pub mod detector;
pub mod error;
pub mod model;
pub mod options;
pub mod registry;
pub mod simulation;

pub use backend::{DetectorBackend, DetectorBackendFactory};
pub use detector::Detector;
pub use error::DetectorError;
pub use model::{ModelInfo, ModelRegistry};
pub use options::DetectOptions;
pub use registry::{default_registry, DetectorBackendRegistry};
