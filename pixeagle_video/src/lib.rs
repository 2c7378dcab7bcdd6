//! Video capture layer: a [`VideoSource`] selects a [`backend::VideoBackend`]
//! by URI scheme, wraps it with stall detection and bounded reopen retries,
//! and hands the rest of the pipeline monotonically sequenced [`Frame`]s.
//!
//! # Module Structure
//!
//! - [`backend`] - the `VideoBackend` trait every capture implementation satisfies
//! - [`registry`] - `VideoBackendRegistry`, constructor-injected, no global state
//! - [`simulation`] - synthetic backend for `simulation://` and tests
//! - [`gst_backend`] - GStreamer appsink backend for file/rtsp/udp/http/pipeline
//! - [`v4l_backend`] - V4L2 backend for `usb://` device capture
//! - [`source`] - `VideoSource`, the task-facing handle

pub mod backend;
pub mod error;
pub mod gst_backend;
pub mod registry;
pub mod simulation;
pub mod source;
pub mod v4l_backend;

pub use backend::{VideoBackend, VideoBackendFactory};
pub use error::VideoError;
pub use registry::VideoBackendRegistry;
pub use source::{default_registry, scheme_to_backend, VideoSource};

pub use pixeagle_common::frame::Frame;
