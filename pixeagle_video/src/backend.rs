//! The backend trait every capture implementation satisfies.

use pixeagle_common::frame::Frame;

use crate::error::VideoError;

/// A single capture backend, e.g. a GStreamer pipeline or a V4L2 device.
///
/// `open` and `read_frame` are split so [`VideoSource`](crate::source::VideoSource)
/// can reopen a stalled backend without discarding the `Box<dyn VideoBackend>`
/// it already holds — backends are constructed once per factory call and
/// reopened in place.
pub trait VideoBackend: Send {
    fn name(&self) -> &'static str;

    /// Open or reopen `uri`. Called once at first use and again on every
    /// reopen attempt after a stall.
    fn open(&mut self, uri: &str) -> Result<(), VideoError>;

    /// Pull the next frame. A backend that has no frame ready yet should
    /// block up to its own internal timeout and return
    /// [`VideoError::ReadFailed`] rather than spin.
    fn read_frame(&mut self) -> Result<Frame, VideoError>;
}

pub type VideoBackendFactory = fn() -> Box<dyn VideoBackend>;
