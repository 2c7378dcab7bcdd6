//! Captured video frame representation.

use serde::{Deserialize, Serialize};

/// Pixel format of a [`Frame`]'s buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Bgr8,
    Rgb8,
    Gray8,
    Nv12,
}

/// A single frame pulled from a [`VideoSource`](https://docs.rs/pixeagle_video) backend.
///
/// `timestamp_ns` is monotonic within one video source session; it is never
/// reset backwards across a reopen, matching the spec's monotonic-timestamp
/// invariant.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub timestamp_ns: u64,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(
        sequence: u64,
        timestamp_ns: u64,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Self {
        Self {
            sequence,
            timestamp_ns,
            width,
            height,
            format,
            data,
        }
    }

    /// Age of this frame relative to `now_ns`, saturating at zero.
    pub fn age_ns(&self, now_ns: u64) -> u64 {
        now_ns.saturating_sub(self.timestamp_ns)
    }
}
