//! Synthetic backend used for `simulation://` URIs and in tests. Generates
//! frames of solid gray noise-free content at a fixed resolution; nothing
//! about its pixel content is meaningful, only its timing and sequencing.

use std::sync::OnceLock;
use std::time::Instant;

use pixeagle_common::frame::{Frame, PixelFormat};

use crate::backend::VideoBackend;
use crate::error::VideoError;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Real monotonic nanoseconds since this backend's first use, so a
/// simulated frame's `timestamp_ns` is comparable against the same
/// wall-clock basis a real capture backend would report, not a synthetic
/// per-frame counter.
fn monotonic_ns() -> u64 {
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

pub struct SimulationVideoBackend {
    sequence: u64,
    opened: bool,
}

impl SimulationVideoBackend {
    pub fn new() -> Self {
        Self {
            sequence: 0,
            opened: false,
        }
    }
}

impl Default for SimulationVideoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoBackend for SimulationVideoBackend {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn open(&mut self, _uri: &str) -> Result<(), VideoError> {
        self.opened = true;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, VideoError> {
        if !self.opened {
            return Err(VideoError::ReadFailed("backend not opened".to_string()));
        }
        let data = vec![128u8; (WIDTH * HEIGHT) as usize];
        let frame = Frame::new(self.sequence, monotonic_ns(), WIDTH, HEIGHT, PixelFormat::Gray8, data);
        self.sequence += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_before_open_fails() {
        let mut backend = SimulationVideoBackend::new();
        assert!(backend.read_frame().is_err());
    }

    #[test]
    fn frames_have_increasing_sequence() {
        let mut backend = SimulationVideoBackend::new();
        backend.open("simulation://").unwrap();
        let a = backend.read_frame().unwrap();
        let b = backend.read_frame().unwrap();
        assert_eq!(b.sequence, a.sequence + 1);
    }
}
