//! `VideoSource`: the capture task's handle on a backend, adding stall
//! detection, bounded reopen attempts with backoff, and monotonic
//! per-session frame timestamps/sequencing on top of whatever the raw
//! backend reports.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use pixeagle_common::frame::Frame;
use pixeagle_config::sections::VideoSection;

use crate::backend::VideoBackend;
use crate::error::VideoError;
use crate::registry::VideoBackendRegistry;

/// Map a URI scheme onto the backend name it is served by.
pub fn scheme_to_backend(uri: &str) -> Result<&'static str, VideoError> {
    let scheme = uri.split("://").next().unwrap_or("");
    match scheme {
        "simulation" => Ok("simulation"),
        "usb" => Ok("v4l"),
        "file" | "rtsp" | "udp" | "http" | "https" | "pipeline" => Ok("gstreamer"),
        other => Err(VideoError::UnsupportedScheme(other.to_string())),
    }
}

/// Populate a registry with the three shipped backends. Call sites that
/// need a custom or test-only backend set can build a [`VideoBackendRegistry`]
/// by hand instead.
pub fn default_registry() -> VideoBackendRegistry {
    let mut registry = VideoBackendRegistry::new();
    registry.register("simulation", || Box::new(crate::simulation::SimulationVideoBackend::new()));
    registry.register("gstreamer", || Box::new(crate::gst_backend::GstVideoBackend::new()));
    registry.register("v4l", || Box::new(crate::v4l_backend::V4lVideoBackend::new()));
    registry
}

pub struct VideoSource {
    registry: VideoBackendRegistry,
    backend: Box<dyn VideoBackend>,
    uri: String,
    stall_timeout: Duration,
    reopen_attempts: u32,
    reopen_backoff: Duration,
    last_frame_at: Instant,
    session_sequence: u64,
    last_timestamp_ns: u64,
    terminal: bool,
}

impl VideoSource {
    pub fn new(section: &VideoSection, registry: VideoBackendRegistry) -> Result<Self, VideoError> {
        let backend_name = scheme_to_backend(&section.source_uri)?;
        let mut backend = registry.create_backend(backend_name)?;
        backend.open(&section.source_uri)?;

        Ok(Self {
            registry,
            backend,
            uri: section.source_uri.clone(),
            stall_timeout: Duration::from_millis(section.stall_timeout_ms),
            reopen_attempts: section.reopen_attempts,
            reopen_backoff: Duration::from_millis(section.reopen_backoff_ms),
            last_frame_at: Instant::now(),
            session_sequence: 0,
            last_timestamp_ns: 0,
            terminal: false,
        })
    }

    /// Read the next frame, reopening the backend through its reopen budget
    /// on stall or read failure. Once the budget is exhausted this source is
    /// terminal: every subsequent call returns
    /// [`VideoError::ReopenBudgetExhausted`] without attempting I/O.
    pub fn read_frame(&mut self) -> Result<Frame, VideoError> {
        if self.terminal {
            return Err(VideoError::ReopenBudgetExhausted {
                attempts: self.reopen_attempts,
            });
        }

        match self.try_read_once() {
            Ok(frame) => {
                self.last_frame_at = Instant::now();
                Ok(frame)
            }
            Err(err) => self.recover(err),
        }
    }

    fn try_read_once(&mut self) -> Result<Frame, VideoError> {
        if self.last_frame_at.elapsed() > self.stall_timeout {
            return Err(VideoError::StallTimeout);
        }
        let mut raw = self.backend.read_frame()?;
        raw.sequence = self.session_sequence;
        raw.timestamp_ns = raw.timestamp_ns.max(self.last_timestamp_ns + 1);
        self.session_sequence += 1;
        self.last_timestamp_ns = raw.timestamp_ns;
        Ok(raw)
    }

    fn recover(&mut self, cause: VideoError) -> Result<Frame, VideoError> {
        warn!(uri = %self.uri, error = %cause, "video source stalled, attempting reopen");

        for attempt in 1..=self.reopen_attempts {
            thread::sleep(self.reopen_backoff * attempt);
            match self.backend.open(&self.uri) {
                Ok(()) => {
                    info!(uri = %self.uri, attempt, "video source reopened");
                    self.last_frame_at = Instant::now();
                    return self.try_read_once();
                }
                Err(err) => {
                    warn!(uri = %self.uri, attempt, error = %err, "reopen attempt failed");
                }
            }
        }

        self.terminal = true;
        Err(VideoError::ReopenBudgetExhausted {
            attempts: self.reopen_attempts,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn list_available_backends(&self) -> Vec<&'static str> {
        self.registry.list_backends()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(uri: &str) -> VideoSection {
        VideoSection {
            source_uri: uri.to_string(),
            stall_timeout_ms: 2_000,
            reopen_attempts: 2,
            reopen_backoff_ms: 1,
        }
    }

    #[test]
    fn scheme_to_backend_maps_known_schemes() {
        assert_eq!(scheme_to_backend("simulation://").unwrap(), "simulation");
        assert_eq!(scheme_to_backend("usb://0").unwrap(), "v4l");
        assert_eq!(scheme_to_backend("rtsp://host/stream").unwrap(), "gstreamer");
        assert_eq!(scheme_to_backend("pipeline://videotestsrc").unwrap(), "gstreamer");
    }

    #[test]
    fn scheme_to_backend_rejects_unknown_scheme() {
        assert!(matches!(
            scheme_to_backend("ftp://host/file"),
            Err(VideoError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn simulation_source_produces_monotonic_timestamps() {
        let mut source = VideoSource::new(&section("simulation://"), default_registry()).unwrap();
        let a = source.read_frame().unwrap();
        let b = source.read_frame().unwrap();
        assert!(b.timestamp_ns > a.timestamp_ns);
        assert_eq!(b.sequence, a.sequence + 1);
    }

    #[test]
    fn unknown_scheme_fails_at_construction() {
        let result = VideoSource::new(&section("ftp://host"), default_registry());
        assert!(matches!(result, Err(VideoError::UnsupportedScheme(_))));
    }
}
