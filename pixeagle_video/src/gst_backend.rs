//! GStreamer-backed capture for every URI scheme that isn't handled by a
//! more specialized backend: `file://`, `rtsp://`, `udp://`, `http://`, and
//! raw `pipeline://<gst-launch description>` for advanced setups.
//!
//! Frames are pulled from a named `appsink` rather than received via the
//! signal-based callback API, so `read_frame` can stay a plain blocking call
//! driven by the video task's own loop instead of a GLib main context.

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;

use pixeagle_common::frame::{Frame, PixelFormat};

use crate::error::VideoError;
use crate::backend::VideoBackend;

const PULL_TIMEOUT: gst::ClockTime = gst::ClockTime::from_seconds(2);

fn pipeline_description_for(uri: &str) -> Result<String, VideoError> {
    if let Some(raw) = uri.strip_prefix("pipeline://") {
        return Ok(format!("{raw} ! appsink name=sink sync=false"));
    }
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(format!(
            "filesrc location={path} ! decodebin ! videoconvert ! video/x-raw,format=BGR ! appsink name=sink sync=false"
        ));
    }
    if uri.starts_with("rtsp://") {
        return Ok(format!(
            "rtspsrc location={uri} latency=200 ! decodebin ! videoconvert ! video/x-raw,format=BGR ! appsink name=sink sync=false"
        ));
    }
    if uri.starts_with("udp://") {
        return Ok(format!(
            "udpsrc uri={uri} ! application/x-rtp ! rtpjitterbuffer ! decodebin ! videoconvert ! video/x-raw,format=BGR ! appsink name=sink sync=false"
        ));
    }
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(format!(
            "souphttpsrc location={uri} ! decodebin ! videoconvert ! video/x-raw,format=BGR ! appsink name=sink sync=false"
        ));
    }
    Err(VideoError::UnsupportedScheme(uri.to_string()))
}

fn gst_format_to_pixel_format(format: gst_video::VideoFormat) -> Option<PixelFormat> {
    match format {
        gst_video::VideoFormat::Bgr => Some(PixelFormat::Bgr8),
        gst_video::VideoFormat::Rgb => Some(PixelFormat::Rgb8),
        gst_video::VideoFormat::Gray8 => Some(PixelFormat::Gray8),
        gst_video::VideoFormat::Nv12 => Some(PixelFormat::Nv12),
        _ => None,
    }
}

pub struct GstVideoBackend {
    pipeline: Option<gst::Pipeline>,
    appsink: Option<gst_app::AppSink>,
    sequence: u64,
}

impl GstVideoBackend {
    pub fn new() -> Self {
        Self {
            pipeline: None,
            appsink: None,
            sequence: 0,
        }
    }

    fn teardown(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            let _ = pipeline.set_state(gst::State::Null);
        }
        self.appsink = None;
    }
}

impl Default for GstVideoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoBackend for GstVideoBackend {
    fn name(&self) -> &'static str {
        "gstreamer"
    }

    fn open(&mut self, uri: &str) -> Result<(), VideoError> {
        self.teardown();

        gst::init().map_err(|e| VideoError::OpenFailed {
            uri: uri.to_string(),
            detail: e.to_string(),
        })?;

        let description = pipeline_description_for(uri)?;
        let element = gst::parse::launch(&description).map_err(|e| VideoError::OpenFailed {
            uri: uri.to_string(),
            detail: e.to_string(),
        })?;
        let pipeline = element
            .downcast::<gst::Pipeline>()
            .map_err(|_| VideoError::OpenFailed {
                uri: uri.to_string(),
                detail: "parsed element is not a pipeline".to_string(),
            })?;

        let sink = pipeline
            .by_name("sink")
            .ok_or_else(|| VideoError::OpenFailed {
                uri: uri.to_string(),
                detail: "pipeline has no element named 'sink'".to_string(),
            })?;
        let appsink = sink
            .downcast::<gst_app::AppSink>()
            .map_err(|_| VideoError::OpenFailed {
                uri: uri.to_string(),
                detail: "'sink' element is not an appsink".to_string(),
            })?;
        appsink.set_property("emit-signals", false);

        pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| VideoError::OpenFailed {
                uri: uri.to_string(),
                detail: e.to_string(),
            })?;

        self.sequence = 0;
        self.pipeline = Some(pipeline);
        self.appsink = Some(appsink);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, VideoError> {
        let appsink = self
            .appsink
            .as_ref()
            .ok_or_else(|| VideoError::ReadFailed("backend not opened".to_string()))?;

        let sample = appsink
            .try_pull_sample(PULL_TIMEOUT)
            .ok_or_else(|| VideoError::ReadFailed("no sample within pull timeout".to_string()))?;

        let caps = sample
            .caps()
            .ok_or_else(|| VideoError::ReadFailed("sample has no caps".to_string()))?;
        let info = gst_video::VideoInfo::from_caps(caps)
            .map_err(|e| VideoError::ReadFailed(e.to_string()))?;
        let format = gst_format_to_pixel_format(info.format())
            .ok_or_else(|| VideoError::ReadFailed(format!("unsupported gst format {:?}", info.format())))?;

        let buffer = sample
            .buffer()
            .ok_or_else(|| VideoError::ReadFailed("sample has no buffer".to_string()))?;
        let map = buffer
            .map_readable()
            .map_err(|e| VideoError::ReadFailed(e.to_string()))?;
        let data = map.as_slice().to_vec();
        let pts_ns = buffer.pts().map(|t| t.nseconds()).unwrap_or(0);

        let frame = Frame::new(
            self.sequence,
            pts_ns,
            info.width(),
            info.height(),
            format,
            data,
        );
        self.sequence += 1;
        Ok(frame)
    }
}

impl Drop for GstVideoBackend {
    fn drop(&mut self) {
        self.teardown();
    }
}
