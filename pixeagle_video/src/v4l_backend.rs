//! `usb://` capture via Video4Linux2, for cameras exposed as `/dev/videoN`.
//!
//! Requests MJPEG from the device and decodes each frame through `image`
//! rather than wiring up the raw YUYV/NV12 planes V4L2 devices usually offer
//! natively — every device in practice supports MJPEG, and decoding once
//! here means the rest of the pipeline only ever deals in [`PixelFormat::Rgb8`].

use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use pixeagle_common::frame::{Frame, PixelFormat};

use crate::backend::VideoBackend;
use crate::error::VideoError;

const TARGET_FOURCC: &[u8; 4] = b"MJPG";
const STREAM_BUFFER_COUNT: u32 = 4;

fn parse_device(uri: &str) -> Result<String, VideoError> {
    let rest = uri.strip_prefix("usb://").ok_or_else(|| VideoError::OpenFailed {
        uri: uri.to_string(),
        detail: "expected usb:// scheme".to_string(),
    })?;
    if rest.starts_with('/') {
        return Ok(rest.to_string());
    }
    let index: usize = rest.parse().map_err(|_| VideoError::OpenFailed {
        uri: uri.to_string(),
        detail: "usb:// URI must be a device index or an absolute device path".to_string(),
    })?;
    Ok(format!("/dev/video{index}"))
}

pub struct V4lVideoBackend {
    // `Stream` borrows from `Device`; leaking the device onto a 'static
    // reference is what lets the two live together in one struct field set
    // instead of a self-referential type. Each reopen leaks a new handle and
    // drops the stream pointing at the old one — bounded by `reopen_attempts`,
    // never by an unbounded loop, so the leak rate is tied to reopen budget.
    device: Option<&'static Device>,
    stream: Option<Stream<'static>>,
    sequence: u64,
}

impl V4lVideoBackend {
    pub fn new() -> Self {
        Self {
            device: None,
            stream: None,
            sequence: 0,
        }
    }
}

impl Default for V4lVideoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoBackend for V4lVideoBackend {
    fn name(&self) -> &'static str {
        "v4l"
    }

    fn open(&mut self, uri: &str) -> Result<(), VideoError> {
        // Drop the old stream before leaking a new device handle, so a
        // reopen releases the previous file descriptor immediately.
        self.stream = None;
        self.device = None;

        let path = parse_device(uri)?;
        let device = Device::with_path(&path).map_err(|e| VideoError::OpenFailed {
            uri: uri.to_string(),
            detail: e.to_string(),
        })?;
        let device: &'static Device = Box::leak(Box::new(device));

        let mut format = Capture::format(device).map_err(|e| VideoError::OpenFailed {
            uri: uri.to_string(),
            detail: e.to_string(),
        })?;
        format.fourcc = FourCC::new(TARGET_FOURCC);
        Capture::set_format(device, &format).map_err(|e| VideoError::OpenFailed {
            uri: uri.to_string(),
            detail: e.to_string(),
        })?;

        let stream = Stream::with_buffers(device, Type::VideoCapture, STREAM_BUFFER_COUNT)
            .map_err(|e| VideoError::OpenFailed {
                uri: uri.to_string(),
                detail: e.to_string(),
            })?;

        self.device = Some(device);
        self.stream = Some(stream);
        self.sequence = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, VideoError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| VideoError::ReadFailed("backend not opened".to_string()))?;

        let (buffer, _meta) = stream
            .next()
            .map_err(|e| VideoError::ReadFailed(e.to_string()))?;

        let decoded = image::load_from_memory(buffer)
            .map_err(|e| VideoError::ReadFailed(format!("MJPEG decode failed: {e}")))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();

        let frame = Frame::new(
            self.sequence,
            0,
            width,
            height,
            PixelFormat::Rgb8,
            decoded.into_raw(),
        );
        self.sequence += 1;
        Ok(frame)
    }
}
