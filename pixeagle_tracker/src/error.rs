//! Error type for the tracker layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("roi is degenerate or smaller than the minimum trackable size")]
    InvalidRoi,

    #[error("roi ({x}, {y}, {w}x{h}) does not fit inside a {frame_w}x{frame_h} frame")]
    RoiOutsideFrame {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        frame_w: u32,
        frame_h: u32,
    },

    #[error("unknown tracker variant '{0}'")]
    UnknownVariant(String),

    #[error("track {0} does not exist")]
    UnknownTrack(u64),

    #[error("no point in ({0}, {1}) falls inside any active track")]
    NoTrackAtPoint(f32, f32),
}
