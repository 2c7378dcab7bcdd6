//! Error type for `AppController` and task wiring.
//!
//! Manual `Display` rather than a `thiserror` derive: matches
//! `pixeagle_config::error::ConfigError`'s texture, since these variants are
//! matched on exhaustively by the `pixeagle` binary to pick an exit code, not
//! surfaced to a human directly.

#[derive(Debug)]
pub enum CoreError {
    Config(pixeagle_config::error::ConfigError),
    Video(pixeagle_video::VideoError),
    Detector(pixeagle_detector::DetectorError),
    Tracker(pixeagle_tracker::TrackerError),
    Follower(pixeagle_follower::FollowerError),
    Bridge(pixeagle_bridge::BridgeError),
    /// The transport task's command channel has been dropped — the transport
    /// task died and the control loop cannot dispatch setpoints.
    TransportChannelClosed,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Video(e) => write!(f, "video error: {e}"),
            Self::Detector(e) => write!(f, "detector error: {e}"),
            Self::Tracker(e) => write!(f, "tracker error: {e}"),
            Self::Follower(e) => write!(f, "follower error: {e}"),
            Self::Bridge(e) => write!(f, "bridge error: {e}"),
            Self::TransportChannelClosed => write!(f, "transport command channel closed"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<pixeagle_config::error::ConfigError> for CoreError {
    fn from(e: pixeagle_config::error::ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<pixeagle_video::VideoError> for CoreError {
    fn from(e: pixeagle_video::VideoError) -> Self {
        Self::Video(e)
    }
}

impl From<pixeagle_detector::DetectorError> for CoreError {
    fn from(e: pixeagle_detector::DetectorError) -> Self {
        Self::Detector(e)
    }
}

impl From<pixeagle_tracker::TrackerError> for CoreError {
    fn from(e: pixeagle_tracker::TrackerError) -> Self {
        Self::Tracker(e)
    }
}

impl From<pixeagle_follower::FollowerError> for CoreError {
    fn from(e: pixeagle_follower::FollowerError) -> Self {
        Self::Follower(e)
    }
}

impl From<pixeagle_bridge::BridgeError> for CoreError {
    fn from(e: pixeagle_bridge::BridgeError) -> Self {
        Self::Bridge(e)
    }
}
