//! Error type for the autopilot transport layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("backend '{0}' is not registered")]
    BackendNotFound(String),

    #[error("failed to connect to '{address}': {detail}")]
    ConnectFailed { address: String, detail: String },

    #[error("not connected")]
    Disconnected,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("command stamped {age_ms}ms ago exceeds cmd_max_age_ms of {max_age_ms}ms, dropped")]
    CommandTooStale { age_ms: u64, max_age_ms: u64 },

    #[error("telemetry has been stale for {stale_ms}ms, refusing to enter offboard")]
    TelemetryStale { stale_ms: u64 },
}
