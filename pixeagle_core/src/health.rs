//! Builds the per-tick [`HealthSnapshot`] `AppController` publishes into a
//! [`LatestWinsSlot`] for the (out-of-scope) dashboard/API layer to read.

use pixeagle_common::health::{HealthSnapshot, SubsystemHealth, SubsystemStatus};

pub fn video_health(is_terminal: bool, stall_elapsed_ms: u64) -> SubsystemHealth {
    SubsystemHealth {
        status: if is_terminal {
            SubsystemStatus::Error
        } else {
            SubsystemStatus::Connected
        },
        stale_ms: stall_elapsed_ms,
        detail: is_terminal.then(|| "reopen budget exhausted".to_string()),
    }
}

pub fn detector_health(active: bool, degraded: bool) -> SubsystemHealth {
    SubsystemHealth {
        status: if !active {
            SubsystemStatus::Connected
        } else if degraded {
            SubsystemStatus::Degraded
        } else {
            SubsystemStatus::Connected
        },
        stale_ms: 0,
        detail: degraded.then(|| "consecutive inference failures".to_string()),
    }
}

pub fn tracker_health(state: pixeagle_common::tracking::TrackingState) -> SubsystemHealth {
    use pixeagle_common::tracking::TrackingState::*;
    SubsystemHealth {
        status: match state {
            Tracking | Acquiring | Idle => SubsystemStatus::Connected,
            Drifting | Reacquiring => SubsystemStatus::Degraded,
            Lost => SubsystemStatus::Error,
        },
        stale_ms: 0,
        detail: None,
    }
}

pub fn bridge_health(is_stale: bool, stale_ms: u64) -> SubsystemHealth {
    SubsystemHealth {
        status: if is_stale {
            SubsystemStatus::Error
        } else {
            SubsystemStatus::Connected
        },
        stale_ms,
        detail: is_stale.then(|| "telemetry stale".to_string()),
    }
}

pub fn snapshot(
    video: SubsystemHealth,
    detector: SubsystemHealth,
    tracker: SubsystemHealth,
    bridge: SubsystemHealth,
) -> HealthSnapshot {
    HealthSnapshot {
        video,
        detector,
        tracker,
        bridge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::tracking::TrackingState;

    #[test]
    fn terminal_video_source_reports_error() {
        assert_eq!(video_health(true, 0).status, SubsystemStatus::Error);
    }

    #[test]
    fn degraded_detector_reports_degraded_when_active() {
        assert_eq!(detector_health(true, true).status, SubsystemStatus::Degraded);
    }

    #[test]
    fn inactive_detector_never_reports_degraded() {
        assert_eq!(detector_health(false, true).status, SubsystemStatus::Connected);
    }

    #[test]
    fn lost_tracking_state_reports_error() {
        assert_eq!(tracker_health(TrackingState::Lost).status, SubsystemStatus::Error);
    }

    #[test]
    fn drifting_tracking_state_reports_degraded() {
        assert_eq!(tracker_health(TrackingState::Drifting).status, SubsystemStatus::Degraded);
    }

    #[test]
    fn stale_bridge_telemetry_reports_error() {
        assert_eq!(bridge_health(true, 5_000).status, SubsystemStatus::Error);
    }
}
