//! `TrackerOutput` schema and the tracking-confidence state enum.

use serde::{Deserialize, Serialize};

use crate::detection::BoundingBox;

/// State reported by the `TrackingStateManager`, driving `FollowerManager`'s
/// forwarding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TrackingState {
    Idle = 0,
    Acquiring = 1,
    Tracking = 2,
    Drifting = 3,
    Lost = 4,
    Reacquiring = 5,
}

impl TrackingState {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Acquiring),
            2 => Some(Self::Tracking),
            3 => Some(Self::Drifting),
            4 => Some(Self::Lost),
            5 => Some(Self::Reacquiring),
            _ => None,
        }
    }

    /// Whether a follower is permitted to forward setpoints while in this state.
    pub const fn allows_follow(&self) -> bool {
        matches!(self, Self::Tracking | Self::Drifting)
    }
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Per-frame output of the active tracker, published to the control task.
///
/// Field set is closed: consumers must not assume additional fields will
/// ever be added without a schema version bump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerOutput {
    pub track_id: Option<u64>,
    pub bbox: Option<BoundingBox>,
    /// Bbox center normalized to `[-1, 1] x [-1, 1]` against frame
    /// dimensions, center `(0, 0)`, independent of capture resolution —
    /// what followers actually consume.
    pub position_2d: Option<(f32, f32)>,
    pub confidence: f32,
    pub state: TrackingState,
    /// Frame sequence number this output was computed from.
    pub frame_sequence: u64,
    /// Velocity of the bbox center in pixels/second, when motion prediction
    /// is available.
    pub velocity_px_s: Option<(f32, f32)>,
}

impl TrackerOutput {
    pub fn idle(frame_sequence: u64) -> Self {
        Self {
            track_id: None,
            bbox: None,
            position_2d: None,
            confidence: 0.0,
            state: TrackingState::Idle,
            frame_sequence,
            velocity_px_s: None,
        }
    }

    /// Normalize `bbox`'s center against `(frame_width, frame_height)` into
    /// `[-1, 1] x [-1, 1]`, frame center at `(0, 0)`.
    pub fn normalized_position(bbox: &BoundingBox, frame_width: u32, frame_height: u32) -> (f32, f32) {
        let (cx, cy) = bbox.center();
        let x = (cx / frame_width.max(1) as f32) * 2.0 - 1.0;
        let y = (cy / frame_height.max(1) as f32) * 2.0 - 1.0;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_roundtrips_all_variants() {
        for s in [
            TrackingState::Idle,
            TrackingState::Acquiring,
            TrackingState::Tracking,
            TrackingState::Drifting,
            TrackingState::Lost,
            TrackingState::Reacquiring,
        ] {
            assert_eq!(TrackingState::from_u8(s as u8), Some(s));
        }
    }

    #[test]
    fn from_u8_rejects_out_of_range() {
        assert_eq!(TrackingState::from_u8(200), None);
    }

    #[test]
    fn only_tracking_and_drifting_allow_follow() {
        assert!(TrackingState::Tracking.allows_follow());
        assert!(TrackingState::Drifting.allows_follow());
        assert!(!TrackingState::Lost.allows_follow());
        assert!(!TrackingState::Idle.allows_follow());
        assert!(!TrackingState::Acquiring.allows_follow());
        assert!(!TrackingState::Reacquiring.allows_follow());
    }

    #[test]
    fn normalized_position_centers_on_zero_zero() {
        let centered = BoundingBox { x: 270.0, y: 190.0, width: 100.0, height: 100.0 };
        let (x, y) = TrackerOutput::normalized_position(&centered, 640, 480);
        assert!((x).abs() < 1e-5);
        assert!((y).abs() < 1e-5);
    }

    #[test]
    fn normalized_position_spans_minus_one_to_one() {
        let top_left = BoundingBox { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
        assert_eq!(TrackerOutput::normalized_position(&top_left, 640, 480), (-1.0, -1.0));

        let bottom_right = BoundingBox { x: 640.0, y: 480.0, width: 0.0, height: 0.0 };
        assert_eq!(TrackerOutput::normalized_position(&bottom_right, 640, 480), (1.0, 1.0));
    }
}
