//! `Tracker`: the single contract both tracker families satisfy, selected
//! by `pixeagle_config::sections::TrackerSection::variant`.

use pixeagle_common::capability::TrackerCapability;
use pixeagle_common::detection::{BoundingBox, Detection};
use pixeagle_common::frame::Frame;
use pixeagle_common::tracking::TrackerOutput;

use crate::classic::ClassicTracker;
use crate::error::TrackerError;
use crate::smart::{AssociationVariant, SmartTracker};

pub enum Tracker {
    Classic(ClassicTracker),
    Smart(SmartTracker),
}

impl Tracker {
    pub fn classic() -> Self {
        Self::Classic(ClassicTracker::new())
    }

    pub fn smart(variant: AssociationVariant, track_history_len: usize) -> Self {
        Self::Smart(SmartTracker::new(variant, track_history_len))
    }

    /// Build from a config variant string: `"classic"`, `"smart_motion"`,
    /// `"smart_embedding"`, or `"smart_reid"`.
    pub fn from_variant_name(variant: &str, track_history_len: usize) -> Result<Self, TrackerError> {
        match variant {
            "classic" => Ok(Self::classic()),
            "smart_motion" => Ok(Self::smart(AssociationVariant::MotionOnly, track_history_len)),
            "smart_embedding" => Ok(Self::smart(AssociationVariant::MotionEmbedding, track_history_len)),
            "smart_reid" => Ok(Self::smart(AssociationVariant::MotionReid, track_history_len)),
            other => Err(TrackerError::UnknownVariant(other.to_string())),
        }
    }

    /// Only meaningful for classic trackers; smart trackers start tracks
    /// implicitly from detections.
    pub fn start(&mut self, frame: &Frame, roi: BoundingBox) -> Result<(), TrackerError> {
        match self {
            Self::Classic(tracker) => tracker.start(frame, roi),
            Self::Smart(_) => Ok(()),
        }
    }

    pub fn click(&mut self, x: f32, y: f32) -> Option<u64> {
        match self {
            Self::Classic(_) => None,
            Self::Smart(tracker) => tracker.click(x, y),
        }
    }

    pub fn select(&mut self, track_id: u64) -> Result<(), TrackerError> {
        match self {
            Self::Classic(_) => Err(TrackerError::UnknownTrack(track_id)),
            Self::Smart(tracker) => tracker.select(track_id),
        }
    }

    /// `detections` is ignored by the classic tracker and required (may be
    /// empty) for the smart tracker.
    pub fn update(&mut self, frame: &Frame, detections: &[Detection]) -> TrackerOutput {
        match self {
            Self::Classic(tracker) => tracker.update(frame),
            Self::Smart(tracker) => tracker.update(frame, detections),
        }
    }

    pub fn is_smart(&self) -> bool {
        matches!(self, Self::Smart(_))
    }

    /// Which optional `TrackerOutput` fields this instance can populate,
    /// checked by `FollowerManager::switch` against the incoming profile's
    /// required capabilities.
    pub fn capabilities(&self) -> TrackerCapability {
        match self {
            Self::Classic(_) => TrackerCapability::POSITION_2D | TrackerCapability::BBOX,
            Self::Smart(_) => {
                TrackerCapability::POSITION_2D
                    | TrackerCapability::BBOX
                    | TrackerCapability::VELOCITY
                    | TrackerCapability::MULTI_TARGET
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_name_is_rejected() {
        assert!(matches!(
            Tracker::from_variant_name("not_a_variant", 15),
            Err(TrackerError::UnknownVariant(_))
        ));
    }

    #[test]
    fn classic_variant_constructs_a_classic_tracker() {
        let tracker = Tracker::from_variant_name("classic", 15).unwrap();
        assert!(!tracker.is_smart());
    }

    #[test]
    fn smart_variant_constructs_a_smart_tracker() {
        let tracker = Tracker::from_variant_name("smart_motion", 15).unwrap();
        assert!(tracker.is_smart());
    }

    #[test]
    fn classic_tracker_does_not_declare_multi_target() {
        let tracker = Tracker::classic();
        assert!(!tracker.capabilities().contains(TrackerCapability::MULTI_TARGET));
    }

    #[test]
    fn smart_tracker_declares_velocity_and_multi_target() {
        let tracker = Tracker::smart(AssociationVariant::MotionOnly, 15);
        assert!(tracker.capabilities().contains(TrackerCapability::VELOCITY | TrackerCapability::MULTI_TARGET));
    }
}
