//! Smart multi-object tracker: detector-driven association into persistent
//! tracks with strictly monotonic ids, `click`/`select` to choose which
//! track feeds the control loop, and a bounded per-track history ring for
//! occlusion bridging.

use std::collections::VecDeque;

use pixeagle_common::detection::{BoundingBox, Detection};
use pixeagle_common::frame::Frame;
use pixeagle_common::tracking::{TrackerOutput, TrackingState};

use crate::association::{associate, TrackCandidate};
use crate::error::TrackerError;

/// Association inputs a configured smart-tracker instance uses. Mirrors
/// `spec.md`'s three smart-tracker variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationVariant {
    MotionOnly,
    MotionEmbedding,
    MotionReid,
}

struct Track {
    id: u64,
    bbox: BoundingBox,
    velocity: (f32, f32),
    confidence: f32,
    embedding: Option<Vec<f32>>,
    history: VecDeque<BoundingBox>,
    missed_frames: u32,
}

/// Consecutive missed frames after which a track is dropped rather than
/// kept waiting for the detector to re-find it.
const MAX_MISSED_FRAMES: u32 = 10;

pub struct SmartTracker {
    variant: AssociationVariant,
    track_history_len: usize,
    tracks: Vec<Track>,
    next_id: u64,
    selected: Option<u64>,
    last_timestamp_ns: u64,
}

impl SmartTracker {
    pub fn new(variant: AssociationVariant, track_history_len: usize) -> Self {
        Self {
            variant,
            track_history_len: track_history_len.max(1),
            tracks: Vec::new(),
            next_id: 1,
            selected: None,
            last_timestamp_ns: 0,
        }
    }

    fn dt_seconds(&self, frame: &Frame) -> f32 {
        if frame.timestamp_ns <= self.last_timestamp_ns {
            return 0.0;
        }
        (frame.timestamp_ns - self.last_timestamp_ns) as f32 / 1_000_000_000.0
    }

    /// Lock onto whichever active track's bbox contains `(x, y)`.
    pub fn click(&mut self, x: f32, y: f32) -> Option<u64> {
        let hit = self.tracks.iter().find(|t| {
            x >= t.bbox.x && x <= t.bbox.x + t.bbox.width && y >= t.bbox.y && y <= t.bbox.y + t.bbox.height
        })?;
        self.selected = Some(hit.id);
        Some(hit.id)
    }

    pub fn select(&mut self, track_id: u64) -> Result<(), TrackerError> {
        if self.tracks.iter().any(|t| t.id == track_id) {
            self.selected = Some(track_id);
            Ok(())
        } else {
            Err(TrackerError::UnknownTrack(track_id))
        }
    }

    pub fn selected_track_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn active_track_ids(&self) -> Vec<u64> {
        self.tracks.iter().map(|t| t.id).collect()
    }

    /// Feed the latest detector output into association, age out stale
    /// tracks, spawn new ones for unmatched detections, and report the
    /// selected track's output (or the newest track if nothing is selected
    /// yet, matching "first detection auto-selects" UX convention).
    pub fn update(&mut self, frame: &Frame, detections: &[Detection]) -> TrackerOutput {
        let dt = self.dt_seconds(frame);
        self.last_timestamp_ns = frame.timestamp_ns.max(self.last_timestamp_ns);

        let candidates: Vec<TrackCandidate> = self
            .tracks
            .iter()
            .enumerate()
            .map(|(index, t)| TrackCandidate {
                index,
                last_bbox: &t.bbox,
                velocity: t.velocity,
                embedding: match self.variant {
                    AssociationVariant::MotionOnly => None,
                    AssociationVariant::MotionEmbedding | AssociationVariant::MotionReid => {
                        t.embedding.as_deref()
                    }
                },
            })
            .collect();

        let assignments = associate(&candidates, detections);
        let matched_tracks: std::collections::HashSet<usize> = assignments.iter().map(|(t, _)| *t).collect();
        let matched_detections: std::collections::HashSet<usize> = assignments.iter().map(|(_, d)| *d).collect();

        for (t_idx, d_idx) in &assignments {
            let detection = &detections[*d_idx];
            let track = &mut self.tracks[*t_idx];
            let (old_cx, old_cy) = track.bbox.center();
            let (new_cx, new_cy) = detection.bbox.center();
            track.velocity = if dt > 0.0 {
                ((new_cx - old_cx) / dt, (new_cy - old_cy) / dt)
            } else {
                (0.0, 0.0)
            };
            track.bbox = detection.bbox;
            track.confidence = detection.confidence;
            track.embedding = detection.embedding.clone();
            track.missed_frames = 0;
            if track.history.len() >= self.track_history_len {
                track.history.pop_front();
            }
            track.history.push_back(track.bbox);
        }

        for (idx, track) in self.tracks.iter_mut().enumerate() {
            if !matched_tracks.contains(&idx) {
                track.missed_frames += 1;
            }
        }
        self.tracks.retain(|t| t.missed_frames <= MAX_MISSED_FRAMES);

        for (d_idx, detection) in detections.iter().enumerate() {
            if matched_detections.contains(&d_idx) {
                continue;
            }
            let id = self.next_id;
            self.next_id += 1;
            let mut history = VecDeque::with_capacity(self.track_history_len);
            history.push_back(detection.bbox);
            self.tracks.push(Track {
                id,
                bbox: detection.bbox,
                velocity: (0.0, 0.0),
                confidence: detection.confidence,
                embedding: detection.embedding.clone(),
                history,
                missed_frames: 0,
            });
            if self.selected.is_none() {
                self.selected = Some(id);
            }
        }

        self.output_for_selected(frame)
    }

    fn output_for_selected(&self, frame: &Frame) -> TrackerOutput {
        let Some(selected_id) = self.selected else {
            return TrackerOutput::idle(frame.sequence);
        };
        let Some(track) = self.tracks.iter().find(|t| t.id == selected_id) else {
            return TrackerOutput {
                track_id: Some(selected_id),
                bbox: None,
                position_2d: None,
                confidence: 0.0,
                state: TrackingState::Lost,
                frame_sequence: frame.sequence,
                velocity_px_s: None,
            };
        };
        let state = if track.missed_frames == 0 {
            TrackingState::Tracking
        } else {
            TrackingState::Drifting
        };
        TrackerOutput {
            track_id: Some(track.id),
            bbox: Some(track.bbox),
            position_2d: Some(TrackerOutput::normalized_position(&track.bbox, frame.width, frame.height)),
            confidence: track.confidence,
            state,
            frame_sequence: frame.sequence,
            velocity_px_s: Some(track.velocity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::frame::PixelFormat;

    fn frame(sequence: u64, timestamp_ns: u64) -> Frame {
        Frame::new(sequence, timestamp_ns, 640, 480, PixelFormat::Gray8, vec![])
    }

    fn detection(x: f32, y: f32) -> Detection {
        Detection {
            bbox: BoundingBox {
                x,
                y,
                width: 20.0,
                height: 20.0,
            },
            confidence: 0.8,
            class_id: 0,
            class_name: "target".to_string(),
            mask: None,
            embedding: None,
        }
    }

    #[test]
    fn first_detection_auto_selects_a_new_track() {
        let mut tracker = SmartTracker::new(AssociationVariant::MotionOnly, 15);
        let output = tracker.update(&frame(0, 0), &[detection(10.0, 10.0)]);
        assert_eq!(output.state, TrackingState::Tracking);
        assert!(output.track_id.is_some());
    }

    #[test]
    fn click_selects_track_under_point() {
        let mut tracker = SmartTracker::new(AssociationVariant::MotionOnly, 15);
        tracker.update(&frame(0, 0), &[detection(10.0, 10.0), detection(300.0, 300.0)]);
        let hit = tracker.click(305.0, 305.0);
        assert!(hit.is_some());
        assert_eq!(tracker.selected_track_id(), hit);
    }

    #[test]
    fn selecting_unknown_track_is_an_error() {
        let mut tracker = SmartTracker::new(AssociationVariant::MotionOnly, 15);
        assert!(matches!(tracker.select(999), Err(TrackerError::UnknownTrack(999))));
    }

    #[test]
    fn track_drifts_then_is_dropped_after_too_many_missed_frames() {
        let mut tracker = SmartTracker::new(AssociationVariant::MotionOnly, 15);
        tracker.update(&frame(0, 0), &[detection(10.0, 10.0)]);
        let mut last_state = TrackingState::Idle;
        for seq in 1..=(MAX_MISSED_FRAMES + 2) {
            let output = tracker.update(&frame(seq as u64, seq as u64 * 10_000_000), &[]);
            last_state = output.state;
        }
        assert_eq!(last_state, TrackingState::Lost);
    }

    #[test]
    fn continuous_detections_keep_tracking_state() {
        let mut tracker = SmartTracker::new(AssociationVariant::MotionOnly, 15);
        tracker.update(&frame(0, 0), &[detection(10.0, 10.0)]);
        let output = tracker.update(&frame(1, 33_000_000), &[detection(12.0, 9.0)]);
        assert_eq!(output.state, TrackingState::Tracking);
    }
}
