//! Detection-to-track association: IoU plus a motion-predicted offset, with
//! an optional embedding-distance tie-break when both sides carry one.
//! Greedy best-match-first, the simplest member of the association family
//! `bytetrack`-style trackers belong to.

use pixeagle_common::detection::{BoundingBox, Detection};

/// Below this combined score a detection is treated as unmatched rather
/// than forced onto the closest track.
pub const MIN_ASSOCIATION_SCORE: f32 = 0.1;

fn predicted_bbox(last: &BoundingBox, velocity: (f32, f32)) -> BoundingBox {
    BoundingBox {
        x: last.x + velocity.0,
        y: last.y + velocity.1,
        width: last.width,
        height: last.height,
    }
}

fn embedding_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// One existing track's state, as seen by the association step.
pub struct TrackCandidate<'a> {
    pub index: usize,
    pub last_bbox: &'a BoundingBox,
    pub velocity: (f32, f32),
    pub embedding: Option<&'a [f32]>,
}

/// Score a detection against a track: IoU of the motion-predicted box with
/// the detection, plus an embedding similarity bonus when both sides have
/// one. Weighted so IoU alone already produces a usable score — embeddings
/// only break ties, they don't override a geometrically implausible match.
pub fn association_score(track: &TrackCandidate, detection: &Detection) -> f32 {
    let predicted = predicted_bbox(track.last_bbox, track.velocity);
    let iou = predicted.iou(&detection.bbox);

    let embedding_bonus = match (track.embedding, detection.embedding.as_deref()) {
        (Some(a), Some(b)) => 0.2 * embedding_similarity(a, b).max(0.0),
        _ => 0.0,
    };

    iou + embedding_bonus
}

/// Greedily assign each detection to at most one track, highest score
/// first. Returns `(track_index, detection_index)` pairs; any detection or
/// track left unmatched is the caller's responsibility (new track / missed
/// frame respectively).
pub fn associate(tracks: &[TrackCandidate], detections: &[Detection]) -> Vec<(usize, usize)> {
    let mut scored = Vec::new();
    for track in tracks {
        for (d_idx, detection) in detections.iter().enumerate() {
            let score = association_score(track, detection);
            if score >= MIN_ASSOCIATION_SCORE {
                scored.push((score, track.index, d_idx));
            }
        }
    }
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut matched_tracks = std::collections::HashSet::new();
    let mut matched_detections = std::collections::HashSet::new();
    let mut assignments = Vec::new();
    for (_, t_idx, d_idx) in scored {
        if matched_tracks.contains(&t_idx) || matched_detections.contains(&d_idx) {
            continue;
        }
        matched_tracks.insert(t_idx);
        matched_detections.insert(d_idx);
        assignments.push((t_idx, d_idx));
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: f32, y: f32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width: 20.0,
            height: 20.0,
        }
    }

    fn detection(x: f32, y: f32) -> Detection {
        Detection {
            bbox: bbox(x, y),
            confidence: 0.9,
            class_id: 0,
            class_name: "target".to_string(),
            mask: None,
            embedding: None,
        }
    }

    #[test]
    fn stationary_track_matches_overlapping_detection() {
        let last = bbox(10.0, 10.0);
        let track = TrackCandidate {
            index: 0,
            last_bbox: &last,
            velocity: (0.0, 0.0),
            embedding: None,
        };
        let detections = vec![detection(11.0, 9.0)];
        let assignments = associate(std::slice::from_ref(&track), &detections);
        assert_eq!(assignments, vec![(0, 0)]);
    }

    #[test]
    fn far_away_detection_is_left_unmatched() {
        let last = bbox(10.0, 10.0);
        let track = TrackCandidate {
            index: 0,
            last_bbox: &last,
            velocity: (0.0, 0.0),
            embedding: None,
        };
        let detections = vec![detection(500.0, 500.0)];
        assert!(associate(std::slice::from_ref(&track), &detections).is_empty());
    }

    #[test]
    fn motion_prediction_follows_a_moving_target() {
        let last = bbox(0.0, 0.0);
        let track = TrackCandidate {
            index: 0,
            last_bbox: &last,
            velocity: (20.0, 0.0),
            embedding: None,
        };
        // detection has moved exactly where the motion model predicts
        let detections = vec![detection(20.0, 0.0)];
        let assignments = associate(std::slice::from_ref(&track), &detections);
        assert_eq!(assignments, vec![(0, 0)]);
    }

    #[test]
    fn two_tracks_claim_disjoint_detections() {
        let last_a = bbox(0.0, 0.0);
        let last_b = bbox(200.0, 200.0);
        let track_a = TrackCandidate {
            index: 0,
            last_bbox: &last_a,
            velocity: (0.0, 0.0),
            embedding: None,
        };
        let track_b = TrackCandidate {
            index: 1,
            last_bbox: &last_b,
            velocity: (0.0, 0.0),
            embedding: None,
        };
        let detections = vec![detection(1.0, 1.0), detection(201.0, 201.0)];
        let mut assignments = associate(&[track_a, track_b], &detections);
        assignments.sort();
        assert_eq!(assignments, vec![(0, 0), (1, 1)]);
    }
}
