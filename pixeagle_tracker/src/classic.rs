//! Classic single-object tracker: a correlation-filter-class algorithm.
//! The exact kernel isn't prescribed upstream, so this implements the
//! simplest member of that family — normalized cross-correlation of a
//! fixed template against a search window around the last known position,
//! using `ndarray` for the patch arithmetic. Good enough to exercise the
//! `Tracker` contract; swapping in a faster kernel later doesn't change
//! any caller.

use ndarray::Array2;

use pixeagle_common::detection::BoundingBox;
use pixeagle_common::frame::{Frame, PixelFormat};
use pixeagle_common::tracking::{TrackerOutput, TrackingState};

use crate::error::TrackerError;
use crate::roi::validate_roi;

/// How far beyond the current roi (in pixels, each direction) the next
/// search window extends. Bounds the per-frame cost and caps how fast the
/// target can move and still be found.
const SEARCH_MARGIN_PX: i32 = 24;

/// Below this correlation score the tracker reports zero confidence rather
/// than a low-confidence position, since a patch this different is more
/// likely noise than drift.
const MIN_USABLE_SCORE: f32 = 0.05;

fn pixel_gray(frame: &Frame, x: u32, y: u32) -> f32 {
    let idx = (y * frame.width + x) as usize;
    match frame.format {
        PixelFormat::Gray8 => frame.data.get(idx).copied().unwrap_or(0) as f32,
        PixelFormat::Bgr8 | PixelFormat::Rgb8 => {
            let base = idx * 3;
            let (a, b, c) = (
                frame.data.get(base).copied().unwrap_or(0) as f32,
                frame.data.get(base + 1).copied().unwrap_or(0) as f32,
                frame.data.get(base + 2).copied().unwrap_or(0) as f32,
            );
            (a + b + c) / 3.0
        }
        PixelFormat::Nv12 => frame.data.get(idx).copied().unwrap_or(0) as f32,
    }
}

fn extract_patch(frame: &Frame, x0: i32, y0: i32, width: u32, height: u32) -> Array2<f32> {
    let mut patch = Array2::<f32>::zeros((height as usize, width as usize));
    for row in 0..height {
        for col in 0..width {
            let sx = x0 + col as i32;
            let sy = y0 + row as i32;
            let value = if sx >= 0 && sy >= 0 && (sx as u32) < frame.width && (sy as u32) < frame.height {
                pixel_gray(frame, sx as u32, sy as u32)
            } else {
                0.0
            };
            patch[(row as usize, col as usize)] = value;
        }
    }
    patch
}

/// Normalized cross-correlation in `[-1, 1]`, clamped to `[0, 1]` by the
/// caller since a tracker confidence below zero carries no extra meaning.
fn normalized_cross_correlation(a: &Array2<f32>, b: &Array2<f32>) -> f32 {
    let a_mean = a.mean().unwrap_or(0.0);
    let b_mean = b.mean().unwrap_or(0.0);
    let a_centered = a.mapv(|v| v - a_mean);
    let b_centered = b.mapv(|v| v - b_mean);

    let numerator = (&a_centered * &b_centered).sum();
    let denom = (a_centered.mapv(|v| v * v).sum().sqrt()) * (b_centered.mapv(|v| v * v).sum().sqrt());
    if denom <= f32::EPSILON {
        0.0
    } else {
        numerator / denom
    }
}

pub struct ClassicTracker {
    template: Array2<f32>,
    roi: BoundingBox,
    confidence: f32,
    initialized: bool,
}

impl ClassicTracker {
    pub fn new() -> Self {
        Self {
            template: Array2::zeros((0, 0)),
            roi: BoundingBox {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            },
            confidence: 0.0,
            initialized: false,
        }
    }

    pub fn start(&mut self, frame: &Frame, roi: BoundingBox) -> Result<(), TrackerError> {
        validate_roi(&roi, frame.width, frame.height)?;
        self.template = extract_patch(frame, roi.x as i32, roi.y as i32, roi.width as u32, roi.height as u32);
        self.roi = roi;
        self.confidence = 1.0;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Slide the template over a search window around the last known roi
    /// and report the best-matching offset as the new position.
    pub fn update(&mut self, frame: &Frame) -> TrackerOutput {
        if !self.initialized {
            return TrackerOutput::idle(frame.sequence);
        }

        let (w, h) = (self.roi.width as u32, self.roi.height as u32);
        let base_x = self.roi.x as i32;
        let base_y = self.roi.y as i32;

        let mut best_score = f32::NEG_INFINITY;
        let mut best_offset = (0i32, 0i32);
        for dy in -SEARCH_MARGIN_PX..=SEARCH_MARGIN_PX {
            for dx in -SEARCH_MARGIN_PX..=SEARCH_MARGIN_PX {
                let patch = extract_patch(frame, base_x + dx, base_y + dy, w, h);
                let score = normalized_cross_correlation(&self.template, &patch);
                if score > best_score {
                    best_score = score;
                    best_offset = (dx, dy);
                }
            }
        }

        let score = best_score.clamp(0.0, 1.0);
        self.confidence = score;

        if score < MIN_USABLE_SCORE {
            return TrackerOutput {
                track_id: Some(0),
                bbox: None,
                position_2d: None,
                confidence: 0.0,
                state: TrackingState::Lost,
                frame_sequence: frame.sequence,
                velocity_px_s: None,
            };
        }

        self.roi.x = (base_x + best_offset.0) as f32;
        self.roi.y = (base_y + best_offset.1) as f32;

        TrackerOutput {
            track_id: Some(0),
            bbox: Some(self.roi),
            position_2d: Some(TrackerOutput::normalized_position(&self.roi, frame.width, frame.height)),
            confidence: self.confidence,
            state: TrackingState::Tracking,
            frame_sequence: frame.sequence,
            velocity_px_s: Some((best_offset.0 as f32, best_offset.1 as f32)),
        }
    }
}

impl Default for ClassicTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(sequence: u64, width: u32, height: u32, value: u8) -> Frame {
        Frame::new(sequence, 0, width, height, PixelFormat::Gray8, vec![value; (width * height) as usize])
    }

    fn checkerboard_frame(sequence: u64, width: u32, height: u32) -> Frame {
        let mut data = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                data[(y * width + x) as usize] = if (x / 4 + y / 4) % 2 == 0 { 20 } else { 220 };
            }
        }
        Frame::new(sequence, 0, width, height, PixelFormat::Gray8, data)
    }

    #[test]
    fn update_before_start_returns_idle() {
        let mut tracker = ClassicTracker::new();
        let frame = solid_frame(0, 64, 64, 100);
        assert_eq!(tracker.update(&frame).state, TrackingState::Idle);
    }

    #[test]
    fn stationary_target_keeps_high_confidence_and_position() {
        let frame = checkerboard_frame(0, 64, 64);
        let roi = BoundingBox {
            x: 16.0,
            y: 16.0,
            width: 16.0,
            height: 16.0,
        };
        let mut tracker = ClassicTracker::new();
        tracker.start(&frame, roi).unwrap();

        let output = tracker.update(&frame);
        assert_eq!(output.state, TrackingState::Tracking);
        assert!(output.confidence > 0.9);
        assert_eq!(output.bbox.unwrap().x, 16.0);
    }

    #[test]
    fn blank_frame_after_textured_start_is_reported_as_lost() {
        let start_frame = checkerboard_frame(0, 64, 64);
        let roi = BoundingBox {
            x: 16.0,
            y: 16.0,
            width: 16.0,
            height: 16.0,
        };
        let mut tracker = ClassicTracker::new();
        tracker.start(&start_frame, roi).unwrap();

        let blank_frame = solid_frame(1, 64, 64, 128);
        let output = tracker.update(&blank_frame);
        assert_eq!(output.state, TrackingState::Lost);
    }
}
