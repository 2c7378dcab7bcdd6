//! Detector output types.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Intersection-over-union with another box.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let (ax0, ay0, ax1, ay1) = (self.x, self.y, self.x + self.width, self.y + self.height);
        let (bx0, by0, bx1, by1) = (
            other.x,
            other.y,
            other.x + other.width,
            other.y + other.height,
        );

        let ix0 = ax0.max(bx0);
        let iy0 = ay0.max(by0);
        let ix1 = ax1.min(bx1);
        let iy1 = ay1.min(by1);

        let inter_w = (ix1 - ix0).max(0.0);
        let inter_h = (iy1 - iy0).max(0.0);
        let inter = inter_w * inter_h;

        let union = self.width * self.height + other.width * other.height - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// One object proposal returned by a detector backend for a single frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: u32,
    pub class_name: String,
    /// Optional per-pixel segmentation mask, row-major, same size as `bbox`.
    pub mask: Option<Vec<u8>>,
    /// Optional appearance embedding, present when the active model supports
    /// re-identification association.
    pub embedding: Option<Vec<f32>>,
}
