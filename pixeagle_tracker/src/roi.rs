//! Region-of-interest validation shared by every tracker's `start`.

use pixeagle_common::detection::BoundingBox;

use crate::error::TrackerError;

/// Smallest side length, in pixels, a classic tracker will accept. Anything
/// smaller has too few texture gradients for correlation-based matching to
/// stay locked on.
pub const MIN_ROI_SIDE_PX: f32 = 8.0;

pub fn validate_roi(roi: &BoundingBox, frame_width: u32, frame_height: u32) -> Result<(), TrackerError> {
    if roi.width < MIN_ROI_SIDE_PX || roi.height < MIN_ROI_SIDE_PX {
        return Err(TrackerError::InvalidRoi);
    }
    let fits = roi.x >= 0.0
        && roi.y >= 0.0
        && roi.x + roi.width <= frame_width as f32
        && roi.y + roi.height <= frame_height as f32;
    if !fits {
        return Err(TrackerError::RoiOutsideFrame {
            x: roi.x,
            y: roi.y,
            w: roi.width,
            h: roi.height,
            frame_w: frame_width,
            frame_h: frame_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roi_below_minimum_size_is_rejected() {
        let roi = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 2.0,
            height: 2.0,
        };
        assert!(matches!(validate_roi(&roi, 640, 480), Err(TrackerError::InvalidRoi)));
    }

    #[test]
    fn roi_outside_frame_bounds_is_rejected() {
        let roi = BoundingBox {
            x: 600.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        assert!(matches!(
            validate_roi(&roi, 640, 480),
            Err(TrackerError::RoiOutsideFrame { .. })
        ));
    }

    #[test]
    fn well_formed_roi_is_accepted() {
        let roi = BoundingBox {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        };
        assert!(validate_roi(&roi, 640, 480).is_ok());
    }
}
