//! Mount-aware transform for gimbal followers: converts gimbal yaw/pitch
//! into forward/lateral command components, accounting for mount
//! orientation and roll-right sign convention.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOrientation {
    /// Neutral pitch = 90 degrees, roll = 0 degrees.
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollRightSign {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy)]
pub struct MountConfig {
    pub orientation: MountOrientation,
    pub roll_right_sign: RollRightSign,
    pub invert_forward: bool,
    pub invert_lateral: bool,
}

impl MountConfig {
    /// Convert gimbal yaw/pitch (degrees) into `(forward, lateral)`
    /// direction components before a gain is applied.
    pub fn transform(&self, yaw_deg: f32, pitch_deg: f32) -> (f32, f32) {
        let (mut forward, mut lateral) = match self.orientation {
            MountOrientation::Vertical => (pitch_deg - 90.0, yaw_deg),
            MountOrientation::Horizontal => (yaw_deg, pitch_deg),
        };

        let roll_sign = match self.roll_right_sign {
            RollRightSign::Positive => 1.0,
            RollRightSign::Negative => -1.0,
        };
        lateral *= roll_sign;

        if self.invert_forward {
            forward = -forward;
        }
        if self.invert_lateral {
            lateral = -lateral;
        }

        (forward, lateral)
    }
}
