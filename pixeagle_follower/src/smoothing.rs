//! Optional exponential moving average applied to a follower's raw output
//! before it reaches `SafetyManager::clamp`, so the safety envelope always
//! bounds the value actually dispatched regardless of smoothing state.

#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
    value: Option<f32>,
}

impl Ema {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: None,
        }
    }

    pub fn update(&mut self, sample: f32) -> f32 {
        let next = match self.value {
            Some(prev) => prev + self.alpha * (sample - prev),
            None => sample,
        };
        self.value = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_passes_through_unchanged() {
        let mut ema = Ema::new(0.3);
        assert_eq!(ema.update(10.0), 10.0);
    }

    #[test]
    fn converges_toward_a_constant_input() {
        let mut ema = Ema::new(0.5);
        ema.update(0.0);
        for _ in 0..20 {
            ema.update(10.0);
        }
        assert!((ema.update(10.0) - 10.0).abs() < 0.01);
    }

    #[test]
    fn reset_drops_to_pass_through_again() {
        let mut ema = Ema::new(0.5);
        ema.update(10.0);
        ema.reset();
        assert_eq!(ema.update(3.0), 3.0);
    }
}
