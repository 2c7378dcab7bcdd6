//! Oscillation/divergence guard for adaptive vertical control (velocity
//! chase): disables the adaptive term after `N` EMA-rate sign changes
//! within a sliding window of `W` seconds, re-enabling once the window
//! elapses with no further flips.

use std::time::{Duration, Instant};

pub struct SignChangeDetector {
    disable_after: u32,
    window: Duration,
    last_sign: Option<f32>,
    flip_times: Vec<Instant>,
    disabled_since: Option<Instant>,
}

impl SignChangeDetector {
    pub fn new(disable_after: u32, window: Duration) -> Self {
        Self {
            disable_after: disable_after.max(1),
            window,
            last_sign: None,
            flip_times: Vec::new(),
            disabled_since: None,
        }
    }

    fn prune(&mut self, now: Instant) {
        self.flip_times.retain(|t| now.duration_since(*t) <= self.window);
    }

    /// Feed the latest EMA rate and current time. Returns whether the
    /// adaptive term should currently be active.
    pub fn observe(&mut self, rate: f32, now: Instant) -> bool {
        self.prune(now);

        let sign = if rate > 0.0 {
            Some(1.0)
        } else if rate < 0.0 {
            Some(-1.0)
        } else {
            self.last_sign
        };

        if let (Some(prev), Some(current)) = (self.last_sign, sign) {
            if prev != current {
                self.flip_times.push(now);
            }
        }
        self.last_sign = sign;

        if self.flip_times.len() as u32 >= self.disable_after {
            self.disabled_since = Some(now);
        } else if let Some(since) = self.disabled_since {
            if now.duration_since(since) >= self.window {
                self.disabled_since = None;
                self.flip_times.clear();
            }
        }

        self.disabled_since.is_none()
    }
}
