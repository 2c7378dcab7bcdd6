//! PID controller with backward Euler integration, derivative filter (Tf),
//! and anti-windup via back-calculation (Tt).
//!
//! Zero Ki disables integral; zero Kd disables derivative.

/// Internal state of one PID loop.
///
/// Preserves the integral accumulator and filtered derivative across
/// cycles. Must be reset via [`PidState::reset`] when a follower is
/// suppressed and later resumes, so the resumed command doesn't inherit a
/// stale integral built up while the loop was idle.
#[derive(Debug, Clone, Copy)]
pub struct PidState {
    integral: f64,
    prev_error: f64,
    derivative_filtered: f64,
    prev_raw_output: f64,
}

impl Default for PidState {
    fn default() -> Self {
        Self {
            integral: 0.0,
            prev_error: 0.0,
            derivative_filtered: 0.0,
            prev_raw_output: 0.0,
        }
    }
}

impl PidState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }
}

/// PID gains for one loop.
#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    pub kp: f64,
    /// Integral gain (0 = disabled).
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    pub kd: f64,
    /// Derivative filter time constant \[s\] (0 = unfiltered).
    pub tf: f64,
    /// Anti-windup tracking time constant \[s\] (0 = disabled).
    pub tt: f64,
    /// Output saturation bound used only for the anti-windup correction —
    /// the caller applies the real safety clamp separately.
    pub out_max: f64,
}

/// Compute one PID cycle using backward Euler integration. Returns the
/// unsaturated output; clamping happens downstream in `SafetyManager`.
#[inline]
pub fn pid_compute(state: &mut PidState, gains: &PidGains, error: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }

    let p_term = gains.kp * error;

    let i_term = if gains.ki != 0.0 {
        let anti_windup = if gains.tt > 0.0 && gains.out_max > 0.0 {
            let saturated = state.prev_raw_output.clamp(-gains.out_max, gains.out_max);
            (saturated - state.prev_raw_output) / gains.tt
        } else {
            0.0
        };
        state.integral += (gains.ki * error + anti_windup) * dt;
        state.integral
    } else {
        state.integral = 0.0;
        0.0
    };

    let d_term = if gains.kd != 0.0 {
        let raw_derivative = (error - state.prev_error) / dt;
        if gains.tf > 0.0 {
            let alpha = dt / (gains.tf + dt);
            state.derivative_filtered += alpha * (raw_derivative - state.derivative_filtered);
            gains.kd * state.derivative_filtered
        } else {
            gains.kd * raw_derivative
        }
    } else {
        state.derivative_filtered = 0.0;
        0.0
    };

    state.prev_error = error;

    let raw_output = p_term + i_term + d_term;
    state.prev_raw_output = raw_output;
    raw_output
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.05; // 20 Hz control rate

    fn gains_p_only(kp: f64) -> PidGains {
        PidGains {
            kp,
            ki: 0.0,
            kd: 0.0,
            tf: 0.0,
            tt: 0.0,
            out_max: 100.0,
        }
    }

    #[test]
    fn pure_proportional() {
        let mut s = PidState::default();
        let g = gains_p_only(10.0);
        let out = pid_compute(&mut s, &g, 1.0, DT);
        assert!((out - 10.0).abs() < 1e-12);
    }

    #[test]
    fn zero_gains_produce_zero() {
        let mut s = PidState::default();
        let g = gains_p_only(0.0);
        assert!((pid_compute(&mut s, &g, 5.0, DT)).abs() < 1e-12);
    }

    #[test]
    fn integral_accumulates() {
        let mut s = PidState::default();
        let g = PidGains {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
            tf: 0.0,
            tt: 0.0,
            out_max: 100.0,
        };
        for _ in 0..10 {
            pid_compute(&mut s, &g, 1.0, DT);
        }
        assert!((s.integral() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn derivative_responds_to_error_change() {
        let mut s = PidState::default();
        let g = PidGains {
            kp: 0.0,
            ki: 0.0,
            kd: 1.0,
            tf: 0.0,
            tt: 0.0,
            out_max: 100.0,
        };
        let out1 = pid_compute(&mut s, &g, 0.0, DT);
        assert!((out1).abs() < 1e-12);
        let out2 = pid_compute(&mut s, &g, 1.0, DT);
        assert!((out2 - 1.0 / DT).abs() < 1e-8);
    }

    #[test]
    fn anti_windup_limits_integral_growth() {
        let mut s = PidState::default();
        let g = PidGains {
            kp: 1.0,
            ki: 10.0,
            kd: 0.0,
            tf: 0.0,
            tt: 0.05,
            out_max: 5.0,
        };
        for _ in 0..2000 {
            pid_compute(&mut s, &g, 50.0, DT);
        }
        // Without anti-windup: integral = 10 * 50 * 0.05 * 2000 = 50_000.
        assert!(s.integral().abs() < 5_000.0);
    }

    #[test]
    fn reset_clears_state() {
        let mut s = PidState::default();
        let g = PidGains {
            kp: 1.0,
            ki: 1.0,
            kd: 1.0,
            tf: 0.05,
            tt: 0.05,
            out_max: 100.0,
        };
        for _ in 0..20 {
            pid_compute(&mut s, &g, 5.0, DT);
        }
        assert!(s.integral().abs() > 0.0);
        s.reset();
        assert_eq!(s.integral(), 0.0);
    }

    #[test]
    fn zero_dt_returns_zero() {
        let mut s = PidState::default();
        let g = gains_p_only(10.0);
        assert_eq!(pid_compute(&mut s, &g, 5.0, 0.0), 0.0);
    }
}
