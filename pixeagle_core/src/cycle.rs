//! Fixed-period Control task pacing and O(1) per-tick timing stats.
//!
//! Grounded on `evo_control_unit::cycle::CycleStats`: same running
//! min/max/sum/sum-of-squares accumulators, no allocation on the hot path.
//! The absolute-time sleep loop is adapted from the teacher's
//! `clock_nanosleep(TIMER_ABSTIME)` cadence to `std::thread::sleep` against a
//! monotonically advancing deadline, since the Control task here runs on a
//! plain OS thread rather than under an RT scheduler.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Monotonic nanosecond clock shared by the Control and Transport tasks, so
/// a dispatched command's age can be compared against `cmd_max_age_ms`
/// regardless of which thread computed which timestamp. Not wall-clock
/// time — only valid for comparisons within one process run.
pub fn now_ns() -> u64 {
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// O(1) per-tick timing statistics. Updated once per control tick.
#[derive(Debug, Clone)]
pub struct CycleStats {
    pub cycle_count: u64,
    pub last_cycle_ns: i64,
    pub min_cycle_ns: i64,
    pub max_cycle_ns: i64,
    pub sum_cycle_ns: i64,
    pub sum_sq_cycle_ns: i128,
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            sum_sq_cycle_ns: 0,
            overruns: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, duration: Duration, budget: Duration) {
        let duration_ns = duration.as_nanos() as i64;
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        if duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.sum_cycle_ns += duration_ns;
        self.sum_sq_cycle_ns += (duration_ns as i128) * (duration_ns as i128);
        if duration > budget {
            self.overruns += 1;
        }
    }

    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the Control task at a fixed period against a monotonic deadline,
/// so tick spacing does not drift from accumulated per-tick jitter.
pub struct TickClock {
    period: Duration,
    next_deadline: Instant,
    stats: CycleStats,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: Instant::now() + period,
            stats: CycleStats::new(),
        }
    }

    /// Block until the next tick boundary, returning the actual duration
    /// since the previous tick finished, and record it. Call once per
    /// iteration of the Control task's loop, at the end of the tick body.
    pub fn wait_for_next_tick(&mut self, tick_started_at: Instant) -> Duration {
        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
        }
        let elapsed = tick_started_at.elapsed();
        self.stats.record(elapsed, self.period);
        self.next_deadline += self.period;
        if self.next_deadline < Instant::now() {
            // Fell behind by more than one period; resync instead of firing
            // a burst of immediately-expired ticks.
            self.next_deadline = Instant::now() + self.period;
        }
        elapsed
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_min_max_and_overruns() {
        let mut stats = CycleStats::new();
        stats.record(Duration::from_millis(10), Duration::from_millis(50));
        stats.record(Duration::from_millis(60), Duration::from_millis(50));
        stats.record(Duration::from_millis(30), Duration::from_millis(50));
        assert_eq!(stats.cycle_count, 3);
        assert_eq!(stats.overruns, 1);
        assert_eq!(stats.min_cycle_ns, 10_000_000);
        assert_eq!(stats.max_cycle_ns, 60_000_000);
        assert_eq!(stats.avg_cycle_ns(), (10 + 60 + 30) * 1_000_000 / 3);
    }

    #[test]
    fn avg_is_zero_before_any_cycle() {
        assert_eq!(CycleStats::new().avg_cycle_ns(), 0);
    }

    #[test]
    fn tick_clock_paces_to_the_configured_period() {
        let period = Duration::from_millis(20);
        let mut clock = TickClock::new(period);
        let start = Instant::now();
        clock.wait_for_next_tick(start);
        let elapsed = clock.wait_for_next_tick(Instant::now());
        assert!(elapsed < Duration::from_millis(5));
        assert_eq!(clock.stats().cycle_count, 2);
    }
}
