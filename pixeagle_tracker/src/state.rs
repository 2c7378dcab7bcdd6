//! `TrackingStateManager`: tracker-agnostic confidence/timeout state machine.
//! A direct generalization of the machine-lifecycle state machine pattern —
//! an event enum, a `handle_event` match over `(state, event)`, and an
//! outcome type distinguishing an accepted transition from a rejected one.

use pixeagle_common::tracking::TrackingState;

/// Result of a `TrackingStateManager` transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition accepted — current state after the event (may be
    /// unchanged, e.g. another `Update` while still accumulating the
    /// acquire streak).
    Ok(TrackingState),
    /// Transition rejected — reason.
    Rejected(&'static str),
}

/// Event driving a `TrackingStateManager` transition.
#[derive(Debug, Clone, Copy)]
pub enum TrackingEvent {
    /// A valid-size roi was supplied to start tracking.
    Start,
    /// The tracker produced a fresh confidence reading this tick.
    Update { confidence: f32 },
    /// Drift has persisted past `tau_drift` while in `Drifting`.
    DriftTimeout,
    /// The detector found a hit near the last known bbox within `tau_reacq`.
    Redetected,
    /// Operator or supervisor cancel, valid from any state.
    Cancel,
}

pub struct TrackingStateManager {
    state: TrackingState,
    theta_acq: f32,
    theta_track: f32,
    acquire_streak_required: u32,
    acquire_streak: u32,
}

impl TrackingStateManager {
    pub fn new(theta_acq: f32, theta_track: f32, acquire_streak_required: u32) -> Self {
        Self {
            state: TrackingState::Idle,
            theta_acq,
            theta_track,
            acquire_streak_required: acquire_streak_required.max(1),
            acquire_streak: 0,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn handle_event(&mut self, event: TrackingEvent) -> TransitionResult {
        use TrackingEvent::*;
        use TrackingState::*;

        match (self.state, event) {
            (Idle, Start) => {
                self.acquire_streak = 0;
                self.transition(Acquiring)
            }

            (Acquiring, Update { confidence }) => {
                if confidence >= self.theta_acq {
                    self.acquire_streak += 1;
                    if self.acquire_streak >= self.acquire_streak_required {
                        return self.transition(Tracking);
                    }
                } else {
                    self.acquire_streak = 0;
                }
                TransitionResult::Ok(self.state)
            }

            (Tracking, Update { confidence }) => {
                if confidence >= self.theta_track {
                    TransitionResult::Ok(Tracking)
                } else {
                    self.transition(Drifting)
                }
            }

            (Drifting, Update { confidence }) => {
                if confidence >= self.theta_track {
                    self.transition(Tracking)
                } else {
                    TransitionResult::Ok(Drifting)
                }
            }

            (Drifting, DriftTimeout) => self.transition(Lost),

            (Lost, Redetected) => {
                self.acquire_streak = 0;
                self.transition(Reacquiring)
            }

            (Reacquiring, Update { confidence }) => {
                if confidence >= self.theta_acq {
                    self.transition(Tracking)
                } else {
                    TransitionResult::Ok(Reacquiring)
                }
            }

            (_, Cancel) => self.transition(Idle),

            (state, event) => TransitionResult::Rejected(invalid_transition_reason(state, event)),
        }
    }

    fn transition(&mut self, next: TrackingState) -> TransitionResult {
        self.state = next;
        TransitionResult::Ok(next)
    }
}

fn invalid_transition_reason(state: TrackingState, event: TrackingEvent) -> &'static str {
    use TrackingEvent::*;
    use TrackingState::*;
    match (state, event) {
        (Idle, _) => "Idle: only Start is accepted",
        (Acquiring, DriftTimeout | Redetected) => "Acquiring: only Update or Cancel are accepted",
        (Tracking, DriftTimeout | Redetected | Start) => "Tracking: only Update or Cancel are accepted",
        (Drifting, Redetected | Start) => "Drifting: only Update, DriftTimeout, or Cancel are accepted",
        (Lost, Update { .. } | DriftTimeout | Start) => "Lost: only Redetected or Cancel are accepted",
        (Reacquiring, DriftTimeout | Redetected | Start) => "Reacquiring: only Update or Cancel are accepted",
        _ => "invalid event for current tracking state",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TrackingEvent::*;
    use TrackingState::*;

    fn manager() -> TrackingStateManager {
        TrackingStateManager::new(0.6, 0.4, 3)
    }

    #[test]
    fn initial_state_is_idle() {
        assert_eq!(manager().state(), Idle);
    }

    #[test]
    fn start_moves_to_acquiring() {
        let mut sm = manager();
        assert_eq!(sm.handle_event(Start), TransitionResult::Ok(Acquiring));
    }

    #[test]
    fn acquiring_requires_the_full_streak_before_tracking() {
        let mut sm = manager();
        sm.handle_event(Start);
        assert_eq!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Ok(Acquiring));
        assert_eq!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Ok(Acquiring));
        assert_eq!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Ok(Tracking));
    }

    #[test]
    fn low_confidence_resets_acquire_streak() {
        let mut sm = manager();
        sm.handle_event(Start);
        sm.handle_event(Update { confidence: 0.9 });
        sm.handle_event(Update { confidence: 0.1 });
        assert_eq!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Ok(Acquiring));
    }

    #[test]
    fn tracking_drops_to_drifting_on_low_confidence() {
        let mut sm = manager();
        sm.handle_event(Start);
        for _ in 0..3 {
            sm.handle_event(Update { confidence: 0.9 });
        }
        assert_eq!(sm.state(), Tracking);
        assert_eq!(sm.handle_event(Update { confidence: 0.1 }), TransitionResult::Ok(Drifting));
    }

    #[test]
    fn drifting_recovers_to_tracking_on_confidence_recovery() {
        let mut sm = manager();
        sm.handle_event(Start);
        for _ in 0..3 {
            sm.handle_event(Update { confidence: 0.9 });
        }
        sm.handle_event(Update { confidence: 0.1 });
        assert_eq!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Ok(Tracking));
    }

    #[test]
    fn drift_timeout_marks_lost_then_redetect_reacquires() {
        let mut sm = manager();
        sm.handle_event(Start);
        for _ in 0..3 {
            sm.handle_event(Update { confidence: 0.9 });
        }
        sm.handle_event(Update { confidence: 0.1 });
        assert_eq!(sm.handle_event(DriftTimeout), TransitionResult::Ok(Lost));
        assert_eq!(sm.handle_event(Redetected), TransitionResult::Ok(Reacquiring));
        assert_eq!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Ok(Tracking));
    }

    #[test]
    fn cancel_returns_to_idle_from_any_state() {
        for start in [Idle, Acquiring, Tracking, Drifting, Lost, Reacquiring] {
            let mut sm = manager();
            sm.state = start;
            assert_eq!(sm.handle_event(Cancel), TransitionResult::Ok(Idle));
        }
    }

    #[test]
    fn lost_rejects_update_events() {
        let mut sm = manager();
        sm.state = Lost;
        assert!(matches!(sm.handle_event(Update { confidence: 0.9 }), TransitionResult::Rejected(_)));
    }
}
