//! `AppController`: the Control task's per-tick pipeline.
//!
//! Implements the seven-step cycle frame → tracker → state machine →
//! follower → safety → dispatch → reload, mirroring the teacher's
//! `evo_control_unit` cycle body (read → process → write) generalized from
//! a fixed three-phase SHM exchange to PixEagle's five-stage vision
//! pipeline. Everything here is synchronous and allocation-free on the
//! steady-state path; I/O (video capture, inference, transport) lives in
//! the surrounding tasks in [`crate::tasks`], not in this struct.

use std::time::{Duration, Instant};

use pixeagle_common::capability::TrackerCapability;
use pixeagle_common::detection::Detection;
use pixeagle_common::frame::Frame;
use pixeagle_common::setpoint::SetpointCommand;
use pixeagle_common::telemetry::Telemetry;
use pixeagle_common::tracking::{TrackerOutput, TrackingState};

use pixeagle_common::param::ReloadTier;
use pixeagle_follower::FollowerManager;
use pixeagle_safety::manager::SafetyContext;
use pixeagle_tracker::state::{TrackingEvent, TrackingStateManager};
use pixeagle_tracker::Tracker;

use crate::config_handle::ConfigHandle;
use crate::error::CoreError;

/// What the Control task must do after a tick: dispatch a command (if any)
/// and/or request a process restart for a `SystemRestart`-tier config
/// change that was just drained.
pub struct TickOutput {
    /// Command to hand to the Transport task this tick, stamped with the
    /// tracker output timestamp (the frame's `timestamp_ns`) it was derived
    /// from. `None` when no frame was available this tick.
    pub command: Option<(SetpointCommand, u64)>,
    pub tracking_state: TrackingState,
    /// Set once a `SystemRestart`-tier config change has been drained; the
    /// caller should finish the current tick and exit with
    /// `EXIT_RESTART_REQUESTED`.
    pub restart_requested: bool,
}

pub struct AppController {
    tracker: Tracker,
    state_manager: TrackingStateManager,
    follower: FollowerManager,
    config: ConfigHandle,
    smart_mode: bool,
    tau_drift: Duration,
    drifting_since: Option<Instant>,
    lost_since: Option<Instant>,
    last_tick_at: Option<Instant>,
}

impl AppController {
    pub fn new(config: ConfigHandle) -> Result<Self, CoreError> {
        let snapshot = config.snapshot();
        let tracker = Tracker::from_variant_name(&snapshot.tracker.variant, snapshot.tracker.track_history_len)
            .map_err(CoreError::from)?;
        let smart_mode = tracker.is_smart();
        let state_manager = TrackingStateManager::new(
            snapshot.tracker.drift_confidence_threshold.max(0.01),
            snapshot.tracker.drift_confidence_threshold,
            3,
        );
        let follower = FollowerManager::new(&snapshot.follower, snapshot.safety.to_safety_limits())?;

        Ok(Self {
            tracker,
            state_manager,
            follower,
            config,
            smart_mode,
            tau_drift: Duration::from_millis(snapshot.tracker.lost_timeout_ms),
            drifting_since: None,
            lost_since: None,
            last_tick_at: None,
        })
    }

    pub fn smart_mode(&self) -> bool {
        self.smart_mode
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.state_manager.state()
    }

    /// Run one control tick. `detections` is ignored by a classic tracker
    /// and should be the latest inference-task output (possibly stale by a
    /// frame or two) when the active tracker is smart.
    pub fn tick(
        &mut self,
        frame: Option<&Frame>,
        detections: &[Detection],
        telemetry: Telemetry,
    ) -> Result<TickOutput, CoreError> {
        let dt = self.tick_dt();

        let dispatched = match frame {
            Some(frame) => Some(self.run_pipeline(frame, detections, &telemetry, dt)?),
            None => None,
        };

        let restart_requested = self.apply_pending_reload()?;

        Ok(TickOutput {
            command: dispatched,
            tracking_state: self.state_manager.state(),
            restart_requested,
        })
    }

    fn tick_dt(&mut self) -> f64 {
        let now = Instant::now();
        let dt = match self.last_tick_at {
            Some(prev) => now.duration_since(prev).as_secs_f64(),
            None => 1.0 / 20.0,
        };
        self.last_tick_at = Some(now);
        dt
    }

    fn run_pipeline(
        &mut self,
        frame: &Frame,
        detections: &[Detection],
        telemetry: &Telemetry,
        dt: f64,
    ) -> Result<(SetpointCommand, u64), CoreError> {
        // Steps 2-3: tracker update, then feed the state machine.
        let output = self.tracker.update(frame, detections);
        self.drive_state_machine(&output);
        let state = self.state_manager.state();

        if state == TrackingState::Lost {
            self.lost_since.get_or_insert_with(Instant::now);
        } else {
            self.lost_since = None;
        }

        // Step 4-5: follower dispatch (forwarding policy + routine clamp).
        let mut cmd = self
            .follower
            .dispatch(state, &output, telemetry, dt)
            .map_err(CoreError::from)?;

        // Step 5 (escalation): Halt/Rtl override whatever the follower
        // produced. A literal autopilot mode switch for Rtl is out of
        // scope; both Halt and Rtl force a neutral setpoint so the vehicle
        // stops commanding motion from this loop, and the supervisor is
        // expected to intervene above this layer.
        let ctx = SafetyContext {
            altitude_m: telemetry.altitude_m,
            telemetry_stale: telemetry.is_stale,
            target_lost_for: self.lost_since.map(|at| at.elapsed()),
        };
        match self.follower.check_safety(ctx) {
            pixeagle_common::safety::SafetyAction::Halt | pixeagle_common::safety::SafetyAction::Rtl => {
                cmd = SetpointCommand::neutral(cmd.control_type);
            }
            pixeagle_common::safety::SafetyAction::Clamp | pixeagle_common::safety::SafetyAction::None => {}
        }

        Ok((cmd, frame.timestamp_ns))
    }

    fn drive_state_machine(&mut self, output: &TrackerOutput) {
        let state = self.state_manager.state();
        let event = match state {
            TrackingState::Idle => {
                if output.track_id.is_some() || output.position_2d.is_some() {
                    TrackingEvent::Start
                } else {
                    return;
                }
            }
            TrackingState::Drifting => {
                let since = *self.drifting_since.get_or_insert_with(Instant::now);
                if since.elapsed() > self.tau_drift {
                    TrackingEvent::DriftTimeout
                } else {
                    TrackingEvent::Update {
                        confidence: output.confidence,
                    }
                }
            }
            TrackingState::Lost => {
                if output.confidence > 0.0 && (output.track_id.is_some() || output.position_2d.is_some()) {
                    TrackingEvent::Redetected
                } else {
                    return;
                }
            }
            _ => TrackingEvent::Update {
                confidence: output.confidence,
            },
        };

        let _ = self.state_manager.handle_event(event);
        if self.state_manager.state() != TrackingState::Drifting {
            self.drifting_since = None;
        }
    }

    /// Step 7: apply whatever reload tier was queued since the last tick.
    fn apply_pending_reload(&mut self) -> Result<bool, CoreError> {
        let Some(tier) = self.config.take_pending_reload() else {
            return Ok(false);
        };

        let snapshot = self.config.snapshot();
        match tier {
            ReloadTier::Immediate => Ok(false),
            ReloadTier::FollowerRestart => {
                self.follower
                    .switch(&snapshot.follower, self.tracker.capabilities())
                    .map_err(CoreError::from)?;
                Ok(false)
            }
            ReloadTier::TrackerRestart => {
                self.tracker = Tracker::from_variant_name(&snapshot.tracker.variant, snapshot.tracker.track_history_len)
                    .map_err(CoreError::from)?;
                self.smart_mode = self.tracker.is_smart();
                self.state_manager = TrackingStateManager::new(
                    snapshot.tracker.drift_confidence_threshold.max(0.01),
                    snapshot.tracker.drift_confidence_threshold,
                    3,
                );
                self.drifting_since = None;
                self.lost_since = None;
                Ok(false)
            }
            ReloadTier::SystemRestart => Ok(true),
        }
    }

    pub fn required_tracker_capabilities(&self) -> TrackerCapability {
        self.tracker.capabilities()
    }
}
