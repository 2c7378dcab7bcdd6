//! Wires the five task roles `spec.md` §5 names onto concrete `tokio`
//! tasks and one dedicated `std::thread`:
//!
//! - Capture task: owns `VideoSource`, runs on a blocking thread, publishes
//!   into a [`LatestWinsSlot<Frame>`].
//! - Inference task (smart mode only): owns `Detector`, runs on a blocking
//!   thread, single in-flight request, publishes into a
//!   `LatestWinsSlot<(u64, Vec<Detection>)>` keyed by the frame sequence it
//!   was computed from.
//! - Control task: the only hard-real-time role, a plain `std::thread`
//!   paced by [`crate::cycle::TickClock`] rather than the `tokio` runtime,
//!   so it is never at the mercy of executor scheduling latency.
//! - Transport task: owns `AutopilotBridge`, receives commands over a
//!   channel, polls telemetry on its own interval.
//!
//! The Config task has no dedicated thread: `ConfigHandle` is `Clone` and
//! cheap to share, so whichever task needs to read or write configuration
//! (today, none of the spawned tasks do directly — only `AppController`'s
//! `apply_pending_reload`) just holds a clone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use pixeagle_common::detection::Detection;
use pixeagle_common::frame::Frame;
use pixeagle_common::health::HealthSnapshot;
use pixeagle_common::setpoint::SetpointCommand;
use pixeagle_common::slot::LatestWinsSlot;
use pixeagle_config::sections::PixEagleConfig;
use pixeagle_detector::{DetectOptions, Detector};
use pixeagle_video::VideoSource;

use pixeagle_bridge::AutopilotBridge;

use crate::config_handle::ConfigHandle;
use crate::controller::AppController;
use crate::cycle::TickClock;
use crate::error::CoreError;
use crate::health;

/// A dispatched command plus the tracker-output timestamp it was derived
/// from, handed to the Transport task for age-checked send.
struct Outbound {
    command: SetpointCommand,
    command_timestamp_ns: u64,
}

pub struct Runtime {
    pub capture: tokio::task::JoinHandle<()>,
    pub inference: Option<tokio::task::JoinHandle<()>>,
    pub control: std::thread::JoinHandle<bool>,
    pub transport: tokio::task::JoinHandle<()>,
    pub health: Arc<LatestWinsSlot<HealthSnapshot>>,
}

impl Runtime {
    /// Blocks until the Control task exits (either because the process is
    /// shutting down or because a `SystemRestart`-tier reload fired).
    /// Returns `true` if a restart was requested.
    pub fn join_control(self) -> bool {
        self.capture.abort();
        if let Some(inference) = self.inference {
            inference.abort();
        }
        self.transport.abort();
        self.control.join().unwrap_or(false)
    }
}

pub async fn spawn(config: ConfigHandle) -> Result<Runtime, CoreError> {
    let snapshot = config.snapshot();

    let frame_slot = Arc::new(LatestWinsSlot::<Frame>::new());
    let detection_slot = Arc::new(LatestWinsSlot::<(u64, Vec<Detection>)>::new());
    let health_slot = Arc::new(LatestWinsSlot::<HealthSnapshot>::new());

    let video = VideoSource::new(&snapshot.video, pixeagle_video::default_registry())?;
    let capture = spawn_capture_task(video, frame_slot.clone());

    let controller = AppController::new(config.clone())?;
    let smart_mode = controller.smart_mode();

    let inference = if smart_mode {
        let detector = Detector::new(
            &snapshot.detector,
            pixeagle_detector::default_registry(),
            pixeagle_detector::ModelRegistry::new(std::env::temp_dir().join("pixeagle-models")),
        )?;
        Some(spawn_inference_task(detector, frame_slot.clone(), detection_slot.clone()))
    } else {
        None
    };

    let mut bridge = AutopilotBridge::connect(&snapshot.bridge).await?;
    let telemetry_rx = bridge.telemetry_receiver();
    let (command_tx, command_rx) = mpsc::channel::<Outbound>(4);
    let transport = spawn_transport_task(bridge, command_rx);

    let control = spawn_control_task(
        controller,
        snapshot,
        frame_slot,
        detection_slot,
        telemetry_rx,
        command_tx,
        health_slot.clone(),
    );

    Ok(Runtime {
        capture,
        inference,
        control,
        transport,
        health: health_slot,
    })
}

fn spawn_capture_task(mut video: VideoSource, frame_slot: Arc<LatestWinsSlot<Frame>>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || loop {
        match video.read_frame() {
            Ok(frame) => frame_slot.publish(frame),
            Err(err) => {
                warn!(error = %err, "capture task frame read failed");
                if video.is_terminal() {
                    error!("video source exhausted its reopen budget, capture task exiting");
                    return;
                }
            }
        }
    })
}

fn spawn_inference_task(
    mut detector: Detector,
    frame_slot: Arc<LatestWinsSlot<Frame>>,
    detection_slot: Arc<LatestWinsSlot<(u64, Vec<Detection>)>>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let mut last_sequence = None;
        loop {
            let Some((frame, _age)) = frame_slot.peek() else {
                std::thread::sleep(Duration::from_millis(5));
                continue;
            };
            if last_sequence == Some(frame.sequence) {
                std::thread::sleep(Duration::from_millis(2));
                continue;
            }
            last_sequence = Some(frame.sequence);
            match detector.detect(&frame, &DetectOptions::default()) {
                Ok(detections) => detection_slot.publish((frame.sequence, detections)),
                Err(err) => warn!(error = %err, "inference task detect failed"),
            }
            if detector.is_degraded() {
                error!("detector marked degraded, inference task exiting");
                return;
            }
        }
    })
}

fn spawn_transport_task(mut bridge: AutopilotBridge, mut command_rx: mpsc::Receiver<Outbound>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut telemetry_interval = tokio::time::interval(Duration::from_millis(50));
        loop {
            tokio::select! {
                _ = telemetry_interval.tick() => {
                    if let Err(err) = bridge.refresh_telemetry().await {
                        warn!(error = %err, "transport task telemetry refresh failed");
                    }
                }
                maybe_outbound = command_rx.recv() => {
                    let Some(outbound) = maybe_outbound else {
                        info!("transport task command channel closed, exiting");
                        return;
                    };
                    let now_ns = crate::cycle::now_ns();
                    if let Err(err) = bridge.send(outbound.command, outbound.command_timestamp_ns, now_ns).await {
                        warn!(error = %err, "transport task send failed");
                    }
                }
            }
        }
    })
}

fn spawn_control_task(
    mut controller: AppController,
    snapshot: PixEagleConfig,
    frame_slot: Arc<LatestWinsSlot<Frame>>,
    detection_slot: Arc<LatestWinsSlot<(u64, Vec<Detection>)>>,
    telemetry_rx: tokio::sync::watch::Receiver<pixeagle_common::telemetry::Telemetry>,
    command_tx: mpsc::Sender<Outbound>,
    health_slot: Arc<LatestWinsSlot<HealthSnapshot>>,
) -> std::thread::JoinHandle<bool> {
    let period = Duration::from_secs_f64(1.0 / snapshot.system.control_rate_hz.max(1.0));

    std::thread::spawn(move || {
        let mut clock = TickClock::new(period);
        loop {
            let tick_started_at = Instant::now();

            let frame = frame_slot.peek().map(|(f, _)| f);
            let detections = frame
                .as_ref()
                .and_then(|f| detection_slot.peek().map(|((seq, dets), _age)| (seq, dets, f.sequence)))
                .filter(|(seq, _, frame_seq)| seq == frame_seq)
                .map(|(_, dets, _)| dets)
                .unwrap_or_default();
            let telemetry = *telemetry_rx.borrow();

            let outcome = controller.tick(frame.as_ref(), &detections, telemetry);

            match outcome {
                Ok(tick) => {
                    if let Some((command, command_timestamp_ns)) = tick.command {
                        if let Err(err) = command_tx.try_send(Outbound {
                            command,
                            command_timestamp_ns,
                        }) {
                            warn!(error = %err, "control task dropped a command, transport channel full or closed");
                        }
                    }

                    let snapshot = health::snapshot(
                        health::video_health(false, 0),
                        health::detector_health(controller.smart_mode(), false),
                        health::tracker_health(tick.tracking_state),
                        health::bridge_health(telemetry.is_stale, 0),
                    );
                    health_slot.publish(snapshot);

                    if tick.restart_requested {
                        info!("system-restart-tier config change applied, control task exiting");
                        clock.wait_for_next_tick(tick_started_at);
                        return true;
                    }
                }
                Err(err) => {
                    error!(error = %err, "control tick failed");
                }
            }

            clock.wait_for_next_tick(tick_started_at);
        }
    })
}
