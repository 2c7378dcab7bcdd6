//! `AutopilotBridge`: the transport task's handle. Owns the active
//! [`BridgeBackend`], keeps an always-fresh [`Telemetry`] cache behind a
//! `tokio::sync::watch` channel (the async-native latest-wins shape,
//! grounded on `mavkit::Vehicle::telemetry()`), drops setpoints older than
//! `cmd_max_age_ms`, and reconnects with exponential backoff on transport
//! failure.

use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{error, info, warn};

use pixeagle_common::setpoint::{ControlType, SetpointCommand};
use pixeagle_common::telemetry::Telemetry;
use pixeagle_config::sections::BridgeSection;

use crate::backend::{AttitudeRateSetpoint, BodyVelocitySetpoint, BridgeBackend};
use crate::error::BridgeError;
use crate::registry::{default_registry, scheme_to_backend, BridgeBackendRegistry};

pub struct AutopilotBridge {
    backend: Box<dyn BridgeBackend>,
    registry: BridgeBackendRegistry,
    address: String,
    stale_after: Duration,
    cmd_max_age: Duration,
    reconnect_initial_backoff: Duration,
    reconnect_max_backoff: Duration,
    reconnect_backoff: Duration,
    telemetry_tx: watch::Sender<Telemetry>,
    telemetry_rx: watch::Receiver<Telemetry>,
    last_telemetry_at: Option<Instant>,
}

impl AutopilotBridge {
    /// Connect using the backend selected by `cfg.connection_string`'s
    /// scheme. Fails construction if the first connection attempt fails;
    /// subsequent failures are handled by [`Self::reconnect`] instead.
    pub async fn connect(cfg: &BridgeSection) -> Result<Self, BridgeError> {
        let registry = default_registry();
        let backend_name = scheme_to_backend(&cfg.connection_string)?;
        let mut backend = registry.create_backend(backend_name)?;
        backend.connect(&cfg.connection_string).await?;

        let (telemetry_tx, telemetry_rx) = watch::channel(Telemetry::default());
        let reconnect_initial_backoff = Duration::from_millis(cfg.reconnect_initial_backoff_ms);

        Ok(Self {
            backend,
            registry,
            address: cfg.connection_string.clone(),
            stale_after: Duration::from_millis(cfg.stale_after_ms),
            cmd_max_age: Duration::from_millis(cfg.cmd_max_age_ms),
            reconnect_initial_backoff,
            reconnect_max_backoff: Duration::from_millis(cfg.reconnect_max_backoff_ms),
            reconnect_backoff: reconnect_initial_backoff,
            telemetry_tx,
            telemetry_rx,
            last_telemetry_at: None,
        })
    }

    /// A receiver the control task can `.borrow()` from a plain `std::thread`
    /// without blocking — the same non-blocking read every `LatestWinsSlot`
    /// consumer gets, just backed by `tokio::sync::watch` since this side of
    /// the handoff is async-native.
    pub fn telemetry_receiver(&self) -> watch::Receiver<Telemetry> {
        self.telemetry_rx.clone()
    }

    /// Current telemetry, with `is_stale` forced true once the cache is
    /// older than `stale_after_ms` even if the backend never flips the flag
    /// itself (e.g. a backend that stops delivering messages silently).
    pub fn telemetry(&self) -> Telemetry {
        let mut snapshot = *self.telemetry_rx.borrow();
        let stale = match self.last_telemetry_at {
            Some(at) => at.elapsed() > self.stale_after,
            None => true,
        };
        snapshot.is_stale = snapshot.is_stale || stale;
        snapshot
    }

    /// Pull fresh telemetry from the backend into the watch channel. On
    /// failure, attempts reconnection; callers should keep calling this
    /// every tick regardless of the previous call's outcome.
    pub async fn refresh_telemetry(&mut self) -> Result<(), BridgeError> {
        match self.backend.poll_telemetry().await {
            Ok(telemetry) => {
                self.last_telemetry_at = Some(Instant::now());
                self.reconnect_backoff = self.reconnect_initial_backoff;
                let _ = self.telemetry_tx.send(telemetry);
                Ok(())
            }
            Err(err) => {
                warn!(address = %self.address, error = %err, "telemetry poll failed, attempting reconnect");
                self.reconnect().await
            }
        }
    }

    async fn reconnect(&mut self) -> Result<(), BridgeError> {
        tokio::time::sleep(self.reconnect_backoff).await;
        self.reconnect_backoff = (self.reconnect_backoff * 2).min(self.reconnect_max_backoff);

        let backend_name = scheme_to_backend(&self.address)?;
        let mut candidate = self.registry.create_backend(backend_name)?;
        match candidate.connect(&self.address).await {
            Ok(()) => {
                info!(address = %self.address, "autopilot transport reconnected");
                self.backend = candidate;
                self.reconnect_backoff = self.reconnect_initial_backoff;
                Ok(())
            }
            Err(err) => {
                error!(address = %self.address, error = %err, "reconnect attempt failed");
                Err(err)
            }
        }
    }

    /// Dispatch `cmd`, stamped with the tracker output timestamp it was
    /// derived from (`command_timestamp_ns`). Drops commands older than
    /// `cmd_max_age_ms` and refuses to send while telemetry is stale,
    /// exactly as `spec.md` §4.10/§5 require. A single transport-level
    /// send failure is retried once before the tick is dropped.
    pub async fn send(&mut self, cmd: SetpointCommand, command_timestamp_ns: u64, now_ns: u64) -> Result<(), BridgeError> {
        let age_ms = now_ns.saturating_sub(command_timestamp_ns) / 1_000_000;
        let max_age_ms = self.cmd_max_age.as_millis() as u64;
        if age_ms > max_age_ms {
            return Err(BridgeError::CommandTooStale { age_ms, max_age_ms });
        }

        let telemetry = self.telemetry();
        if telemetry.is_stale {
            return Err(BridgeError::TelemetryStale {
                stale_ms: self.stale_after.as_millis() as u64,
            });
        }

        let mut attempts = 0;
        loop {
            let result = match cmd.control_type {
                ControlType::BodyVelocity => {
                    self.backend
                        .send_body_velocity(BodyVelocitySetpoint {
                            vx: cmd.vx,
                            vy: cmd.vy,
                            vz: cmd.vz,
                            yaw_rate: cmd.yaw_rate,
                        })
                        .await
                }
                ControlType::AttitudeRate => {
                    self.backend
                        .send_attitude_rate(AttitudeRateSetpoint {
                            roll_rate: cmd.roll_rate,
                            pitch_rate: cmd.pitch_rate,
                            yaw_rate: cmd.yaw_rate,
                            thrust: cmd.thrust,
                        })
                        .await
                }
            };

            match result {
                Ok(()) => return Ok(()),
                Err(err) if attempts == 0 => {
                    attempts += 1;
                    warn!(error = %err, "setpoint send failed, retrying once");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
