//! Real MAVLink offboard transport, grounded on the example pack's
//! `mavkit::Vehicle` shape: an `Arc`-shared async connection handle plus a
//! background task that owns the socket and keeps a telemetry cache fresh,
//! here collapsed into a single backend instance since `AutopilotBridge`
//! (not this backend) owns the reconnect-with-backoff policy.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mavlink::common::{MavMessage, MAV_MODE_FLAG_SAFETY_ARMED};
use parking_lot::RwLock;
use tracing::{debug, warn};

use pixeagle_common::telemetry::Telemetry;

use crate::backend::{AttitudeRateSetpoint, BodyVelocitySetpoint, BridgeBackend};
use crate::error::BridgeError;

/// Bitmask selecting only the velocity + yaw-rate fields of
/// `SET_POSITION_TARGET_LOCAL_NED`, matching the `control_type` whitelist
/// `SetpointHandler` already enforced upstream: position, acceleration and
/// yaw (not yaw-rate) are masked off.
const POSITION_TARGET_TYPE_MASK_VELOCITY_AND_YAWRATE: u16 = 0b0000_0111_1100_0111;

/// Bitmask selecting body rates + thrust on `SET_ATTITUDE_TARGET`,
/// ignoring the attitude quaternion field entirely.
const ATTITUDE_TARGET_TYPE_MASK_RATES_AND_THRUST: u8 = 0b0000_0111;

const GCS_SYSTEM_ID: u8 = 255;
const GCS_COMPONENT_ID: u8 = 0;
const TARGET_SYSTEM_ID: u8 = 1;
const TARGET_COMPONENT_ID: u8 = 1;

type Connection = dyn mavlink::r#async::AsyncMavConnection<MavMessage> + Send + Sync;

pub struct MavlinkBackend {
    connection: Option<Arc<Connection>>,
    telemetry: Arc<RwLock<Telemetry>>,
    sequence: AtomicU8,
}

impl MavlinkBackend {
    pub fn new() -> Self {
        Self {
            connection: None,
            telemetry: Arc::new(RwLock::new(Telemetry::default())),
            sequence: AtomicU8::new(0),
        }
    }

    fn header(&self) -> mavlink::MavHeader {
        mavlink::MavHeader {
            system_id: GCS_SYSTEM_ID,
            component_id: GCS_COMPONENT_ID,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn connection(&self) -> Result<&Arc<Connection>, BridgeError> {
        self.connection.as_ref().ok_or(BridgeError::Disconnected)
    }
}

impl Default for MavlinkBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Background task applying incoming telemetry messages to the shared
/// cache until the connection errors out, mirroring `mavkit`'s event loop.
async fn receive_loop(connection: Arc<Connection>, telemetry: Arc<RwLock<Telemetry>>) {
    loop {
        match connection.recv().await {
            Ok((_, message)) => apply_message(&telemetry, &message),
            Err(err) => {
                warn!(error = %err, "mavlink receive loop ended");
                return;
            }
        }
    }
}

fn apply_message(telemetry: &Arc<RwLock<Telemetry>>, message: &MavMessage) {
    let mut t = telemetry.write();
    match message {
        MavMessage::ATTITUDE(data) => {
            t.roll_rad = data.roll;
            t.pitch_rad = data.pitch;
            t.yaw_rad = data.yaw;
        }
        MavMessage::VFR_HUD(data) => {
            t.airspeed_m_s = data.airspeed;
            t.groundspeed_m_s = data.groundspeed;
            t.heading_rad = (data.heading as f32).to_radians();
            t.vertical_speed_m_s = data.climb;
        }
        MavMessage::GLOBAL_POSITION_INT(data) => {
            t.altitude_m = data.relative_alt as f32 / 1000.0;
        }
        MavMessage::HEARTBEAT(data) => {
            t.armed = data.base_mode.contains(MAV_MODE_FLAG_SAFETY_ARMED);
        }
        other => debug!(?other, "unhandled mavlink message"),
    }
    t.is_stale = false;
}

#[async_trait]
impl BridgeBackend for MavlinkBackend {
    fn name(&self) -> &'static str {
        "mavlink"
    }

    async fn connect(&mut self, address: &str) -> Result<(), BridgeError> {
        let connection = mavlink::connect_async::<MavMessage>(address)
            .await
            .map_err(|e| BridgeError::ConnectFailed {
                address: address.to_string(),
                detail: e.to_string(),
            })?;
        let connection: Arc<Connection> = Arc::from(connection);
        tokio::spawn(receive_loop(connection.clone(), self.telemetry.clone()));
        self.connection = Some(connection);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    async fn send_body_velocity(&mut self, setpoint: BodyVelocitySetpoint) -> Result<(), BridgeError> {
        let header = self.header();
        let message = MavMessage::SET_POSITION_TARGET_LOCAL_NED(mavlink::common::SET_POSITION_TARGET_LOCAL_NED_DATA {
            time_boot_ms: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            vx: setpoint.vx,
            vy: setpoint.vy,
            vz: setpoint.vz,
            afx: 0.0,
            afy: 0.0,
            afz: 0.0,
            yaw: 0.0,
            yaw_rate: setpoint.yaw_rate,
            type_mask: mavlink::common::PositionTargetTypemask::from_bits_truncate(
                POSITION_TARGET_TYPE_MASK_VELOCITY_AND_YAWRATE,
            ),
            target_system: TARGET_SYSTEM_ID,
            target_component: TARGET_COMPONENT_ID,
            coordinate_frame: mavlink::common::MavFrame::MAV_FRAME_BODY_OFFSET_NED,
        });
        self.connection()?
            .send(&header, &message)
            .await
            .map_err(|e| BridgeError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn send_attitude_rate(&mut self, setpoint: AttitudeRateSetpoint) -> Result<(), BridgeError> {
        let header = self.header();
        let message = MavMessage::SET_ATTITUDE_TARGET(mavlink::common::SET_ATTITUDE_TARGET_DATA {
            time_boot_ms: 0,
            q: [1.0, 0.0, 0.0, 0.0],
            body_roll_rate: setpoint.roll_rate,
            body_pitch_rate: setpoint.pitch_rate,
            body_yaw_rate: setpoint.yaw_rate,
            thrust: setpoint.thrust,
            type_mask: ATTITUDE_TARGET_TYPE_MASK_RATES_AND_THRUST,
            target_system: TARGET_SYSTEM_ID,
            target_component: TARGET_COMPONENT_ID,
        });
        self.connection()?
            .send(&header, &message)
            .await
            .map_err(|e| BridgeError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn poll_telemetry(&mut self) -> Result<Telemetry, BridgeError> {
        self.connection()?;
        Ok(*self.telemetry.read())
    }
}
