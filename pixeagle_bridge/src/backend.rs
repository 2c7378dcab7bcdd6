//! `BridgeBackend`: the contract a MAVLink transport (or a loopback
//! simulation of one) satisfies, mirroring the `VideoBackend`/
//! `DetectorBackend` constructor-injected-factory shape used elsewhere in
//! the workspace.

use async_trait::async_trait;

use pixeagle_common::telemetry::Telemetry;

use crate::error::BridgeError;

/// A body-frame velocity offboard setpoint
/// (`SET_POSITION_TARGET_LOCAL_NED` velocity fields).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyVelocitySetpoint {
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub yaw_rate: f32,
}

/// An attitude-rate + thrust offboard setpoint (`SET_ATTITUDE_TARGET`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeRateSetpoint {
    pub roll_rate: f32,
    pub pitch_rate: f32,
    pub yaw_rate: f32,
    pub thrust: f32,
}

#[async_trait]
pub trait BridgeBackend: Send {
    fn name(&self) -> &'static str;

    async fn connect(&mut self, address: &str) -> Result<(), BridgeError>;

    fn is_connected(&self) -> bool;

    async fn send_body_velocity(&mut self, setpoint: BodyVelocitySetpoint) -> Result<(), BridgeError>;

    async fn send_attitude_rate(&mut self, setpoint: AttitudeRateSetpoint) -> Result<(), BridgeError>;

    /// Pull the latest telemetry the backend has received. Returns the most
    /// recent snapshot even if no new message arrived since the last call;
    /// `AutopilotBridge` is responsible for staleness bookkeeping.
    async fn poll_telemetry(&mut self) -> Result<Telemetry, BridgeError>;
}

pub type BridgeBackendFactory = fn() -> Box<dyn BridgeBackend>;
