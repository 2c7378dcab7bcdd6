//! Loopback backend used for `simulation://` connection strings and in
//! tests. No real autopilot: every dispatched setpoint is integrated
//! straight into the telemetry it would have produced, the same
//! simulation-driver convention `pixeagle_video::simulation` and
//! `pixeagle_detector::simulation` use.

use async_trait::async_trait;

use pixeagle_common::telemetry::Telemetry;

use crate::backend::{AttitudeRateSetpoint, BodyVelocitySetpoint, BridgeBackend};
use crate::error::BridgeError;

/// One simulated control tick's worth of integration, applied whenever a
/// setpoint is sent so `poll_telemetry` has something to report back.
const SIM_DT_S: f32 = 0.05;

pub struct SimulationBackend {
    connected: bool,
    telemetry: Telemetry,
}

impl SimulationBackend {
    pub fn new() -> Self {
        Self {
            connected: false,
            telemetry: Telemetry {
                altitude_m: 50.0,
                armed: true,
                ..Telemetry::default()
            },
        }
    }
}

impl Default for SimulationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BridgeBackend for SimulationBackend {
    fn name(&self) -> &'static str {
        "simulation"
    }

    async fn connect(&mut self, _address: &str) -> Result<(), BridgeError> {
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send_body_velocity(&mut self, setpoint: BodyVelocitySetpoint) -> Result<(), BridgeError> {
        if !self.connected {
            return Err(BridgeError::Disconnected);
        }
        self.telemetry.groundspeed_m_s = (setpoint.vx.powi(2) + setpoint.vy.powi(2)).sqrt();
        self.telemetry.vertical_speed_m_s = -setpoint.vz;
        self.telemetry.altitude_m -= setpoint.vz * SIM_DT_S;
        self.telemetry.heading_rad += setpoint.yaw_rate * SIM_DT_S;
        self.telemetry.is_stale = false;
        Ok(())
    }

    async fn send_attitude_rate(&mut self, setpoint: AttitudeRateSetpoint) -> Result<(), BridgeError> {
        if !self.connected {
            return Err(BridgeError::Disconnected);
        }
        self.telemetry.roll_rad += setpoint.roll_rate * SIM_DT_S;
        self.telemetry.pitch_rad += setpoint.pitch_rate * SIM_DT_S;
        self.telemetry.yaw_rad += setpoint.yaw_rate * SIM_DT_S;
        self.telemetry.vertical_speed_m_s = (setpoint.thrust - 0.5) * 4.0;
        self.telemetry.altitude_m += self.telemetry.vertical_speed_m_s * SIM_DT_S;
        self.telemetry.is_stale = false;
        Ok(())
    }

    async fn poll_telemetry(&mut self) -> Result<Telemetry, BridgeError> {
        if !self.connected {
            return Err(BridgeError::Disconnected);
        }
        Ok(self.telemetry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_before_connect_is_rejected() {
        let mut backend = SimulationBackend::new();
        let result = backend
            .send_body_velocity(BodyVelocitySetpoint {
                vx: 1.0,
                vy: 0.0,
                vz: 0.0,
                yaw_rate: 0.0,
            })
            .await;
        assert!(matches!(result, Err(BridgeError::Disconnected)));
    }

    #[tokio::test]
    async fn body_velocity_descent_reduces_altitude() {
        let mut backend = SimulationBackend::new();
        backend.connect("simulation://").await.unwrap();
        let before = backend.poll_telemetry().await.unwrap().altitude_m;
        backend
            .send_body_velocity(BodyVelocitySetpoint {
                vx: 0.0,
                vy: 0.0,
                vz: 1.0,
                yaw_rate: 0.0,
            })
            .await
            .unwrap();
        let after = backend.poll_telemetry().await.unwrap().altitude_m;
        assert!(after < before);
    }
}
