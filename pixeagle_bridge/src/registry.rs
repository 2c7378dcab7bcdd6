//! Registry of transport backend factories, the same constructor-injected
//! shape as `pixeagle_video::registry::VideoBackendRegistry` and
//! `pixeagle_detector::registry::DetectorBackendRegistry`.

use std::collections::HashMap;

use crate::backend::{BridgeBackend, BridgeBackendFactory};
use crate::error::BridgeError;

pub struct BridgeBackendRegistry {
    factories: HashMap<&'static str, BridgeBackendFactory>,
}

impl BridgeBackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// # Panics
    /// Panics if a backend with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: BridgeBackendFactory) {
        if self.factories.contains_key(name) {
            panic!("bridge backend '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    pub fn create_backend(&self, name: &str) -> Result<Box<dyn BridgeBackend>, BridgeError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BridgeError::BackendNotFound(name.to_string()))?;
        Ok(factory())
    }

    pub fn list_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for BridgeBackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a connection-string scheme onto the backend name it is served by,
/// the same `scheme://` convention `pixeagle_video::scheme_to_backend` uses.
pub fn scheme_to_backend(connection_string: &str) -> Result<&'static str, BridgeError> {
    let scheme = connection_string.split("://").next().unwrap_or("");
    match scheme {
        "simulation" => Ok("simulation"),
        "udp" | "udpin" | "udpout" | "tcp" | "tcpin" | "tcpout" | "serial" => Ok("mavlink"),
        other => Err(BridgeError::ConnectFailed {
            address: connection_string.to_string(),
            detail: format!("no transport backend for scheme '{other}'"),
        }),
    }
}

/// Populate a registry with the two shipped backends.
pub fn default_registry() -> BridgeBackendRegistry {
    let mut registry = BridgeBackendRegistry::new();
    registry.register("simulation", || Box::new(crate::simulation::SimulationBackend::new()));
    registry.register("mavlink", || Box::new(crate::mavlink_backend::MavlinkBackend::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_to_backend_maps_known_schemes() {
        assert_eq!(scheme_to_backend("simulation://").unwrap(), "simulation");
        assert_eq!(scheme_to_backend("udpin:0.0.0.0:14550").unwrap(), "mavlink");
        assert_eq!(scheme_to_backend("serial:/dev/ttyUSB0:57600").unwrap(), "mavlink");
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(scheme_to_backend("ftp://host").is_err());
    }

    #[test]
    fn registry_creates_registered_backends() {
        let registry = default_registry();
        assert!(registry.create_backend("simulation").is_ok());
        assert!(registry.create_backend("mavlink").is_ok());
        assert!(registry.create_backend("nonexistent").is_err());
    }
}
