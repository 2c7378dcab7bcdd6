//! Registry of detector backend factories. Mirrors
//! `pixeagle_video::registry::VideoBackendRegistry` — constructor-injected,
//! no global state.

use std::collections::HashMap;

use crate::backend::{DetectorBackend, DetectorBackendFactory};
use crate::error::DetectorError;

pub struct DetectorBackendRegistry {
    factories: HashMap<&'static str, DetectorBackendFactory>,
}

impl DetectorBackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// # Panics
    /// Panics if a backend with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: DetectorBackendFactory) {
        if self.factories.contains_key(name) {
            panic!("detector backend '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    pub fn create_backend(&self, name: &str) -> Result<Box<dyn DetectorBackend>, DetectorError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DetectorError::BackendNotFound(name.to_string()))?;
        Ok(factory())
    }

    pub fn list_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for DetectorBackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_registry() -> DetectorBackendRegistry {
    let mut registry = DetectorBackendRegistry::new();
    registry.register("simulation", || Box::new(crate::simulation::SimulationDetector::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_simulation_backend() {
        let registry = default_registry();
        assert!(registry.list_backends().contains(&"simulation"));
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let registry = DetectorBackendRegistry::new();
        assert!(matches!(
            registry.create_backend("nonexistent"),
            Err(DetectorError::BackendNotFound(_))
        ));
    }
}
