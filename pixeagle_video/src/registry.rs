//! Registry of capture backend factories, keyed by name rather than URI
//! scheme directly — [`crate::source::scheme_to_backend`] maps a URI's
//! scheme onto one of these names.

use std::collections::HashMap;

use crate::backend::{VideoBackend, VideoBackendFactory};
use crate::error::VideoError;

/// Constructed at startup, populated via `register()`, then handed to
/// [`VideoSource`](crate::source::VideoSource) by value. No global state.
pub struct VideoBackendRegistry {
    factories: HashMap<&'static str, VideoBackendFactory>,
}

impl VideoBackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// # Panics
    /// Panics if a backend with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: VideoBackendFactory) {
        if self.factories.contains_key(name) {
            panic!("video backend '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    pub fn create_backend(&self, name: &str) -> Result<Box<dyn VideoBackend>, VideoError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| VideoError::BackendNotFound(name.to_string()))?;
        Ok(factory())
    }

    pub fn list_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for VideoBackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationVideoBackend;

    fn create_simulation() -> Box<dyn VideoBackend> {
        Box::new(SimulationVideoBackend::new())
    }

    #[test]
    fn registry_create_and_list() {
        let mut reg = VideoBackendRegistry::new();
        reg.register("simulation", create_simulation);
        let backend = reg.create_backend("simulation").expect("should create");
        assert_eq!(backend.name(), "simulation");
        assert_eq!(reg.list_backends(), vec!["simulation"]);
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let reg = VideoBackendRegistry::new();
        assert!(matches!(
            reg.create_backend("nonexistent"),
            Err(VideoError::BackendNotFound(_))
        ));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_registration_panics() {
        let mut reg = VideoBackendRegistry::new();
        reg.register("simulation", create_simulation);
        reg.register("simulation", create_simulation);
    }
}
