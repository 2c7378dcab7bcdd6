//! The backend trait every detector implementation satisfies.

use pixeagle_common::detection::Detection;
use pixeagle_common::frame::Frame;

use crate::error::DetectorError;
use crate::options::DetectOptions;

pub trait DetectorBackend: Send {
    fn name(&self) -> &'static str;

    /// Currently loaded model id, if the backend is model-backed.
    fn active_model(&self) -> Option<&str>;

    /// Swap the active model. Backends with no real accelerator (e.g.
    /// [`crate::simulation::SimulationDetector`]) may treat every id as
    /// valid; real backends should reject unknown ids.
    fn load_model(&mut self, model: &str, device: &str) -> Result<(), DetectorError>;

    fn detect(&mut self, frame: &Frame, options: &DetectOptions) -> Result<Vec<Detection>, DetectorError>;
}

pub type DetectorBackendFactory = fn() -> Box<dyn DetectorBackend>;
