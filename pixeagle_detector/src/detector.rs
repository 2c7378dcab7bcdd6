//! `Detector`: the facade the inference task drives. Wraps a backend with
//! skip-frame-on-timeout policy, consecutive-error degrade tracking, and
//! model hot-swap via the same scoped-acquisition discipline
//! `FollowerManager` uses for profile switches — a freshly loaded backend is
//! fully constructed and has its model loaded before it replaces the one in
//! service, so a failed load never disturbs the active instance.

use tracing::warn;

use pixeagle_common::detection::Detection;
use pixeagle_common::frame::Frame;
use pixeagle_config::sections::DetectorSection;

use crate::backend::DetectorBackend;
use crate::error::DetectorError;
use crate::model::{ModelInfo, ModelRegistry};
use crate::options::DetectOptions;
use crate::registry::DetectorBackendRegistry;

/// Consecutive inference failures after which the detector marks itself
/// degraded and the tracker falls back to classic mode.
const DEGRADE_AFTER_CONSECUTIVE_ERRORS: u32 = 5;

pub struct Detector {
    backend: Box<dyn DetectorBackend>,
    backend_registry: DetectorBackendRegistry,
    model_registry: ModelRegistry,
    skip_frame_on_timeout: bool,
    consecutive_errors: u32,
    degraded: bool,
}

impl Detector {
    pub fn new(
        section: &DetectorSection,
        backend_registry: DetectorBackendRegistry,
        model_registry: ModelRegistry,
    ) -> Result<Self, DetectorError> {
        let mut backend = backend_registry.create_backend(&section.backend)?;
        backend
            .load_model(&section.model, "cpu")
            .map_err(|e| DetectorError::ModelLoadFailed {
                model: section.model.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self {
            backend,
            backend_registry,
            model_registry,
            skip_frame_on_timeout: section.skip_frame_on_timeout,
            consecutive_errors: 0,
            degraded: false,
        })
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn active_model(&self) -> Option<&str> {
        self.backend.active_model()
    }

    /// Run inference. A degraded detector short-circuits without touching
    /// the backend, so callers driving the tracker's fallback-to-classic
    /// path don't pay for a doomed call.
    pub fn detect(&mut self, frame: &Frame, options: &DetectOptions) -> Result<Vec<Detection>, DetectorError> {
        if self.degraded {
            return Err(DetectorError::InferenceFailed("detector is degraded".to_string()));
        }

        match self.backend.detect(frame, options) {
            Ok(detections) => {
                self.consecutive_errors = 0;
                Ok(detections)
            }
            Err(err) => {
                self.consecutive_errors += 1;
                if self.consecutive_errors >= DEGRADE_AFTER_CONSECUTIVE_ERRORS {
                    self.degraded = true;
                    warn!(backend = self.backend.name(), "detector marked degraded after repeated inference failures");
                }
                if self.skip_frame_on_timeout && matches!(err, DetectorError::InferenceTimeout(_)) {
                    Ok(Vec::new())
                } else {
                    Err(err)
                }
            }
        }
    }

    pub fn list_models(&self) -> Result<Vec<ModelInfo>, DetectorError> {
        self.model_registry.list_models()
    }

    pub fn upload_model(&self, id: &str, data: &[u8]) -> Result<(), DetectorError> {
        self.model_registry.upload(id, data)
    }

    pub fn delete_model(&self, id: &str) -> Result<(), DetectorError> {
        self.model_registry.delete(id)
    }

    pub fn download_model(&self, id: &str) -> Result<Vec<u8>, DetectorError> {
        self.model_registry.download(id)
    }

    /// Build a fresh backend instance, load `model` into it, and only then
    /// replace the active backend. The old instance is simply dropped — it
    /// owns no external resources that need an explicit drain.
    pub fn switch_model(&mut self, model: &str, device: &str) -> Result<(), DetectorError> {
        let mut candidate = self.backend_registry.create_backend(self.backend.name())?;
        candidate
            .load_model(model, device)
            .map_err(|e| DetectorError::ModelLoadFailed {
                model: model.to_string(),
                detail: e.to_string(),
            })?;
        self.backend = candidate;
        self.consecutive_errors = 0;
        self.degraded = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::frame::PixelFormat;
    use tempfile::tempdir;

    fn section() -> DetectorSection {
        DetectorSection {
            backend: "simulation".to_string(),
            model: "default".to_string(),
            inference_timeout_ms: 80,
            skip_frame_on_timeout: true,
        }
    }

    fn detector(dir: &std::path::Path) -> Detector {
        Detector::new(&section(), crate::registry::default_registry(), ModelRegistry::new(dir)).unwrap()
    }

    #[test]
    fn fresh_detector_is_not_degraded() {
        let dir = tempdir().unwrap();
        assert!(!detector(dir.path()).is_degraded());
    }

    #[test]
    fn empty_script_returns_empty_detections_without_degrading() {
        let dir = tempdir().unwrap();
        let mut det = detector(dir.path());
        let frame = Frame::new(0, 0, 1, 1, PixelFormat::Gray8, vec![0]);
        for _ in 0..10 {
            assert!(det.detect(&frame, &DetectOptions::default()).unwrap().is_empty());
        }
        assert!(!det.is_degraded());
    }

    #[test]
    fn switch_model_updates_active_model_and_resets_error_count() {
        let dir = tempdir().unwrap();
        let mut det = detector(dir.path());
        det.switch_model("yolo-v8n", "cpu").unwrap();
        assert_eq!(det.active_model(), Some("yolo-v8n"));
        assert!(!det.is_degraded());
    }
}
