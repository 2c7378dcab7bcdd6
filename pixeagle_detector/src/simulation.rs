//! Scripted backend used for `simulation` model id and in tests. Emits a
//! fixed sequence of detections regardless of frame content, cycling once
//! the script is exhausted.

use pixeagle_common::detection::Detection;
use pixeagle_common::frame::Frame;

use crate::backend::DetectorBackend;
use crate::error::DetectorError;
use crate::options::DetectOptions;

pub struct SimulationDetector {
    model: String,
    script: Vec<Vec<Detection>>,
    cursor: usize,
}

impl SimulationDetector {
    pub fn new() -> Self {
        Self {
            model: "default".to_string(),
            script: Vec::new(),
            cursor: 0,
        }
    }

    /// Replace the scripted detection sequence. Intended for tests that need
    /// deterministic detector output to drive the tracker.
    pub fn set_script(&mut self, script: Vec<Vec<Detection>>) {
        self.script = script;
        self.cursor = 0;
    }
}

impl Default for SimulationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for SimulationDetector {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn active_model(&self) -> Option<&str> {
        Some(&self.model)
    }

    fn load_model(&mut self, model: &str, _device: &str) -> Result<(), DetectorError> {
        self.model = model.to_string();
        Ok(())
    }

    fn detect(&mut self, _frame: &Frame, options: &DetectOptions) -> Result<Vec<Detection>, DetectorError> {
        if self.script.is_empty() {
            return Ok(Vec::new());
        }
        let frame_dets = &self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        Ok(frame_dets
            .iter()
            .filter(|d| options.passes(d.class_id, d.confidence))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeagle_common::detection::BoundingBox;

    fn detection(confidence: f32) -> Detection {
        Detection {
            bbox: BoundingBox {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            confidence,
            class_id: 0,
            class_name: "target".to_string(),
            mask: None,
            embedding: None,
        }
    }

    #[test]
    fn empty_script_yields_no_detections() {
        let mut backend = SimulationDetector::new();
        let frame = Frame::new(0, 0, 1, 1, pixeagle_common::frame::PixelFormat::Gray8, vec![0]);
        assert!(backend.detect(&frame, &DetectOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn script_cycles_once_exhausted() {
        let mut backend = SimulationDetector::new();
        backend.set_script(vec![vec![detection(0.9)], vec![]]);
        let frame = Frame::new(0, 0, 1, 1, pixeagle_common::frame::PixelFormat::Gray8, vec![0]);
        let opts = DetectOptions::default();
        assert_eq!(backend.detect(&frame, &opts).unwrap().len(), 1);
        assert_eq!(backend.detect(&frame, &opts).unwrap().len(), 0);
        assert_eq!(backend.detect(&frame, &opts).unwrap().len(), 1);
    }
}
