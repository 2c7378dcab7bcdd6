//! Per-call detection options.

/// Tunables for a single `detect` call. Every field has a meaningful
/// "don't filter" default so callers can pass `DetectOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    pub class_filter: Option<Vec<u32>>,
    pub confidence_threshold: f32,
    pub want_embedding: bool,
}

impl DetectOptions {
    pub fn passes(&self, class_id: u32, confidence: f32) -> bool {
        if confidence < self.confidence_threshold {
            return false;
        }
        match &self.class_filter {
            Some(allowed) => allowed.contains(&class_id),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_accept_everything_above_zero_confidence() {
        let opts = DetectOptions::default();
        assert!(opts.passes(7, 0.01));
    }

    #[test]
    fn confidence_threshold_rejects_low_scores() {
        let opts = DetectOptions {
            confidence_threshold: 0.5,
            ..Default::default()
        };
        assert!(!opts.passes(1, 0.3));
        assert!(opts.passes(1, 0.6));
    }

    #[test]
    fn class_filter_restricts_to_named_classes() {
        let opts = DetectOptions {
            class_filter: Some(vec![2, 3]),
            ..Default::default()
        };
        assert!(opts.passes(2, 1.0));
        assert!(!opts.passes(4, 1.0));
    }
}
