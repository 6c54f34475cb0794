/// Stand-in detector for builds without AI support or when the model fails to load
/// Keeps the detector seam available so the window still opens and reports the reason on use
use std::path::Path;

use super::{DetectionResult, Detector};
use crate::error::{FoodeeError, Result};

pub struct UnavailableDetector {
    reason: String,
}

impl UnavailableDetector {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The detector of a build compiled without the `ai` feature
    pub fn without_ai_feature() -> Self {
        Self::new(
            "ingredient detection is not available. Rebuild with --features ai to enable native ONNX detection",
        )
    }
}

impl Detector for UnavailableDetector {
    fn detect(&self, image_path: &Path) -> Result<DetectionResult> {
        tracing::warn!(path = %image_path.display(), reason = %self.reason, "detection requested but no detector is available");
        Err(FoodeeError::Inference(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_fails_with_inference_error() {
        let err = UnavailableDetector::without_ai_feature()
            .detect(Path::new("tomato.jpg"))
            .unwrap_err();
        assert!(matches!(err, FoodeeError::Inference(_)));
        assert!(err.to_string().contains("--features ai"));
    }

    #[test]
    fn test_reports_given_reason() {
        let err = UnavailableDetector::new("model file not found: best.onnx")
            .detect(Path::new("tomato.jpg"))
            .unwrap_err();
        assert_eq!(err.to_string(), "inference failed: model file not found: best.onnx");
    }
}
