//! Ingredient detection.
//!
//! A [`Detector`] turns an image path into a [`DetectionResult`]. The model
//! backend only has to produce its list of [`RawDetection`]s; which one wins
//! is decided by [`select_first_label`].

pub mod detection_stub;
pub mod orientation;

#[cfg(feature = "ai")]
pub mod onnx_detection;

use std::path::Path;
use std::sync::Arc;

use crate::config_file::AppConfig;
use crate::error::{FoodeeError, Result};

/// Minimum score a box needs before it is considered at all.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionResult {
    Label(String),
    NotFound,
}

impl DetectionResult {
    pub fn label(&self) -> Option<&str> {
        match self {
            DetectionResult::Label(name) => Some(name),
            DetectionResult::NotFound => None,
        }
    }
}

/// One box as reported by the model, in the model's own order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    /// [x_min, y_min, x_max, y_max] in source image pixels
    pub bounding_box: [f32; 4],
}

/// Something that can recognise an ingredient in a photo.
///
/// Implementations are shared with the analysis worker thread.
pub trait Detector: Send + Sync {
    fn detect(&self, image_path: &Path) -> Result<DetectionResult>;
}

/// Label of the first reported box that clears `threshold`.
///
/// Later boxes are never consulted, even when they score higher.
pub fn select_first_label(
    detections: &[RawDetection],
    threshold: f32,
    labels: &[String],
) -> Result<DetectionResult> {
    let Some(first) = detections.iter().find(|d| d.confidence >= threshold) else {
        return Ok(DetectionResult::NotFound);
    };

    labels
        .get(first.class_id)
        .map(|name| DetectionResult::Label(name.clone()))
        .ok_or_else(|| {
            FoodeeError::Inference(format!(
                "model reported class {} but the label vocabulary has {} entries",
                first.class_id,
                labels.len()
            ))
        })
}

/// Read a label vocabulary: one class name per line, line number = class id.
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        FoodeeError::Inference(format!(
            "failed to read label file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut labels: Vec<String> = contents.lines().map(|l| l.trim().to_string()).collect();
    while labels.last().is_some_and(|l| l.is_empty()) {
        labels.pop();
    }

    if labels.is_empty() {
        return Err(FoodeeError::Inference(format!(
            "label file {} is empty",
            path.display()
        )));
    }
    Ok(labels)
}

/// Build the detector this binary was compiled with.
#[cfg(feature = "ai")]
pub fn create_default_detector(config: &AppConfig) -> Result<Arc<dyn Detector>> {
    let detector = onnx_detection::OnnxDetector::from_files(
        &config.model_path(),
        &config.labels_path(),
    )?;
    Ok(Arc::new(detector))
}

/// Build the detector this binary was compiled with.
#[cfg(not(feature = "ai"))]
pub fn create_default_detector(_config: &AppConfig) -> Result<Arc<dyn Detector>> {
    Ok(Arc::new(detection_stub::UnavailableDetector::without_ai_feature()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["Tomato".to_string(), "Onion".to_string(), "Egg".to_string()]
    }

    fn det(class_id: usize, confidence: f32) -> RawDetection {
        RawDetection {
            class_id,
            confidence,
            bounding_box: [0.0, 0.0, 10.0, 10.0],
        }
    }

    #[test]
    fn test_first_reported_box_wins_over_higher_score() {
        let detections = vec![det(1, 0.55), det(0, 0.98), det(2, 0.9)];
        let result = select_first_label(&detections, CONFIDENCE_THRESHOLD, &labels()).unwrap();
        assert_eq!(result, DetectionResult::Label("Onion".to_string()));
    }

    #[test]
    fn test_boxes_below_threshold_are_skipped() {
        let detections = vec![det(2, 0.3), det(0, 0.7)];
        let result = select_first_label(&detections, CONFIDENCE_THRESHOLD, &labels()).unwrap();
        assert_eq!(result, DetectionResult::Label("Tomato".to_string()));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let detections = vec![det(2, 0.5)];
        let result = select_first_label(&detections, CONFIDENCE_THRESHOLD, &labels()).unwrap();
        assert_eq!(result.label(), Some("Egg"));
    }

    #[test]
    fn test_nothing_above_threshold_is_not_found() {
        let detections = vec![det(0, 0.49), det(1, 0.1)];
        let result = select_first_label(&detections, CONFIDENCE_THRESHOLD, &labels()).unwrap();
        assert_eq!(result, DetectionResult::NotFound);
        assert_eq!(result.label(), None);

        let empty = select_first_label(&[], CONFIDENCE_THRESHOLD, &labels()).unwrap();
        assert_eq!(empty, DetectionResult::NotFound);
    }

    #[test]
    fn test_unknown_class_is_inference_error() {
        let detections = vec![det(7, 0.9)];
        let err = select_first_label(&detections, CONFIDENCE_THRESHOLD, &labels()).unwrap_err();
        assert!(matches!(err, FoodeeError::Inference(_)));
    }

    #[test]
    fn test_load_labels_keeps_line_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        std::fs::write(&path, "Tomato\n Onion \nEgg\n\n").unwrap();

        let loaded = load_labels(&path).unwrap();
        assert_eq!(loaded, labels());
    }

    #[test]
    fn test_load_labels_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_labels(&dir.path().join("nope.txt")).is_err());

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n").unwrap();
        assert!(load_labels(&empty).is_err());
    }
}
