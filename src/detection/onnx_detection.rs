/// ONNX-based ingredient detection with a YOLO11 model exported from the training run
/// The model and its label vocabulary are loaded from disk, one session per detector
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context};
use image::RgbImage;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

use super::orientation::load_upright_image;
use super::{load_labels, select_first_label, DetectionResult, Detector, RawDetection};
use super::CONFIDENCE_THRESHOLD;
use crate::error::{FoodeeError, Result};

const INPUT_SIZE: u32 = 640;
const IOU_THRESHOLD: f32 = 0.4;

/// Internal detection structure, center format in model input pixels
#[derive(Debug, Clone)]
struct Detection {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    confidence: f32,
    class_id: usize,
}

/// YOLO detector backed by ONNX Runtime
pub struct OnnxDetector {
    session: Mutex<Session>,
    labels: Vec<String>,
}

impl OnnxDetector {
    pub fn from_files(model_path: &Path, labels_path: &Path) -> Result<Self> {
        let labels = load_labels(labels_path)?;
        let session = build_session(model_path)
            .map_err(|e| FoodeeError::Inference(format!("{:#}", e)))?;

        tracing::info!(
            model = %model_path.display(),
            classes = labels.len(),
            "loaded detection model"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
        })
    }

    /// Run the model and return every box in the order the model reports it
    fn run_model(&self, img: &RgbImage) -> anyhow::Result<Vec<RawDetection>> {
        let resized = image::imageops::resize(
            img,
            INPUT_SIZE,
            INPUT_SIZE,
            image::imageops::FilterType::CatmullRom,
        );
        let tensor_data = prepare_tensor(&resized);
        let input_shape = vec![1usize, 3, INPUT_SIZE as usize, INPUT_SIZE as usize];
        let input_value = Tensor::from_array((input_shape, tensor_data))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("detection session lock poisoned"))?;
        let outputs = session.run(ort::inputs!["images" => input_value])?;

        let (output_shape, output_data) = outputs["output0"].try_extract_tensor::<f32>()?;
        let shape_vec: Vec<usize> = output_shape.iter().map(|&x| x as usize).collect();

        let detections =
            process_yolo_output(output_data, &shape_vec, CONFIDENCE_THRESHOLD, IOU_THRESHOLD)?;

        // Scale back to original image size
        let (width, height) = img.dimensions();
        let scale_x = width as f32 / INPUT_SIZE as f32;
        let scale_y = height as f32 / INPUT_SIZE as f32;

        Ok(detections
            .into_iter()
            .map(|det| RawDetection {
                class_id: det.class_id,
                confidence: det.confidence,
                bounding_box: [
                    ((det.x - det.width / 2.0) * scale_x).max(0.0),
                    ((det.y - det.height / 2.0) * scale_y).max(0.0),
                    (det.x + det.width / 2.0) * scale_x,
                    (det.y + det.height / 2.0) * scale_y,
                ],
            })
            .collect())
    }
}

impl Detector for OnnxDetector {
    fn detect(&self, image_path: &Path) -> Result<DetectionResult> {
        let img = load_upright_image(image_path)
            .map_err(|e| FoodeeError::Inference(format!("{:#}", e)))?;
        let detections = self
            .run_model(&img)
            .map_err(|e| FoodeeError::Inference(format!("{:#}", e)))?;

        tracing::debug!(
            path = %image_path.display(),
            boxes = detections.len(),
            "model inference finished"
        );

        select_first_label(&detections, CONFIDENCE_THRESHOLD, &self.labels)
    }
}

fn build_session(model_path: &Path) -> anyhow::Result<Session> {
    if !model_path.exists() {
        bail!("model file not found: {}", model_path.display());
    }

    let _ = ort::init().with_name("foodee").commit();

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(4)?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load model: {}", model_path.display()))?;
    Ok(session)
}

/// Prepare tensor data from image
fn prepare_tensor(img: &RgbImage) -> Vec<f32> {
    let (width, height) = img.dimensions();
    let mut tensor_data = Vec::with_capacity(3 * (width * height) as usize);

    // NCHW, normalized to 0..1
    for c in 0..3 {
        for y in 0..height {
            for x in 0..width {
                let pixel = img.get_pixel(x, y);
                tensor_data.push(pixel[c] as f32 / 255.0);
            }
        }
    }

    tensor_data
}

/// Decode a `[1, 4 + classes, predictions]` YOLO output tensor
///
/// Returned boxes are sorted by descending confidence after NMS
fn process_yolo_output(
    output_data: &[f32],
    shape: &[usize],
    confidence_threshold: f32,
    iou_threshold: f32,
) -> anyhow::Result<Vec<Detection>> {
    if shape.len() != 3 || shape[0] != 1 || shape[1] <= 4 {
        bail!("unexpected model output shape {:?}", shape);
    }
    let features = shape[1];
    let predictions = shape[2];
    if output_data.len() < features * predictions {
        bail!(
            "model output has {} values, shape {:?} needs {}",
            output_data.len(),
            shape,
            features * predictions
        );
    }

    let mut detections = Vec::new();

    for i in 0..predictions {
        // Data is laid out feature-major
        let at = |j: usize| output_data[j * predictions + i];

        let best = (4..features)
            .map(|j| (j - 4, at(j)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b));

        if let Some((class_id, confidence)) = best {
            if confidence >= confidence_threshold {
                detections.push(Detection {
                    x: at(0),
                    y: at(1),
                    width: at(2),
                    height: at(3),
                    confidence,
                    class_id,
                });
            }
        }
    }

    Ok(non_maximum_suppression(detections, iou_threshold))
}

/// Non-Maximum Suppression to remove overlapping boxes
fn non_maximum_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Detection> = Vec::new();
    for det in detections {
        let overlaps = keep
            .iter()
            .any(|k| k.class_id == det.class_id && calculate_iou(k, &det) >= iou_threshold);
        if !overlaps {
            keep.push(det);
        }
    }

    keep
}

/// Calculate Intersection over Union (IoU) between two boxes
fn calculate_iou(box1: &Detection, box2: &Detection) -> f32 {
    let inter_x1 = (box1.x - box1.width / 2.0).max(box2.x - box2.width / 2.0);
    let inter_y1 = (box1.y - box1.height / 2.0).max(box2.y - box2.height / 2.0);
    let inter_x2 = (box1.x + box1.width / 2.0).min(box2.x + box2.width / 2.0);
    let inter_y2 = (box1.y + box1.height / 2.0).min(box2.y + box2.height / 2.0);

    if inter_x2 < inter_x1 || inter_y2 < inter_y1 {
        return 0.0;
    }

    let inter_area = (inter_x2 - inter_x1) * (inter_y2 - inter_y1);
    let union_area = box1.width * box1.height + box2.width * box2.height - inter_area;
    if union_area <= 0.0 {
        return 0.0;
    }

    inter_area / union_area
}
