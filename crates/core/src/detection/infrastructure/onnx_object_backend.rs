/// COCO object detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference, class-score decoding, and NMS
/// post-processing. Raw model output is treated as untrusted: malformed or
/// degenerate candidates are rejected here rather than surfaced.
use std::path::Path;

use crate::detection::domain::backend::{BackendError, ObjectBackend};
use crate::shared::detection::{BoundingBox, Detection};
use crate::shared::frame::Frame;

use super::preprocess::{self, RawBox};

/// Fallback input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for object detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// The 80 COCO class labels, in model output order.
pub const COCO_LABELS: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// YOLO COCO detector backed by an ONNX Runtime session.
pub struct OnnxObjectBackend {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxObjectBackend {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting
    /// NCHW); falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        let input_size = preprocess::session_input_size(&session, DEFAULT_INPUT_SIZE);
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }

    fn run(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let fw = frame.width() as f64;
        let fh = frame.height() as f64;

        let (input_tensor, map) = preprocess::letterbox(frame, self.input_size);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("object model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape();

        // Output is [1, 4+classes, N] (transposed) or [1, N, 4+classes].
        let (num_dets, num_feats, transposed) = if shape.len() == 3 {
            if shape[1] < shape[2] {
                (shape[2], shape[1], true)
            } else {
                (shape[1], shape[2], false)
            }
        } else {
            return Err(format!("unexpected object model output shape: {shape:?}").into());
        };
        if num_feats < 5 {
            return Err(format!("object model feature dim too small: {num_feats}").into());
        }

        let data = tensor.as_slice().ok_or("cannot get tensor slice")?;
        let num_classes = num_feats - 4;

        let mut raw = Vec::new();
        for i in 0..num_dets {
            let at = |f: usize| -> f64 {
                if transposed {
                    data[f * num_dets + i] as f64
                } else {
                    data[i * num_feats + f] as f64
                }
            };

            // Best class by score; no separate objectness in this head.
            let mut class_id = 0usize;
            let mut best = f64::MIN;
            for c in 0..num_classes {
                let score = at(4 + c);
                if score > best {
                    best = score;
                    class_id = c;
                }
            }
            if best < self.confidence || class_id >= COCO_LABELS.len() {
                continue;
            }

            let (cx, cy, w, h) = (at(0), at(1), at(2), at(3));
            let (x1, y1) = map.unmap(cx - w / 2.0, cy - h / 2.0);
            let (x2, y2) = map.unmap(cx + w / 2.0, cy + h / 2.0);

            raw.push(RawBox {
                x1,
                y1,
                x2,
                y2,
                confidence: best,
                class_id,
            });
        }

        let kept = preprocess::nms(&mut raw, NMS_IOU_THRESH);

        Ok(kept
            .into_iter()
            .filter_map(|b| {
                let x1 = b.x1.clamp(0.0, fw);
                let y1 = b.y1.clamp(0.0, fh);
                let x2 = b.x2.clamp(0.0, fw);
                let y2 = b.y2.clamp(0.0, fh);
                let bbox = BoundingBox::new(x1, y1, x2 - x1, y2 - y1);
                bbox.is_valid().then(|| {
                    Detection::new(COCO_LABELS[b.class_id], b.confidence.clamp(0.0, 1.0), bbox)
                })
            })
            .collect())
    }
}

impl ObjectBackend for OnnxObjectBackend {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, BackendError> {
        self.run(frame).map_err(|e| BackendError::Call(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coco_table_has_expected_entries() {
        assert_eq!(COCO_LABELS.len(), 80);
        assert_eq!(COCO_LABELS[0], "person");
        assert_eq!(COCO_LABELS[13], "bench");
        assert_eq!(COCO_LABELS[56], "chair");
        assert_eq!(COCO_LABELS[57], "couch");
        assert_eq!(COCO_LABELS[63], "laptop");
        assert_eq!(COCO_LABELS[67], "cell phone");
        assert_eq!(COCO_LABELS[73], "book");
    }

    #[test]
    fn test_default_confidence_in_range() {
        assert!(DEFAULT_CONFIDENCE > 0.0 && DEFAULT_CONFIDENCE < 1.0);
    }
}
