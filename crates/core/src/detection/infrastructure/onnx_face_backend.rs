/// YOLO-pose face detector using ONNX Runtime via `ort`.
///
/// The model head emits `[cx, cy, w, h, conf, 5 x (kx, ky, kscore)]` per
/// candidate: box plus five facial keypoints (eyes, nose, mouth corners).
use std::path::Path;

use crate::detection::domain::backend::{BackendError, FaceBackend};
use crate::shared::detection::FaceDetection;
use crate::shared::frame::Frame;

use super::preprocess::{self, RawBox};

const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const NMS_IOU_THRESH: f64 = 0.45;

const NUM_KEYPOINTS: usize = 5;

/// Keypoint values per detection (x, y, score each).
const NUM_KEYPOINT_VALUES: usize = NUM_KEYPOINTS * 3;

/// Minimum keypoint score to treat a landmark as visible.
const KEYPOINT_SCORE_THRESH: f64 = 0.5;

pub struct OnnxFaceBackend {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxFaceBackend {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        let input_size = preprocess::session_input_size(&session, DEFAULT_INPUT_SIZE);
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }

    fn run(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        let fw = frame.width() as f64;
        let fh = frame.height() as f64;

        let (input_tensor, map) = preprocess::letterbox(frame, self.input_size);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape();

        let (num_dets, num_feats, transposed) = if shape.len() == 3 {
            if shape[1] < shape[2] {
                (shape[2], shape[1], true)
            } else {
                (shape[1], shape[2], false)
            }
        } else {
            return Err(format!("unexpected face model output shape: {shape:?}").into());
        };
        if num_feats < 5 {
            return Err(format!("face model feature dim too small: {num_feats}").into());
        }

        let data = tensor.as_slice().ok_or("cannot get tensor slice")?;
        let has_keypoints = num_feats >= 5 + NUM_KEYPOINT_VALUES;

        let mut raw = Vec::new();
        let mut keypoints = Vec::new();
        for i in 0..num_dets {
            let at = |f: usize| -> f64 {
                if transposed {
                    data[f * num_dets + i] as f64
                } else {
                    data[i * num_feats + f] as f64
                }
            };

            let conf = at(4);
            if conf < self.confidence {
                continue;
            }

            let (cx, cy, w, h) = (at(0), at(1), at(2), at(3));
            let (x1, y1) = map.unmap(cx - w / 2.0, cy - h / 2.0);
            let (x2, y2) = map.unmap(cx + w / 2.0, cy + h / 2.0);

            let kps = has_keypoints.then(|| {
                let mut points = vec![(0.0f64, 0.0f64); NUM_KEYPOINTS];
                let mut scores = vec![0.0f64; NUM_KEYPOINTS];
                for k in 0..NUM_KEYPOINTS {
                    let score = at(5 + k * 3 + 2);
                    scores[k] = score.clamp(0.0, 1.0);
                    if score >= KEYPOINT_SCORE_THRESH {
                        points[k] = map.unmap(at(5 + k * 3), at(5 + k * 3 + 1));
                    }
                    // else: stays (0, 0), the invisible-landmark convention
                }
                (points, scores)
            });

            // NMS operates on the box list; keypoints ride along by index.
            raw.push(RawBox {
                x1,
                y1,
                x2,
                y2,
                confidence: conf,
                class_id: keypoints.len(),
            });
            keypoints.push(kps);
        }

        let kept = preprocess::nms(&mut raw, NMS_IOU_THRESH);

        Ok(kept
            .into_iter()
            .filter_map(|b| {
                let x1 = b.x1.clamp(0.0, fw);
                let y1 = b.y1.clamp(0.0, fh);
                let x2 = b.x2.clamp(0.0, fw);
                let y2 = b.y2.clamp(0.0, fh);
                if x2 - x1 <= 0.0 || y2 - y1 <= 0.0 {
                    return None;
                }
                let mut face = FaceDetection::new((x1, y1), (x2, y2));
                if let Some((points, scores)) = keypoints[b.class_id].clone() {
                    face.landmarks = Some(points);
                    face.landmark_scores = Some(scores);
                }
                Some(face)
            })
            .collect())
    }
}

impl FaceBackend for OnnxFaceBackend {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, BackendError> {
        self.run(frame).map_err(|e| BackendError::Call(e.to_string()))
    }
}
