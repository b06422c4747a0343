//! Shared YOLO preprocessing and post-processing for the ONNX backends.

use crate::shared::frame::Frame;

/// Geometry of a letterbox transform; maps model-space points back to frame
/// coordinates. Kept separate from the tensor so the tensor can be handed to
/// the session by value.
#[derive(Clone, Copy, Debug)]
pub struct LetterboxMapping {
    pub scale: f64,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl LetterboxMapping {
    /// Maps a letterbox-space coordinate back into frame space.
    pub fn unmap(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.pad_x as f64) / self.scale,
            (y - self.pad_y as f64) / self.scale,
        )
    }
}

/// Letterbox-resize a frame to `target_size` x `target_size`, preserving
/// aspect ratio and padding with 114/255 gray (YOLO convention).
///
/// Returns the NCHW float32 input (normalized to [0, 1]) and its mapping.
pub fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, LetterboxMapping) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = (fw * scale).round() as u32;
    let new_h = (fh * scale).round() as u32;
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = frame.as_ndarray(); // [H, W, C] u8
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        LetterboxMapping {
            scale,
            pad_x,
            pad_y,
        },
    )
}

/// Reads the square input resolution from a session's first input (NCHW);
/// falls back when the shape is dynamic or unreadable.
pub fn session_input_size(session: &ort::session::Session, fallback: u32) -> u32 {
    session
        .inputs()
        .first()
        .and_then(|input| {
            if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                if shape.len() >= 4 && shape[2] > 0 {
                    Some(shape[2] as u32)
                } else {
                    None
                }
            } else {
                None
            }
        })
        .unwrap_or(fallback)
}

/// A decoded candidate box in letterbox-unmapped frame coordinates.
#[derive(Clone, Debug)]
pub struct RawBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
    pub class_id: usize,
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
pub fn nms(boxes: &mut [RawBox], iou_thresh: f64) -> Vec<RawBox> {
    boxes.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; boxes.len()];

    for i in 0..boxes.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(boxes[i].clone());
        for j in (i + 1)..boxes.len() {
            if !suppressed[j] && box_iou(&boxes[i], &boxes[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn box_iou(a: &RawBox, b: &RawBox) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    inter / (area_a + area_b - inter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_box(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> RawBox {
        RawBox {
            x1,
            y1,
            x2,
            y2,
            confidence,
            class_id: 0,
        }
    }

    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        // 200x100 frame -> 640x640: scale 3.2, new 640x320, pad_y 160.
        let frame = Frame::new(vec![128u8; 200 * 100 * 3], 200, 100, 3, 0, 0.0);
        let (tensor, map) = letterbox(&frame, 640);

        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert!((map.scale - 3.2).abs() < 0.01);
        assert_eq!(map.pad_x, 0);
        assert_eq!(map.pad_y, 160);
    }

    #[test]
    fn test_letterbox_square_frame_has_no_padding() {
        let frame = Frame::new(vec![128u8; 100 * 100 * 3], 100, 100, 3, 0, 0.0);
        let (_, map) = letterbox(&frame, 640);
        assert!((map.scale - 6.4).abs() < 0.01);
        assert_eq!(map.pad_x, 0);
        assert_eq!(map.pad_y, 0);
    }

    #[test]
    fn test_letterbox_values_normalized_and_padded() {
        let frame = Frame::new(vec![255u8; 100 * 50 * 3], 100, 50, 3, 0, 0.0);
        let (tensor, map) = letterbox(&frame, 640);

        // Image pixel ~1.0, pad pixel ~114/255.
        let y = map.pad_y as usize + 1;
        assert!((tensor[[0, 0, y, 1]] - 1.0).abs() < 0.01);
        assert!((tensor[[0, 0, 0, 0]] - 114.0 / 255.0).abs() < 0.01);
    }

    #[test]
    fn test_unmap_round_trips_through_letterbox_space() {
        let frame = Frame::new(vec![0u8; 200 * 100 * 3], 200, 100, 3, 0, 0.0);
        let (_, map) = letterbox(&frame, 640);

        // Frame point (50, 25) maps to letterbox (50*3.2, 25*3.2 + 160).
        let (x, y) = map.unmap(50.0 * 3.2, 25.0 * 3.2 + 160.0);
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_nms_suppresses_overlapping() {
        let mut boxes = vec![
            raw_box(0.0, 0.0, 100.0, 100.0, 0.9),
            raw_box(5.0, 5.0, 105.0, 105.0, 0.8),
        ];
        let kept = nms(&mut boxes, 0.3);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_nms_keeps_non_overlapping() {
        let mut boxes = vec![
            raw_box(0.0, 0.0, 50.0, 50.0, 0.9),
            raw_box(200.0, 200.0, 250.0, 250.0, 0.8),
        ];
        assert_eq!(nms(&mut boxes, 0.3).len(), 2);
    }

    #[test]
    fn test_nms_highest_confidence_wins() {
        let mut boxes = vec![
            raw_box(0.0, 0.0, 100.0, 100.0, 0.5),
            raw_box(2.0, 2.0, 102.0, 102.0, 0.9),
        ];
        let kept = nms(&mut boxes, 0.3);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_nms_empty_input() {
        let mut boxes: Vec<RawBox> = Vec::new();
        assert!(nms(&mut boxes, 0.3).is_empty());
    }
}
