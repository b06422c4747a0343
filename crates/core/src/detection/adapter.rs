//! The detection-call boundary: validates and filters backend output,
//! attaches mask readings, and absorbs every failure into the synthetic
//! fallback path. Nothing past this point ever sees a detection error.

use crate::analysis::mask_detector;
use crate::detection::domain::backend::{FaceBackend, LoadedBackends, ObjectBackend};
use crate::detection::infrastructure::mock_backend::MockBackend;
use crate::shared::constants::MIN_OBJECT_CONFIDENCE;
use crate::shared::detection::{Detection, FaceDetection};
use crate::shared::frame::Frame;

pub struct DetectionAdapter {
    objects: Option<Box<dyn ObjectBackend>>,
    faces: Option<Box<dyn FaceBackend>>,
    mock: MockBackend,
}

impl DetectionAdapter {
    pub fn new() -> Self {
        Self {
            objects: None,
            faces: None,
            mock: MockBackend::new(),
        }
    }

    /// Deterministic fallback randomness for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            objects: None,
            faces: None,
            mock: MockBackend::with_seed(seed),
        }
    }

    /// Installs whatever the lifecycle loaded. A capability that stays `None`
    /// keeps its synthetic path; an already-installed backend is not replaced
    /// by `None`.
    pub fn attach(&mut self, backends: LoadedBackends) {
        if backends.objects.is_some() {
            self.objects = backends.objects;
        }
        if backends.faces.is_some() {
            self.faces = backends.faces;
        }
    }

    pub fn has_real_objects(&self) -> bool {
        self.objects.is_some()
    }

    pub fn has_real_faces(&self) -> bool {
        self.faces.is_some()
    }

    /// Never errors: a failing backend call logs a warning and substitutes
    /// synthetic detections for this tick. Results are filtered to
    /// confidence > 0.3 and structurally valid boxes.
    pub fn detect_objects(&mut self, frame: &Frame) -> Vec<Detection> {
        let raw = match &mut self.objects {
            Some(backend) => match backend.detect(frame) {
                Ok(detections) => detections,
                Err(e) => {
                    log::warn!("object detection failed, substituting synthetic results: {e}");
                    self.mock.objects(frame)
                }
            },
            None => self.mock.objects(frame),
        };

        raw.into_iter()
            .filter(|d| d.confidence > MIN_OBJECT_CONFIDENCE && d.bbox.is_valid())
            .collect()
    }

    /// Never errors. Every face from the real backend gets a mask reading
    /// attached; mock faces keep the synthetic flags they were born with.
    pub fn detect_faces(&mut self, frame: &Frame) -> Vec<FaceDetection> {
        match &mut self.faces {
            Some(backend) => match backend.detect(frame) {
                Ok(mut faces) => {
                    for face in &mut faces {
                        let reading = mask_detector::analyze(frame, face);
                        face.has_mask = Some(reading.has_mask);
                        face.mask_confidence = Some(reading.confidence);
                    }
                    faces
                }
                Err(e) => {
                    log::warn!("face detection failed, substituting synthetic results: {e}");
                    self.mock.faces(frame)
                }
            },
            None => self.mock.faces(frame),
        }
    }
}

impl Default for DetectionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::backend::BackendError;
    use crate::shared::detection::BoundingBox;

    struct FakeObjectBackend {
        results: Vec<Detection>,
        fail: bool,
    }

    impl ObjectBackend for FakeObjectBackend {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, BackendError> {
            if self.fail {
                Err(BackendError::Call("injected".into()))
            } else {
                Ok(self.results.clone())
            }
        }
    }

    struct FakeFaceBackend {
        results: Vec<FaceDetection>,
        fail: bool,
    }

    impl FaceBackend for FakeFaceBackend {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, BackendError> {
            if self.fail {
                Err(BackendError::Call("injected".into()))
            } else {
                Ok(self.results.clone())
            }
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0u8; 100 * 100 * 3], 100, 100, 3, 0, 0.0)
    }

    fn adapter_with_objects(backend: FakeObjectBackend) -> DetectionAdapter {
        let mut adapter = DetectionAdapter::with_seed(1);
        adapter.attach(LoadedBackends {
            objects: Some(Box::new(backend)),
            faces: None,
        });
        adapter
    }

    fn detection(label: &str, confidence: f64, bbox: BoundingBox) -> Detection {
        Detection::new(label, confidence, bbox)
    }

    #[test]
    fn test_filters_low_confidence_and_invalid_boxes() {
        let valid = BoundingBox::new(10.0, 10.0, 50.0, 50.0);
        let backend = FakeObjectBackend {
            results: vec![
                detection("person", 0.9, valid),
                detection("person", 0.2, valid), // below 0.3
                detection("chair", 0.8, BoundingBox::new(10.0, 10.0, 0.0, 50.0)),
                detection("chair", 0.8, BoundingBox::new(-5.0, 10.0, 50.0, 50.0)),
            ],
            fail: false,
        };
        let mut adapter = adapter_with_objects(backend);

        let result = adapter.detect_objects(&frame());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "person");
    }

    #[test]
    fn test_backend_error_falls_back_to_mock() {
        let backend = FakeObjectBackend {
            results: vec![],
            fail: true,
        };
        let mut adapter = adapter_with_objects(backend);

        // Must not panic or propagate; every surfaced detection is valid.
        for _ in 0..50 {
            for det in adapter.detect_objects(&frame()) {
                assert!(det.bbox.is_valid());
                assert!(det.confidence > MIN_OBJECT_CONFIDENCE);
            }
        }
    }

    #[test]
    fn test_no_backend_uses_mock_path() {
        let mut adapter = DetectionAdapter::with_seed(9);
        assert!(!adapter.has_real_objects());
        let mut saw_any = false;
        for _ in 0..50 {
            saw_any |= !adapter.detect_objects(&frame()).is_empty();
        }
        assert!(saw_any);
    }

    #[test]
    fn test_real_faces_get_mask_reading_attached() {
        let face = FaceDetection::new((10.0, 10.0), (60.0, 60.0));
        let backend = FakeFaceBackend {
            results: vec![face],
            fail: false,
        };
        let mut adapter = DetectionAdapter::with_seed(1);
        adapter.attach(LoadedBackends {
            objects: None,
            faces: Some(Box::new(backend)),
        });

        let faces = adapter.detect_faces(&frame());
        assert_eq!(faces.len(), 1);
        assert!(faces[0].has_mask.is_some());
        assert!(faces[0].mask_confidence.is_some());
    }

    #[test]
    fn test_mask_reading_reflects_frame_content() {
        // Black frame: the face's lower half is near-black, i.e. fabric-like
        // everywhere, so the heuristic must call it a mask at max confidence.
        let face = FaceDetection::new((10.0, 10.0), (60.0, 60.0));
        let backend = FakeFaceBackend {
            results: vec![face],
            fail: false,
        };
        let mut adapter = DetectionAdapter::with_seed(1);
        adapter.attach(LoadedBackends {
            objects: None,
            faces: Some(Box::new(backend)),
        });

        let faces = adapter.detect_faces(&frame());
        assert_eq!(faces[0].has_mask, Some(true));
        assert_eq!(faces[0].mask_confidence, Some(0.95));
    }

    #[test]
    fn test_face_backend_error_falls_back_to_mock() {
        let backend = FakeFaceBackend {
            results: vec![],
            fail: true,
        };
        let mut adapter = DetectionAdapter::with_seed(2);
        adapter.attach(LoadedBackends {
            objects: None,
            faces: Some(Box::new(backend)),
        });

        let mut saw_face = false;
        for _ in 0..50 {
            for face in adapter.detect_faces(&frame()) {
                saw_face = true;
                // Mock faces carry their own synthetic mask flags.
                assert!(face.has_mask.is_some());
            }
        }
        assert!(saw_face);
    }

    #[test]
    fn test_attach_does_not_clear_installed_backend() {
        let backend = FakeObjectBackend {
            results: vec![detection(
                "person",
                0.9,
                BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            )],
            fail: false,
        };
        let mut adapter = adapter_with_objects(backend);
        adapter.attach(LoadedBackends::default());

        assert!(adapter.has_real_objects());
        assert_eq!(adapter.detect_objects(&frame()).len(), 1);
    }
}
