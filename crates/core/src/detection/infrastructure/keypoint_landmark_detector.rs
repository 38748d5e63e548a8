use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_landmarks::LandmarkSet;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::shared::frame::Frame;

/// Landmarks taken straight from a pose detector's five keypoints.
///
/// Used when no 68-point model is available. Only the eyes, nose tip and
/// lips are tagged. A face without keypoints still yields an (empty) set so
/// detection order is preserved.
pub struct KeypointLandmarkDetector {
    face_detector: Box<dyn FaceDetector>,
}

impl KeypointLandmarkDetector {
    pub fn new(face_detector: Box<dyn FaceDetector>) -> Self {
        Self { face_detector }
    }
}

impl LandmarkDetector for KeypointLandmarkDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
        let faces = self.face_detector.detect(frame)?;
        Ok(faces
            .iter()
            .map(|face| {
                face.keypoints
                    .as_ref()
                    .map(LandmarkSet::from_keypoints)
                    .unwrap_or_default()
            })
            .collect())
    }
}
