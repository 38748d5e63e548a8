use crate::detection::domain::face_landmarks::LandmarkSet;
use crate::shared::frame::Frame;

/// Domain interface for facial landmark detection.
///
/// Returns one [`LandmarkSet`] per detected face, in detection order. An
/// empty vector means no face was found, which is not an error.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>>;
}
