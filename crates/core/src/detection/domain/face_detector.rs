use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Five-point keypoints from a face-pose model, in frame coordinates.
/// Points the model is not confident about are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceKeypoints {
    pub left_eye: Option<(f64, f64)>,
    pub right_eye: Option<(f64, f64)>,
    pub nose: Option<(f64, f64)>,
    pub left_mouth: Option<(f64, f64)>,
    pub right_mouth: Option<(f64, f64)>,
}

/// A face bounding box in frame coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceDetection {
    pub region: Region,
    pub confidence: f64,
    /// Present when the detector is a pose model.
    pub keypoints: Option<FaceKeypoints>,
}

/// Domain interface for face box detection.
///
/// Results are returned in detection order; the pipeline treats the first
/// entry as "the" face of the frame.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>>;
}
