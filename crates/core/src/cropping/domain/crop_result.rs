use crate::shared::frame::Frame;

/// A resized crop and the landmark-region tags of the face it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct CropResult {
    pub frame: Frame,
    pub tags: Vec<String>,
}
