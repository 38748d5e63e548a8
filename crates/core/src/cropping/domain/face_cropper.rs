use crate::cropping::domain::crop_policy::CropPolicy;
use crate::cropping::domain::crop_result::CropResult;
use crate::cropping::domain::frame_resizer::FrameResizer;
use crate::detection::domain::face_landmarks::LandmarkSet;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Crops a frame to the bounding box of one face's landmarks.
///
/// Holds no per-frame state, so the same frame and landmarks always produce
/// the same crop.
pub struct FaceCropper {
    policy: CropPolicy,
    resizer: Box<dyn FrameResizer>,
}

impl FaceCropper {
    pub fn new(policy: CropPolicy, resizer: Box<dyn FrameResizer>) -> Self {
        Self { policy, resizer }
    }

    pub fn policy(&self) -> &CropPolicy {
        &self.policy
    }

    /// The clipped crop box for `landmarks`, or `None` when the box is empty
    /// or falls outside the frame.
    pub fn crop_region(&self, frame: &Frame, landmarks: &LandmarkSet) -> Option<Region> {
        let p = self.policy.padding;
        landmarks
            .bounding_region()?
            .expand(p, p, p, p)
            .clamp_to(frame.width(), frame.height())
    }

    /// Crops and resizes the frame around `landmarks`.
    ///
    /// Returns `Ok(None)` for an empty landmark set or a degenerate box.
    pub fn crop(
        &self,
        frame: &Frame,
        landmarks: &LandmarkSet,
    ) -> Result<Option<CropResult>, Box<dyn std::error::Error>> {
        let Some(region) = self.crop_region(frame, landmarks) else {
            log::debug!("Frame {}: empty landmark box, skipping", frame.index());
            return Ok(None);
        };

        let cropped = frame.crop(&region);
        let resized = self.resizer.resize(&cropped, self.policy.target)?;

        Ok(Some(CropResult {
            frame: resized,
            tags: landmarks.tags(),
        }))
    }
}
