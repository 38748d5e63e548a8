use ndarray::s;

use crate::cropping::domain::crop_result::CropResult;
use crate::cropping::domain::frame_resizer::FrameResizer;
use crate::detection::domain::face_landmarks::LandmarkSet;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Growth of the face box towards the top of the head.
const HEAD_TOP: f64 = 0.5;
const HEAD_BOTTOM: f64 = 0.25;
const HEAD_SIDES: f64 = 0.1;

/// Fill for the letterbox bars.
const PAD_COLOR: [u8; 3] = [0, 0, 0];

/// Tags that precede the feature tags on every head crop.
const HEAD_TAGS: [&str; 2] = ["head", "face"];

/// Crops the whole head around a face and letterboxes it into a fixed size,
/// keeping the aspect ratio.
pub struct HeadCropper {
    target: (u32, u32),
    resizer: Box<dyn FrameResizer>,
}

impl HeadCropper {
    pub fn new(target: (u32, u32), resizer: Box<dyn FrameResizer>) -> Self {
        Self { target, resizer }
    }

    /// The face box grown to cover the head, clipped to the frame.
    pub fn head_region(frame: &Frame, landmarks: &LandmarkSet) -> Option<Region> {
        landmarks
            .bounding_region()?
            .expand(HEAD_SIDES, HEAD_TOP, HEAD_SIDES, HEAD_BOTTOM)
            .clamp_to(frame.width(), frame.height())
    }

    pub fn crop(
        &self,
        frame: &Frame,
        landmarks: &LandmarkSet,
    ) -> Result<Option<CropResult>, Box<dyn std::error::Error>> {
        let Some(region) = Self::head_region(frame, landmarks) else {
            return Ok(None);
        };

        let head = frame.crop(&region);
        let (w, h) = fit_within(head.width(), head.height(), self.target);
        let scaled = self.resizer.resize(&head, (w, h))?;

        let mut tags: Vec<String> = HEAD_TAGS.iter().map(|t| t.to_string()).collect();
        tags.extend(landmarks.tags());

        Ok(Some(CropResult {
            frame: pad_center(&scaled, self.target),
            tags,
        }))
    }
}

/// Largest size with the source aspect ratio that fits inside `target`.
fn fit_within(width: u32, height: u32, target: (u32, u32)) -> (u32, u32) {
    let scale = (target.0 as f64 / width as f64).min(target.1 as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, target.0);
    let h = ((height as f64 * scale).round() as u32).clamp(1, target.1);
    (w, h)
}

/// Centers `frame` on a `target`-sized canvas filled with [`PAD_COLOR`].
fn pad_center(frame: &Frame, target: (u32, u32)) -> Frame {
    let (tw, th) = target;
    let mut canvas = Frame::new(
        PAD_COLOR.repeat((tw * th) as usize),
        tw,
        th,
        3,
        frame.index(),
    );

    let x0 = ((tw - frame.width()) / 2) as usize;
    let y0 = ((th - frame.height()) / 2) as usize;
    let (w, h) = (frame.width() as usize, frame.height() as usize);

    canvas
        .as_ndarray_mut()
        .slice_mut(s![y0..y0 + h, x0..x0 + w, ..])
        .assign(&frame.as_ndarray());
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropping::infrastructure::image_frame_resizer::ImageFrameResizer;
    use crate::detection::domain::face_landmarks::LandmarkRegion;
    use crate::test_support::make_frame;

    fn face(points: Vec<(f64, f64)>) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        set.insert(LandmarkRegion::NoseTip, points);
        set
    }

    #[test]
    fn test_head_region_expands_asymmetrically() {
        let frame = make_frame(1000, 1000, 0);
        let set = face(vec![(400.0, 400.0), (500.0, 600.0)]);
        // 100x200 box: 10 px sides, 100 px up, 50 px down
        let region = HeadCropper::head_region(&frame, &set).unwrap();
        assert_eq!(region, Region::from_corners(390, 300, 510, 650));
    }

    #[test]
    fn test_head_region_clipped_to_frame() {
        let frame = make_frame(200, 200, 0);
        let set = face(vec![(10.0, 20.0), (110.0, 120.0)]);
        let region = HeadCropper::head_region(&frame, &set).unwrap();
        assert_eq!(region.x, 0);
        assert_eq!(region.y, 0);
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        assert_eq!(fit_within(100, 200, (512, 512)), (256, 512));
        assert_eq!(fit_within(300, 150, (512, 512)), (512, 256));
        assert_eq!(fit_within(64, 64, (512, 512)), (512, 512));
    }

    #[test]
    fn test_crop_is_letterboxed_and_tagged() {
        let frame = make_frame(1000, 1000, 2);
        let set = face(vec![(400.0, 400.0), (500.0, 600.0)]);
        let cropper = HeadCropper::new((512, 512), Box::new(ImageFrameResizer));
        let result = cropper.crop(&frame, &set).unwrap().unwrap();

        assert_eq!((result.frame.width(), result.frame.height()), (512, 512));
        assert_eq!(result.frame.index(), 2);
        assert_eq!(result.tags, vec!["head", "face", "nose_tip"]);

        // 120x350 head → bars left and right, content in the middle
        let px = result.frame.as_ndarray();
        assert_eq!(px[[256, 0, 0]], PAD_COLOR[0]);
        assert_eq!(px[[256, 256, 0]], 128);
    }

    #[test]
    fn test_crop_outside_frame_yields_none() {
        let frame = make_frame(100, 100, 0);
        let set = face(vec![(300.0, 300.0), (400.0, 400.0)]);
        let cropper = HeadCropper::new((512, 512), Box::new(ImageFrameResizer));
        assert!(cropper.crop(&frame, &set).unwrap().is_none());
    }
}
