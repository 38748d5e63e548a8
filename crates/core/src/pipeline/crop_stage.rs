use crate::cropping::domain::crop_result::CropResult;
use crate::cropping::domain::face_cropper::FaceCropper;
use crate::cropping::domain::head_cropper::HeadCropper;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::shared::error::PipelineError;
use crate::shared::frame::Frame;

/// Crops produced from a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameCrops {
    pub feature: CropResult,
    pub head: Option<CropResult>,
}

/// Detect → crop for one frame. Only the first detected face is used.
pub struct CropStage {
    detector: Box<dyn LandmarkDetector>,
    cropper: FaceCropper,
    head_cropper: Option<HeadCropper>,
}

impl CropStage {
    pub fn new(
        detector: Box<dyn LandmarkDetector>,
        cropper: FaceCropper,
        head_cropper: Option<HeadCropper>,
    ) -> Self {
        Self {
            detector,
            cropper,
            head_cropper,
        }
    }

    /// Returns `Ok(None)` when the frame has no usable face.
    pub fn process(&mut self, frame: &Frame) -> Result<Option<FrameCrops>, PipelineError> {
        let faces = self
            .detector
            .detect(frame)
            .map_err(|e| PipelineError::Detection {
                frame: frame.index(),
                reason: e.to_string(),
            })?;

        let Some(first) = faces.first() else {
            log::debug!("Frame {}: no face", frame.index());
            return Ok(None);
        };
        if faces.len() > 1 {
            log::debug!(
                "Frame {}: {} faces, using the first",
                frame.index(),
                faces.len()
            );
        }

        let crop_err = |e: Box<dyn std::error::Error>| PipelineError::Crop {
            frame: frame.index(),
            reason: e.to_string(),
        };

        let Some(feature) = self.cropper.crop(frame, first).map_err(crop_err)? else {
            return Ok(None);
        };
        let head = match &self.head_cropper {
            Some(hc) => hc.crop(frame, first).map_err(crop_err)?,
            None => None,
        };

        Ok(Some(FrameCrops { feature, head }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cropping::domain::crop_policy::CropPolicy;
    use crate::cropping::infrastructure::image_frame_resizer::ImageFrameResizer;
    use crate::detection::domain::face_landmarks::{LandmarkRegion, LandmarkSet};
    use crate::shared::constants::CROP_SIZE;
    use crate::test_support::make_frame;
    use std::collections::HashMap;

    /// Landmark detector returning canned sets keyed by frame index.
    pub(crate) struct StubLandmarkDetector {
        pub faces: HashMap<usize, Vec<LandmarkSet>>,
        pub fail_on: Option<usize>,
    }

    impl StubLandmarkDetector {
        pub fn with_faces_on(frames: &[usize]) -> Self {
            Self {
                faces: frames.iter().map(|&i| (i, vec![face_at(10.0)])).collect(),
                fail_on: None,
            }
        }
    }

    impl LandmarkDetector for StubLandmarkDetector {
        fn detect(
            &mut self,
            frame: &Frame,
        ) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
            if self.fail_on == Some(frame.index()) {
                return Err("inference failed".into());
            }
            Ok(self.faces.get(&frame.index()).cloned().unwrap_or_default())
        }
    }

    /// A face with every region present, offset by `origin`.
    pub(crate) fn face_at(origin: f64) -> LandmarkSet {
        let mut set = LandmarkSet::new();
        for (i, region) in LandmarkRegion::ALL.into_iter().enumerate() {
            let d = i as f64 * 3.0;
            set.insert(
                region,
                vec![(origin + d, origin + d), (origin + d + 20.0, origin + d + 10.0)],
            );
        }
        set
    }

    pub(crate) fn stage(detector: StubLandmarkDetector, head_crops: bool) -> CropStage {
        CropStage::new(
            Box::new(detector),
            FaceCropper::new(CropPolicy::default(), Box::new(ImageFrameResizer)),
            head_crops.then(|| HeadCropper::new(CROP_SIZE, Box::new(ImageFrameResizer))),
        )
    }

    #[test]
    fn test_no_face_is_none() {
        let mut s = stage(StubLandmarkDetector::with_faces_on(&[]), false);
        assert!(s.process(&make_frame(100, 100, 0)).unwrap().is_none());
    }

    #[test]
    fn test_face_yields_all_tags() {
        let mut s = stage(StubLandmarkDetector::with_faces_on(&[0]), false);
        let crops = s.process(&make_frame(100, 100, 0)).unwrap().unwrap();
        assert_eq!(crops.feature.tags.len(), 9);
        assert_eq!(crops.feature.frame.width(), 512);
        assert!(crops.head.is_none());
    }

    #[test]
    fn test_only_first_face_is_used() {
        let mut small = LandmarkSet::new();
        small.insert(LandmarkRegion::NoseTip, vec![(0.0, 0.0), (5.0, 5.0)]);
        let detector = StubLandmarkDetector {
            faces: HashMap::from([(0, vec![small, face_at(10.0)])]),
            fail_on: None,
        };
        let mut s = stage(detector, false);
        let crops = s.process(&make_frame(100, 100, 0)).unwrap().unwrap();
        assert_eq!(crops.feature.tags, vec!["nose_tip"]);
    }

    #[test]
    fn test_head_crop_when_enabled() {
        let mut s = stage(StubLandmarkDetector::with_faces_on(&[0]), true);
        let crops = s.process(&make_frame(100, 100, 0)).unwrap().unwrap();
        let head = crops.head.unwrap();
        assert_eq!(&head.tags[..2], &["head", "face"]);
        assert_eq!(head.tags.len(), 11);
    }

    #[test]
    fn test_detector_failure_is_detection_error() {
        let mut detector = StubLandmarkDetector::with_faces_on(&[0]);
        detector.fail_on = Some(4);
        let mut s = stage(detector, false);
        let err = s.process(&make_frame(100, 100, 4)).unwrap_err();
        assert!(matches!(err, PipelineError::Detection { frame: 4, .. }));
    }
}
