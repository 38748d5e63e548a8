//! Named facial landmark regions.
//!
//! A [`LandmarkSet`] groups landmark points by facial feature. Sets built
//! from a 68-point model follow the iBUG 300-W index layout; sets built from
//! five pose keypoints cover only the eyes, nose tip and lips.

use std::collections::BTreeMap;

use crate::detection::domain::face_detector::FaceKeypoints;
use crate::shared::region::Region;

/// Number of points in an iBUG 300-W landmark shape.
pub const IBUG_68_POINTS: usize = 68;

/// Facial feature regions. Declaration order is the tag order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LandmarkRegion {
    Chin,
    LeftEyebrow,
    RightEyebrow,
    NoseBridge,
    NoseTip,
    LeftEye,
    RightEye,
    TopLip,
    BottomLip,
}

impl LandmarkRegion {
    pub const ALL: [LandmarkRegion; 9] = [
        LandmarkRegion::Chin,
        LandmarkRegion::LeftEyebrow,
        LandmarkRegion::RightEyebrow,
        LandmarkRegion::NoseBridge,
        LandmarkRegion::NoseTip,
        LandmarkRegion::LeftEye,
        LandmarkRegion::RightEye,
        LandmarkRegion::TopLip,
        LandmarkRegion::BottomLip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LandmarkRegion::Chin => "chin",
            LandmarkRegion::LeftEyebrow => "left_eyebrow",
            LandmarkRegion::RightEyebrow => "right_eyebrow",
            LandmarkRegion::NoseBridge => "nose_bridge",
            LandmarkRegion::NoseTip => "nose_tip",
            LandmarkRegion::LeftEye => "left_eye",
            LandmarkRegion::RightEye => "right_eye",
            LandmarkRegion::TopLip => "top_lip",
            LandmarkRegion::BottomLip => "bottom_lip",
        }
    }

    /// Indices into a 68-point shape, in outline order.
    ///
    /// The lips share their corner and inner-corner points, so both lip
    /// outlines are closed polygons.
    fn ibug_indices(&self) -> Vec<usize> {
        match self {
            LandmarkRegion::Chin => (0..17).collect(),
            LandmarkRegion::LeftEyebrow => (17..22).collect(),
            LandmarkRegion::RightEyebrow => (22..27).collect(),
            LandmarkRegion::NoseBridge => (27..31).collect(),
            LandmarkRegion::NoseTip => (31..36).collect(),
            LandmarkRegion::LeftEye => (36..42).collect(),
            LandmarkRegion::RightEye => (42..48).collect(),
            LandmarkRegion::TopLip => (48..55).chain([64, 63, 62, 61, 60]).collect(),
            LandmarkRegion::BottomLip => (54..60).chain([48, 60, 67, 66, 65, 64]).collect(),
        }
    }
}

impl std::fmt::Display for LandmarkRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Landmark points of one face, grouped by region.
///
/// Only regions with at least one point are stored, so every stored region
/// is a tag of the face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkSet {
    regions: BTreeMap<LandmarkRegion, Vec<(f64, f64)>>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups a 68-point iBUG shape into the nine named regions.
    pub fn from_ibug_68(points: &[(f64, f64)]) -> Result<Self, String> {
        if points.len() != IBUG_68_POINTS {
            return Err(format!(
                "expected {IBUG_68_POINTS} landmark points, got {}",
                points.len()
            ));
        }
        let mut set = Self::new();
        for region in LandmarkRegion::ALL {
            let pts = region.ibug_indices().into_iter().map(|i| points[i]).collect();
            set.insert(region, pts);
        }
        Ok(set)
    }

    /// Maps five pose keypoints onto the regions they belong to. Both mouth
    /// corners lie on both lip outlines. Missing keypoints are left out.
    pub fn from_keypoints(kp: &FaceKeypoints) -> Self {
        let mouth: Vec<(f64, f64)> = [kp.left_mouth, kp.right_mouth]
            .into_iter()
            .flatten()
            .collect();
        let mut set = Self::new();
        set.insert(LandmarkRegion::LeftEye, kp.left_eye.into_iter().collect());
        set.insert(LandmarkRegion::RightEye, kp.right_eye.into_iter().collect());
        set.insert(LandmarkRegion::NoseTip, kp.nose.into_iter().collect());
        set.insert(LandmarkRegion::TopLip, mouth.clone());
        set.insert(LandmarkRegion::BottomLip, mouth);
        set
    }

    /// Stores the points of a region, replacing any previous ones. Empty
    /// point lists are ignored.
    pub fn insert(&mut self, region: LandmarkRegion, points: Vec<(f64, f64)>) {
        if points.is_empty() {
            self.regions.remove(&region);
        } else {
            self.regions.insert(region, points);
        }
    }

    pub fn get(&self, region: LandmarkRegion) -> Option<&[(f64, f64)]> {
        self.regions.get(&region).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions present in this set, in tag order.
    pub fn regions(&self) -> impl Iterator<Item = LandmarkRegion> + '_ {
        self.regions.keys().copied()
    }

    /// Every point of every region.
    pub fn points(&self) -> impl Iterator<Item = &(f64, f64)> + '_ {
        self.regions.values().flatten()
    }

    /// Tag names of the present regions, in tag order.
    pub fn tags(&self) -> Vec<String> {
        self.regions().map(|r| r.name().to_string()).collect()
    }

    /// Union bounding box of all points, or `None` for an empty set.
    pub fn bounding_region(&self) -> Option<Region> {
        Region::bounding(self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 68 points laid out on a 10-wide grid starting at (100, 200).
    fn grid_shape() -> Vec<(f64, f64)> {
        (0..IBUG_68_POINTS)
            .map(|i| (100.0 + (i % 10) as f64 * 5.0, 200.0 + (i / 10) as f64 * 5.0))
            .collect()
    }

    #[test]
    fn test_names_follow_declaration_order() {
        let names: Vec<&str> = LandmarkRegion::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "chin",
                "left_eyebrow",
                "right_eyebrow",
                "nose_bridge",
                "nose_tip",
                "left_eye",
                "right_eye",
                "top_lip",
                "bottom_lip",
            ]
        );
    }

    #[test]
    fn test_from_ibug_68_has_all_nine_regions() {
        let set = LandmarkSet::from_ibug_68(&grid_shape()).unwrap();
        assert_eq!(set.regions().count(), 9);
        assert_eq!(set.tags().len(), 9);
        assert_eq!(set.tags()[0], "chin");
        assert_eq!(set.tags()[8], "bottom_lip");
    }

    #[test]
    fn test_from_ibug_68_region_sizes() {
        let set = LandmarkSet::from_ibug_68(&grid_shape()).unwrap();
        assert_eq!(set.get(LandmarkRegion::Chin).unwrap().len(), 17);
        assert_eq!(set.get(LandmarkRegion::LeftEyebrow).unwrap().len(), 5);
        assert_eq!(set.get(LandmarkRegion::NoseBridge).unwrap().len(), 4);
        assert_eq!(set.get(LandmarkRegion::NoseTip).unwrap().len(), 5);
        assert_eq!(set.get(LandmarkRegion::LeftEye).unwrap().len(), 6);
        assert_eq!(set.get(LandmarkRegion::TopLip).unwrap().len(), 12);
        assert_eq!(set.get(LandmarkRegion::BottomLip).unwrap().len(), 12);
    }

    #[test]
    fn test_from_ibug_68_lip_outline_order() {
        let shape = grid_shape();
        let set = LandmarkSet::from_ibug_68(&shape).unwrap();
        let top = set.get(LandmarkRegion::TopLip).unwrap();
        assert_eq!(top[0], shape[48]);
        assert_eq!(top[7], shape[64]);
        assert_eq!(top[11], shape[60]);
        let bottom = set.get(LandmarkRegion::BottomLip).unwrap();
        assert_eq!(bottom[0], shape[54]);
        assert_eq!(bottom[6], shape[48]);
        assert_eq!(bottom[11], shape[64]);
    }

    #[test]
    fn test_from_ibug_68_rejects_wrong_length() {
        let err = LandmarkSet::from_ibug_68(&[(0.0, 0.0); 5]).unwrap_err();
        assert!(err.contains("expected 68"));
    }

    #[test]
    fn test_tags_use_fixed_order_not_insertion_order() {
        let mut set = LandmarkSet::new();
        set.insert(LandmarkRegion::BottomLip, vec![(1.0, 1.0)]);
        set.insert(LandmarkRegion::Chin, vec![(2.0, 2.0)]);
        set.insert(LandmarkRegion::LeftEye, vec![(3.0, 3.0)]);
        assert_eq!(set.tags(), vec!["chin", "left_eye", "bottom_lip"]);
    }

    #[test]
    fn test_insert_empty_points_removes_region() {
        let mut set = LandmarkSet::new();
        set.insert(LandmarkRegion::NoseTip, vec![(1.0, 1.0)]);
        set.insert(LandmarkRegion::NoseTip, vec![]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_bounding_region_covers_every_region() {
        let mut set = LandmarkSet::new();
        set.insert(LandmarkRegion::LeftEye, vec![(40.0, 50.0), (60.0, 52.0)]);
        set.insert(LandmarkRegion::Chin, vec![(20.0, 90.5), (80.2, 95.0)]);
        let r = set.bounding_region().unwrap();
        assert_eq!(r, Region::new(20, 50, 61, 45));
    }

    #[test]
    fn test_from_keypoints_maps_five_points() {
        let kp = FaceKeypoints {
            left_eye: Some((40.0, 50.0)),
            right_eye: Some((70.0, 50.0)),
            nose: Some((55.0, 65.0)),
            left_mouth: Some((45.0, 80.0)),
            right_mouth: Some((65.0, 80.0)),
        };
        let set = LandmarkSet::from_keypoints(&kp);
        assert_eq!(
            set.tags(),
            vec!["nose_tip", "left_eye", "right_eye", "top_lip", "bottom_lip"]
        );
        assert_eq!(set.get(LandmarkRegion::NoseTip).unwrap(), &[(55.0, 65.0)]);
        assert_eq!(
            set.get(LandmarkRegion::TopLip).unwrap(),
            set.get(LandmarkRegion::BottomLip).unwrap()
        );
        assert_eq!(set.bounding_region().unwrap(), Region::new(40, 50, 30, 30));
    }

    #[test]
    fn test_from_keypoints_skips_missing_points() {
        let kp = FaceKeypoints {
            left_eye: Some((40.0, 50.0)),
            nose: Some((55.0, 65.0)),
            right_mouth: Some((65.0, 80.0)),
            ..FaceKeypoints::default()
        };
        let set = LandmarkSet::from_keypoints(&kp);
        assert_eq!(set.tags(), vec!["nose_tip", "left_eye", "top_lip", "bottom_lip"]);
        assert_eq!(set.get(LandmarkRegion::TopLip).unwrap().len(), 1);
        assert!(LandmarkSet::from_keypoints(&FaceKeypoints::default()).is_empty());
    }

    #[test]
    fn test_bounding_region_empty_set() {
        assert!(LandmarkSet::new().bounding_region().is_none());
    }
}
