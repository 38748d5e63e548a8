use crate::shared::constants::CROP_SIZE;

/// Geometry of the feature crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropPolicy {
    /// Output `(width, height)`.
    pub target: (u32, u32),
    /// Fraction of the landmark box added on every side before clipping.
    pub padding: f64,
}

impl CropPolicy {
    pub fn new(target: (u32, u32), padding: f64) -> Result<Self, String> {
        if target.0 == 0 || target.1 == 0 {
            return Err(format!("crop size must be non-zero, got {}x{}", target.0, target.1));
        }
        if !(0.0..=1.0).contains(&padding) {
            return Err(format!("padding must be between 0.0 and 1.0, got {padding}"));
        }
        Ok(Self { target, padding })
    }
}

impl Default for CropPolicy {
    fn default() -> Self {
        Self {
            target: CROP_SIZE,
            padding: 0.0,
        }
    }
}
