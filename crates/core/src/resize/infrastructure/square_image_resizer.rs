use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::resize::domain::image_resizer::{ImageResizer, ResizeError};

/// Upright, center-square, fixed-size copies of images.
///
/// The EXIF orientation is applied first so phone photos come out upright,
/// then the longer side is trimmed equally from both ends and the square is
/// stretched to `size`.
pub struct SquareImageResizer {
    size: (u32, u32),
}

impl SquareImageResizer {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }
}

impl ImageResizer for SquareImageResizer {
    fn resize_file(&self, source: &Path, target: &Path) -> Result<(), ResizeError> {
        let img = load_upright(source).map_err(|e| ResizeError::Decode {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;

        let (w, h) = self.size;
        let resized = center_square(&img).resize_exact(w, h, FilterType::Triangle);

        resized.save(target).map_err(|e| ResizeError::Write {
            path: target.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn load_upright(path: &Path) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

fn center_square(img: &DynamicImage) -> DynamicImage {
    let side = img.width().min(img.height());
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;
    img.crop_imm(x, y, side, side)
}
