use image::imageops::FilterType;

use crate::cropping::domain::frame_resizer::FrameResizer;
use crate::shared::frame::Frame;

/// Stretches frames with the `image` crate's triangle (bilinear) filter.
pub struct ImageFrameResizer;

impl FrameResizer for ImageFrameResizer {
    fn resize(&self, frame: &Frame, size: (u32, u32)) -> Result<Frame, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err("cannot resize an empty frame".into());
        }
        let (w, h) = size;
        if (frame.width(), frame.height()) == (w, h) {
            return Ok(frame.clone());
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        let resized = image::imageops::resize(&img, w, h, FilterType::Triangle);

        Ok(Frame::new(resized.into_raw(), w, h, 3, frame.index()))
    }
}
