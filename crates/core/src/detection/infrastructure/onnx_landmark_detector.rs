/// 68-point facial landmark detector using ONNX Runtime via `ort`.
///
/// Runs in two stages: a [`FaceDetector`] proposes face boxes, then a
/// landmark regressor is run on a square crop around each box. The regressor
/// takes `[1, 3, S, S]` RGB in `[0, 1]` and returns 136 values, the x/y pairs
/// of the 68 points normalized to the crop.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_landmarks::{LandmarkSet, IBUG_68_POINTS};
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Fallback regressor input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 112;

/// Extra context around the face box on each side, as a fraction of its
/// longer edge.
const CROP_MARGIN: f64 = 0.1;

pub struct OnnxLandmarkDetector {
    face_detector: Box<dyn FaceDetector>,
    session: ort::session::Session,
    input_size: u32,
}

impl OnnxLandmarkDetector {
    pub fn new(
        face_detector: Box<dyn FaceDetector>,
        model_path: &Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { ref shape, .. }
                    if shape.len() >= 4 && shape[2] > 0 =>
                {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::debug!("Landmark model input size: {input_size}");

        Ok(Self {
            face_detector,
            session,
            input_size,
        })
    }

    fn regress(&mut self, crop: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let input = preprocess(crop, self.input_size)?;
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Landmark model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        Ok(tensor.iter().copied().collect())
    }
}

impl LandmarkDetector for OnnxLandmarkDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
        let faces = self.face_detector.detect(frame)?;
        let mut sets = Vec::with_capacity(faces.len());

        for face in &faces {
            let Some(area) = face_crop_region(&face.region, frame.width(), frame.height()) else {
                continue;
            };
            let values = self.regress(&frame.crop(&area))?;
            let points = points_to_frame(&values, &area)?;
            sets.push(LandmarkSet::from_ibug_68(&points)?);
        }

        log::debug!(
            "Frame {}: {} face(s), {} landmark set(s)",
            frame.index(),
            faces.len(),
            sets.len()
        );
        Ok(sets)
    }
}

/// Square area centered on the face box, grown by [`CROP_MARGIN`] and
/// clipped to the frame.
fn face_crop_region(face: &Region, frame_w: u32, frame_h: u32) -> Option<Region> {
    let side = face.width.max(face.height) as f64 * (1.0 + 2.0 * CROP_MARGIN);
    let cx = face.x as f64 + face.width as f64 / 2.0;
    let cy = face.y as f64 + face.height as f64 / 2.0;
    Region::from_corners(
        (cx - side / 2.0).floor() as i32,
        (cy - side / 2.0).floor() as i32,
        (cx + side / 2.0).ceil() as i32,
        (cy + side / 2.0).ceil() as i32,
    )
    .clamp_to(frame_w, frame_h)
}

/// Resizes the crop to `size` × `size` and converts it to NCHW float32 in `[0, 1]`.
fn preprocess(crop: &Frame, size: u32) -> Result<ndarray::Array4<f32>, Box<dyn std::error::Error>> {
    let img = image::RgbImage::from_raw(crop.width(), crop.height(), crop.data().to_vec())
        .ok_or("Failed to create image from crop data")?;
    let resized = image::imageops::resize(&img, size, size, image::imageops::FilterType::Triangle);

    let s = size as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }
    Ok(tensor)
}

/// Maps crop-normalized `[x0, y0, x1, y1, ...]` values to frame coordinates.
fn points_to_frame(values: &[f32], area: &Region) -> Result<Vec<(f64, f64)>, String> {
    if values.len() < IBUG_68_POINTS * 2 {
        return Err(format!(
            "landmark model returned {} values, expected {}",
            values.len(),
            IBUG_68_POINTS * 2
        ));
    }
    Ok(values[..IBUG_68_POINTS * 2]
        .chunks_exact(2)
        .map(|p| {
            (
                area.x as f64 + p[0] as f64 * area.width as f64,
                area.y as f64 + p[1] as f64 * area.height as f64,
            )
        })
        .collect())
}
