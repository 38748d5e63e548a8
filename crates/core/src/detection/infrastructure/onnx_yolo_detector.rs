/// YOLO face box detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference and NMS post-processing.
/// Pose models also carry five keypoints per box, which are kept on the
/// detection.
use std::path::Path;

use crate::detection::domain::face_detector::{FaceDetection, FaceDetector, FaceKeypoints};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::math::{nms, ScoredBox};

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Keypoint columns per detection (5 keypoints × x, y, conf).
const NUM_KEYPOINT_VALUES: usize = 15;

/// Minimum keypoint confidence to treat a keypoint as visible.
const KEYPOINT_CONF_THRESH: f64 = 0.5;

/// Letterbox placement of the frame inside the square model input.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    /// Maps a model-space coordinate back to frame space.
    fn unmap(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.pad_x as f64) / self.scale,
            (y - self.pad_y as f64) / self.scale,
        )
    }
}

/// YOLO face detector backed by an ONNX Runtime session.
pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::debug!("YOLO face detector input size: {input_size}");

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        let (input_tensor, lb) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let mut candidates = decode_output(data, &shape, self.confidence, lb)?;
        let kept = nms(&mut candidates, NMS_IOU_THRESH);

        Ok(kept
            .into_iter()
            .filter_map(|d| to_detection(&d, frame.width(), frame.height()))
            .collect())
    }
}

/// Converts a frame-space box to a clamped integer region.
fn to_detection(d: &ScoredBox, frame_w: u32, frame_h: u32) -> Option<FaceDetection> {
    let [x1, y1, x2, y2] = d.bbox;
    let region = Region::from_corners(
        x1.floor() as i32,
        y1.floor() as i32,
        x2.ceil() as i32,
        y2.ceil() as i32,
    )
    .clamp_to(frame_w, frame_h)?;
    Some(FaceDetection {
        region,
        confidence: d.score,
        keypoints: d.keypoints,
    })
}

/// Parses raw YOLO output rows `[cx, cy, w, h, conf, kp0_x, kp0_y, kp0_conf, ...]`
/// into frame-space boxes above `confidence`.
///
/// Accepts both `[1, features, detections]` (transposed, the Ultralytics
/// export default) and `[1, detections, features]` layouts.
fn decode_output(
    data: &[f32],
    shape: &[usize],
    confidence: f64,
    lb: Letterbox,
) -> Result<Vec<ScoredBox>, Box<dyn std::error::Error>> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats < 5 {
        return Ok(Vec::new());
    }

    let value = |det: usize, feat: usize| -> f64 {
        if transposed {
            data[feat * num_dets + det] as f64
        } else {
            data[det * num_feats + feat] as f64
        }
    };

    let mut boxes = Vec::new();
    for i in 0..num_dets {
        let conf = value(i, 4);
        if conf < confidence {
            continue;
        }
        let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
        let (x1, y1) = lb.unmap(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = lb.unmap(cx + w / 2.0, cy + h / 2.0);
        let keypoints = (num_feats >= 5 + NUM_KEYPOINT_VALUES).then(|| {
            let point = |k: usize| {
                let base = 5 + k * 3;
                (value(i, base + 2) >= KEYPOINT_CONF_THRESH)
                    .then(|| lb.unmap(value(i, base), value(i, base + 1)))
            };
            FaceKeypoints {
                left_eye: point(0),
                right_eye: point(1),
                nose: point(2),
                left_mouth: point(3),
                right_mouth: point(4),
            }
        });
        boxes.push(ScoredBox {
            bbox: [x1, y1, x2, y2],
            score: conf,
            keypoints,
        });
    }
    Ok(boxes)
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Letterbox-resize a frame to `target_size` × `target_size` NCHW float32.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padding is 114/255 gray, the YOLO training convention.
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded area
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
