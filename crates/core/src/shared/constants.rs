pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// 68-point landmark regressor. No public download location, so it must be
/// placed in the model cache directory or passed explicitly. Without it the
/// face detector's five keypoints stand in for the landmarks.
pub const LANDMARK_MODEL_NAME: &str = "face_landmarks_68.onnx";

/// Output resolution of feature and head crops.
pub const CROP_SIZE: (u32, u32) = (512, 512);

/// Output resolution of the batch resizer.
pub const BATCH_RESIZE_SIZE: (u32, u32) = (768, 768);

/// Extensions accepted by the extractor. Matched exactly.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mov"];

/// Extensions the batch resizer considers. Matched case-insensitively.
pub const RESIZABLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const FEATURE_CROP_PREFIX: &str = "feature_crop";
pub const HEAD_CROP_PREFIX: &str = "head_crop";

pub const DEFAULT_OUTPUT_DIR: &str = "default_output";
