pub mod keypoint_landmark_detector;
pub mod math;
pub mod model_resolver;
pub mod onnx_landmark_detector;
pub mod onnx_yolo_detector;
