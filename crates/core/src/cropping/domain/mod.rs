pub mod crop_policy;
pub mod crop_result;
pub mod face_cropper;
pub mod frame_resizer;
pub mod head_cropper;
