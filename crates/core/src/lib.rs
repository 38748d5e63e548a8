//! Extracts tagged face crops from selfie videos and still images.
//!
//! Pipeline: resolve input → decode frames → detect landmarks → crop the
//! first face to its landmark bounding box → resize → write
//! `feature_crop_<n>.png`. The `resize` context holds the separate batch
//! resizer used to post-process a directory of images.

pub mod cropping;
pub mod detection;
pub mod pipeline;
pub mod resize;
pub mod shared;
pub mod video;

#[cfg(test)]
pub(crate) mod test_support;
