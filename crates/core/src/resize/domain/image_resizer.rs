use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    /// The file is not an image this resizer can read. Not fatal for a batch.
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("cannot write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Converts one image file into another at a fixed size.
pub trait ImageResizer: Send {
    fn resize_file(&self, source: &Path, target: &Path) -> Result<(), ResizeError>;
}
