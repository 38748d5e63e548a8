use std::path::PathBuf;

use thiserror::Error;

/// Failures resolving or decoding the source file. Always fatal, and always
/// raised before any output is produced.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported input format: {path} (expected .png, .jpg, .jpeg or .mov)")]
    UnsupportedExtension { path: PathBuf },
    #[error("unsupported or corrupt media {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Failures persisting a crop. Aborts the run; files already written stay.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot create output file {path}: {reason}")]
    CannotCreate { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("failed to decode frame {frame}: {reason}")]
    Decode { frame: usize, reason: String },
    #[error("landmark detection failed on frame {frame}: {reason}")]
    Detection { frame: usize, reason: String },
    #[error("crop failed on frame {frame}: {reason}")]
    Crop { frame: usize, reason: String },
    #[error("pipeline thread panicked: {0}")]
    ThreadPanicked(&'static str),
    #[error("cancelled")]
    Cancelled,
}
