//! Shared helpers for the `facecrop` and `facecrop-resize` binaries.

pub mod prompt;
pub mod setup;
