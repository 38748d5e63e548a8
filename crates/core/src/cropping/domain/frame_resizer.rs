use crate::shared::frame::Frame;

/// Scales a frame to an exact size, ignoring aspect ratio.
///
/// Implementations must be deterministic: the same input always yields
/// bit-identical output.
pub trait FrameResizer: Send + Sync {
    fn resize(&self, frame: &Frame, size: (u32, u32)) -> Result<Frame, Box<dyn std::error::Error>>;
}
