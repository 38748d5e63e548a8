use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::shared::error::PipelineError;
use crate::video::domain::video_reader::VideoReader;

use super::crop_stage::CropStage;
use super::output_writer::{OutputRecord, OutputWriter};
use super::pipeline_logger::PipelineLogger;

/// Called after each frame with `(frames_processed, total_frames)`. Returning
/// `false` cancels the run.
pub type ProgressFn = Box<dyn Fn(usize, usize) -> bool + Send>;

/// Called once per file written.
pub type SavedFn = Box<dyn Fn(&OutputRecord) + Send>;

/// Configuration for a pipeline execution run.
pub struct PipelineConfig {
    pub total_frames: usize,
    pub on_progress: Option<ProgressFn>,
    pub on_saved: Option<SavedFn>,
    pub cancelled: Arc<AtomicBool>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            total_frames: 0,
            on_progress: None,
            on_saved: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Abstracts how the read → detect/crop → write pipeline is executed.
///
/// Implementations must process frames in decode order and write at most one
/// index per frame, so the returned records are contiguous from zero. On a
/// fatal error the records written so far stay on disk and the error is
/// returned.
pub trait PipelineExecutor: Send {
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        stage: CropStage,
        writer: OutputWriter,
        logger: &mut dyn PipelineLogger,
        config: PipelineConfig,
    ) -> Result<Vec<OutputRecord>, PipelineError>;
}
