use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::pipeline::crop_stage::CropStage;
use crate::pipeline::output_writer::{OutputRecord, OutputWriter};
use crate::pipeline::pipeline_executor::{PipelineConfig, PipelineExecutor};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::error::PipelineError;
use crate::video::domain::video_reader::VideoReader;

/// Runs every stage on the calling thread: each frame is decoded, cropped
/// and written before the next one is requested.
pub struct SequentialPipelineExecutor;

impl PipelineExecutor for SequentialPipelineExecutor {
    fn execute(
        &self,
        mut reader: Box<dyn VideoReader>,
        mut stage: CropStage,
        mut writer: OutputWriter,
        logger: &mut dyn PipelineLogger,
        config: PipelineConfig,
    ) -> Result<Vec<OutputRecord>, PipelineError> {
        let mut records = Vec::new();
        let result = run(
            &mut *reader,
            &mut stage,
            &mut writer,
            logger,
            &config,
            &mut records,
        );
        reader.close();
        result.map(|()| records)
    }
}

fn run(
    reader: &mut dyn VideoReader,
    stage: &mut CropStage,
    writer: &mut OutputWriter,
    logger: &mut dyn PipelineLogger,
    config: &PipelineConfig,
    records: &mut Vec<OutputRecord>,
) -> Result<(), PipelineError> {
    let mut processed = 0usize;

    for frame_result in reader.frames() {
        if config.cancelled.load(Ordering::Relaxed) {
            return Err(PipelineError::Cancelled);
        }

        let frame = frame_result.map_err(|e| PipelineError::Decode {
            frame: processed,
            reason: e.to_string(),
        })?;

        let t0 = Instant::now();
        let crops = stage.process(&frame)?;
        logger.timing("detect_crop", t0.elapsed().as_secs_f64() * 1000.0);

        let mut written = 0;
        if let Some(crops) = crops {
            let t0 = Instant::now();
            let saved = writer.write(&crops.feature, crops.head.as_ref())?;
            logger.timing("write", t0.elapsed().as_secs_f64() * 1000.0);

            if let Some(ref on_saved) = config.on_saved {
                saved.iter().for_each(|r| on_saved(r));
            }
            written = saved.len();
            records.extend(saved);
        }
        logger.metric("crops_written", written as f64);

        processed += 1;
        logger.progress(processed, config.total_frames);
        if let Some(ref callback) = config.on_progress {
            if !callback(processed, config.total_frames) {
                return Err(PipelineError::Cancelled);
            }
        }
    }

    Ok(())
}
