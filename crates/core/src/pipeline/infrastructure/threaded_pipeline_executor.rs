use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::crop_stage::{CropStage, FrameCrops};
use crate::pipeline::output_writer::{OutputRecord, OutputWriter};
use crate::pipeline::pipeline_executor::{PipelineConfig, PipelineExecutor};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::error::PipelineError;
use crate::shared::frame::Frame;
use crate::video::domain::video_reader::VideoReader;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Output of the detect/crop thread for one frame.
struct Cropped {
    crops: Option<FrameCrops>,
    detect_ms: f64,
}

/// Executes the extraction pipeline with dedicated threads for decoding and
/// detection.
///
/// Layout: `reader → detect/crop → main [write]`
///
/// There is exactly one detect/crop thread and the channels are FIFO, so
/// crops reach the writer in decode order and indices are assigned exactly
/// as the sequential executor would.
pub struct ThreadedPipelineExecutor {
    channel_capacity: usize,
}

impl ThreadedPipelineExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedPipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineExecutor for ThreadedPipelineExecutor {
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        stage: CropStage,
        mut writer: OutputWriter,
        logger: &mut dyn PipelineLogger,
        config: PipelineConfig,
    ) -> Result<Vec<OutputRecord>, PipelineError> {
        let cap = self.channel_capacity;
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Result<Frame, PipelineError>>(cap);
        let (crop_tx, crop_rx) = crossbeam_channel::bounded::<Result<Cropped, PipelineError>>(cap);

        let reader_handle = spawn_reader(reader, frame_tx, config.cancelled.clone());
        let stage_handle = spawn_stage(stage, frame_rx, crop_tx, config.cancelled.clone());

        let mut records = Vec::new();
        let main_result = run_main_loop(&crop_rx, &mut writer, logger, &config, &mut records);

        // Unblocks upstream threads still waiting to send.
        drop(crop_rx);

        join_threads(reader_handle, stage_handle, main_result).map(|()| records)
    }
}

fn spawn_reader(
    mut reader: Box<dyn VideoReader>,
    frame_tx: Sender<Result<Frame, PipelineError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for (i, frame_result) in reader.frames().enumerate() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| PipelineError::Decode {
                frame: i,
                reason: e.to_string(),
            });
            let failed = mapped.is_err();
            if frame_tx.send(mapped).is_err() || failed {
                break;
            }
        }
        reader.close();
    })
}

fn spawn_stage(
    mut stage: CropStage,
    frame_rx: Receiver<Result<Frame, PipelineError>>,
    crop_tx: Sender<Result<Cropped, PipelineError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for frame_result in frame_rx {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let result = frame_result.and_then(|frame| {
                let t0 = Instant::now();
                let crops = stage.process(&frame)?;
                Ok(Cropped {
                    crops,
                    detect_ms: t0.elapsed().as_secs_f64() * 1000.0,
                })
            });
            let failed = result.is_err();
            if crop_tx.send(result).is_err() || failed {
                break;
            }
        }
    })
}

/// Receives cropped frames in order, writes them and reports progress.
fn run_main_loop(
    crop_rx: &Receiver<Result<Cropped, PipelineError>>,
    writer: &mut OutputWriter,
    logger: &mut dyn PipelineLogger,
    config: &PipelineConfig,
    records: &mut Vec<OutputRecord>,
) -> Result<(), PipelineError> {
    let mut processed = 0usize;

    for cropped in crop_rx.iter() {
        if config.cancelled.load(Ordering::Relaxed) {
            return Err(PipelineError::Cancelled);
        }
        let Cropped { crops, detect_ms } = cropped?;
        logger.timing("detect_crop", detect_ms);
        logger.metric("crop_queue_depth", crop_rx.len() as f64);

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

    // The loop also ends when the stage stops early on cancellation.
    if config.cancelled.load(Ordering::Relaxed) {
        return Err(PipelineError::Cancelled);
    }
    Ok(())
}

/// Joins the worker threads, keeping the first error encountered.
fn join_threads(
    reader_handle: JoinHandle<()>,
    stage_handle: JoinHandle<()>,
    main_result: Result<(), PipelineError>,
) -> Result<(), PipelineError> {
    let mut result = main_result;
    if reader_handle.join().is_err() && result.is_ok() {
        result = Err(PipelineError::ThreadPanicked("reader"));
    }
    if stage_handle.join().is_err() && result.is_ok() {
        result = Err(PipelineError::ThreadPanicked("detect"));
    }
    result
}
