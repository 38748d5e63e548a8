use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::shared::error::PipelineError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::crop_stage::CropStage;
use super::output_writer::{OutputRecord, OutputWriter};
use super::pipeline_executor::{PipelineConfig, PipelineExecutor, ProgressFn, SavedFn};
use super::pipeline_logger::PipelineLogger;

/// Orchestrates the extraction pipeline for one opened source.
///
/// Wires the reader, crop stage and output writer together and delegates
/// execution to a `PipelineExecutor`. `execute` consumes the use case, so a
/// source is processed at most once.
pub struct ExtractCropsUseCase {
    reader: Box<dyn VideoReader>,
    stage: CropStage,
    writer: OutputWriter,
    executor: Box<dyn PipelineExecutor>,
    logger: Box<dyn PipelineLogger>,
    on_progress: Option<ProgressFn>,
    on_saved: Option<SavedFn>,
    cancelled: Arc<AtomicBool>,
}

impl ExtractCropsUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn VideoReader>,
        stage: CropStage,
        writer: OutputWriter,
        executor: Box<dyn PipelineExecutor>,
        logger: Box<dyn PipelineLogger>,
        on_progress: Option<ProgressFn>,
        on_saved: Option<SavedFn>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader,
            stage,
            writer,
            executor,
            logger,
            on_progress,
            on_saved,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    /// Runs the pipeline to completion and returns the records written.
    ///
    /// On error, files already written stay on disk.
    pub fn execute(mut self, metadata: &VideoMetadata) -> Result<Vec<OutputRecord>, PipelineError> {
        self.logger.info(&format!(
            "Extracting crops from {} frame(s) at {}x{}",
            metadata.total_frames,
            metadata.display_size().0,
            metadata.display_size().1
        ));

        let config = PipelineConfig {
            total_frames: metadata.total_frames,
            on_progress: self.on_progress.take(),
            on_saved: self.on_saved.take(),
            cancelled: self.cancelled.clone(),
        };

        let result = self.executor.execute(
            self.reader,
            self.stage,
            self.writer,
            self.logger.as_mut(),
            config,
        );

        match &result {
            Ok(records) => self
                .logger
                .info(&format!("Saved {} crop file(s)", records.len())),
            Err(e) => log::warn!("Extraction stopped: {e}"),
        }
        self.logger.summary();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::crop_stage::tests::{stage, StubLandmarkDetector};
    use crate::pipeline::infrastructure::sequential_pipeline_executor::SequentialPipelineExecutor;
    use crate::pipeline::infrastructure::threaded_pipeline_executor::ThreadedPipelineExecutor;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::error::OutputError;
    use crate::test_support::{make_frame, MemoryImageWriter, StubReader};
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use rstest::rstest;
    use std::path::Path;

    fn metadata(total_frames: usize) -> VideoMetadata {
        VideoMetadata {
            width: 100,
            height: 100,
            fps: 30.0,
            total_frames,
            codec: "mpeg4".to_string(),
            source_path: None,
            rotation: 0,
        }
    }

    fn executor(threaded: bool) -> Box<dyn PipelineExecutor> {
        if threaded {
            Box::new(ThreadedPipelineExecutor::new())
        } else {
            Box::new(SequentialPipelineExecutor)
        }
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_single_image_with_face_writes_index_zero(#[case] threaded: bool) {
        let dir = tempfile::tempdir().unwrap();
        let use_case = ExtractCropsUseCase::new(
            Box::new(StubReader::new(vec![make_frame(100, 100, 0)])),
            stage(StubLandmarkDetector::with_faces_on(&[0]), false),
            OutputWriter::new(dir.path(), Box::new(ImageFileWriter::new())),
            executor(threaded),
            Box::new(NullPipelineLogger),
            None,
            None,
            None,
        );

        let records = use_case.execute(&metadata(1)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[0].tags.len(), 9);

        let img = image::open(dir.path().join("feature_crop_0.png")).unwrap();
        assert_eq!((img.width(), img.height()), (512, 512));
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_faces_only_in_first_half(#[case] threaded: bool) {
        let dir = tempfile::tempdir().unwrap();
        let frames: Vec<_> = (0..10).map(|i| make_frame(100, 100, i)).collect();
        let use_case = ExtractCropsUseCase::new(
            Box::new(StubReader::new(frames)),
            stage(StubLandmarkDetector::with_faces_on(&[0, 1, 2, 3, 4]), false),
            OutputWriter::new(dir.path(), Box::new(ImageFileWriter::new())),
            executor(threaded),
            Box::new(NullPipelineLogger),
            None,
            None,
            None,
        );

        let records = use_case.execute(&metadata(10)).unwrap();
        assert_eq!(records.len(), 5);
        for i in 0..5 {
            assert!(dir.path().join(format!("feature_crop_{i}.png")).exists());
        }
        assert!(!dir.path().join("feature_crop_5.png").exists());
    }

    #[test]
    fn test_head_crops_written_alongside() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = ExtractCropsUseCase::new(
            Box::new(StubReader::new(vec![make_frame(100, 100, 0)])),
            stage(StubLandmarkDetector::with_faces_on(&[0]), true),
            OutputWriter::new(dir.path(), Box::new(ImageFileWriter::new())),
            executor(false),
            Box::new(NullPipelineLogger),
            None,
            None,
            None,
        );

        let records = use_case.execute(&metadata(1)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(dir.path().join("feature_crop_0.png").exists());
        assert!(dir.path().join("head_crop_0.png").exists());
    }

    #[test]
    fn test_unwritable_output_after_start_keeps_earlier_files() {
        let image_writer = MemoryImageWriter::failing_after(1);
        let written = image_writer.written.clone();
        let frames: Vec<_> = (0..3).map(|i| make_frame(100, 100, i)).collect();
        let use_case = ExtractCropsUseCase::new(
            Box::new(StubReader::new(frames)),
            stage(StubLandmarkDetector::with_faces_on(&[0, 1, 2]), false),
            OutputWriter::new(Path::new("out"), Box::new(image_writer)),
            executor(false),
            Box::new(NullPipelineLogger),
            None,
            None,
            None,
        );

        let err = use_case.execute(&metadata(3)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Output(OutputError::CannotCreate { .. })
        ));
        assert_eq!(
            *written.lock().unwrap(),
            vec![Path::new("out").join("feature_crop_0.png")]
        );
    }
}
