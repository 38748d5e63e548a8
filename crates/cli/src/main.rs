use std::path::PathBuf;
use std::process;

use clap::Parser;

use facecrop_cli::prompt::path_or_prompt;
use facecrop_cli::setup::{self, PreparedRun};
use facecrop_core::cropping::domain::crop_policy::CropPolicy;
use facecrop_core::cropping::domain::face_cropper::FaceCropper;
use facecrop_core::cropping::domain::head_cropper::HeadCropper;
use facecrop_core::cropping::infrastructure::image_frame_resizer::ImageFrameResizer;
use facecrop_core::detection::domain::landmark_detector::LandmarkDetector;
use facecrop_core::detection::infrastructure::keypoint_landmark_detector::KeypointLandmarkDetector;
use facecrop_core::detection::infrastructure::model_resolver;
use facecrop_core::detection::infrastructure::onnx_landmark_detector::OnnxLandmarkDetector;
use facecrop_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use facecrop_core::pipeline::crop_stage::CropStage;
use facecrop_core::pipeline::extract_crops_use_case::ExtractCropsUseCase;
use facecrop_core::pipeline::infrastructure::sequential_pipeline_executor::SequentialPipelineExecutor;
use facecrop_core::pipeline::infrastructure::threaded_pipeline_executor::ThreadedPipelineExecutor;
use facecrop_core::pipeline::output_writer::{OutputRecord, OutputWriter};
use facecrop_core::pipeline::pipeline_executor::PipelineExecutor;
use facecrop_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facecrop_core::shared::constants::{
    CROP_SIZE, DEFAULT_OUTPUT_DIR, LANDMARK_MODEL_NAME, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facecrop_core::video::infrastructure::image_file_writer::ImageFileWriter;

const INPUT_PROMPT: &str = "Enter the path to your file (image or video): ";
const OUTPUT_PROMPT: &str = "Enter the output directory for the cropped images: ";

/// Extract tagged face crops from a selfie video or image.
#[derive(Parser)]
#[command(name = "facecrop")]
struct Cli {
    /// Input image (.png, .jpg, .jpeg) or video (.mov). Prompted for if omitted.
    input: Option<PathBuf>,

    /// Output directory. Prompted for if omitted; defaults to `default_output`.
    output: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Extra margin around the landmark box, as a fraction of its size (0.0-1.0).
    #[arg(long, default_value = "0.0")]
    padding: f64,

    /// Also write a letterboxed crop of the whole head per frame.
    #[arg(long)]
    head_crops: bool,

    /// Overlap decoding, detection and writing on separate threads.
    #[arg(long)]
    threaded: bool,

    /// Face detector ONNX model (default: cached or downloaded).
    #[arg(long)]
    detector_model: Option<PathBuf>,

    /// 68-point landmark ONNX model (default: model cache directory; without
    /// one, only the face detector's five keypoints are used).
    #[arg(long)]
    landmark_model: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let input = path_or_prompt(cli.input.clone(), INPUT_PROMPT, None)?;
    let output = path_or_prompt(cli.output.clone(), OUTPUT_PROMPT, Some(DEFAULT_OUTPUT_DIR))?;

    let PreparedRun {
        input: source,
        detector,
    } = setup::prepare(&input, &output, || build_detector(&cli))?;

    let policy = CropPolicy::new(CROP_SIZE, cli.padding)?;
    let stage = CropStage::new(
        detector,
        FaceCropper::new(policy, Box::new(ImageFrameResizer)),
        cli.head_crops
            .then(|| HeadCropper::new(CROP_SIZE, Box::new(ImageFrameResizer))),
    );
    let writer = OutputWriter::new(&output, Box::new(ImageFileWriter::new()));
    let executor: Box<dyn PipelineExecutor> = if cli.threaded {
        Box::new(ThreadedPipelineExecutor::new())
    } else {
        Box::new(SequentialPipelineExecutor)
    };

    let use_case = ExtractCropsUseCase::new(
        source.reader,
        stage,
        writer,
        executor,
        Box::new(StdoutPipelineLogger::default()),
        None,
        Some(Box::new(|record: &OutputRecord| println!("{record}"))),
        None,
    );
    let records = use_case.execute(&source.metadata)?;

    if records.is_empty() {
        log::warn!("No faces found in {}", input.display());
    }
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
    let detector_path = match &cli.detector_model {
        Some(path) => path.clone(),
        None => {
            log::info!("Resolving model: {YOLO_MODEL_NAME}");
            let path = model_resolver::resolve(
                YOLO_MODEL_NAME,
                Some(YOLO_MODEL_URL),
                None,
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };
    let landmark_path = setup::choose_landmark_model(cli.landmark_model.clone(), || {
        model_resolver::resolve(LANDMARK_MODEL_NAME, None, None, None)
    })?;

    let faces = Box::new(OnnxYoloDetector::new(&detector_path, cli.confidence)?);
    let detector: Box<dyn LandmarkDetector> = match landmark_path {
        Some(path) => Box::new(OnnxLandmarkDetector::new(faces, &path)?),
        None => Box::new(KeypointLandmarkDetector::new(faces)),
    };
    Ok(detector)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.padding) {
        return Err(format!("Padding must be between 0.0 and 1.0, got {}", cli.padding).into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
