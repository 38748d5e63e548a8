use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facecrop_cli::prompt::path_or_prompt;
use facecrop_core::resize::batch_resize_use_case::BatchResizeUseCase;
use facecrop_core::resize::infrastructure::square_image_resizer::SquareImageResizer;
use facecrop_core::shared::constants::BATCH_RESIZE_SIZE;

const DEFAULT_SOURCE_DIR: &str = "/ai/LoraImages/";
const DEFAULT_TARGET_DIR: &str = "/ai/LoraImages/output";

/// Make every image in a directory upright, square and 768x768.
#[derive(Parser)]
#[command(name = "facecrop-resize")]
struct Cli {
    /// Directory of source images. Prompted for if omitted.
    source: Option<PathBuf>,

    /// Directory for resized copies. Created if missing. Prompted for if omitted.
    target: Option<PathBuf>,
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

    let source = path_or_prompt(
        cli.source,
        &format!("Enter source directory (default: {DEFAULT_SOURCE_DIR}): "),
        Some(DEFAULT_SOURCE_DIR),
    )?;
    let target = path_or_prompt(
        cli.target,
        &format!("Enter target directory (default: {DEFAULT_TARGET_DIR}): "),
        Some(DEFAULT_TARGET_DIR),
    )?;

    let use_case = BatchResizeUseCase::new(
        Box::new(SquareImageResizer::new(BATCH_RESIZE_SIZE)),
        Some(Box::new(|path: &Path| println!("Resized {}", path.display()))),
    );
    use_case.execute(&source, &target)?;
    Ok(())
}
