//! Start-up sequence of an extraction run.

use std::fs;
use std::path::{Path, PathBuf};

use facecrop_core::detection::infrastructure::model_resolver::ModelResolveError;
use facecrop_core::shared::error::OutputError;
use facecrop_core::video::infrastructure::input_resolver::{self, ResolvedInput};

/// An opened input together with the loaded detector.
pub struct PreparedRun<D> {
    pub input: ResolvedInput,
    pub detector: D,
}

/// Resolves the input, then loads the models, then creates the output
/// directory. A failure in either of the first two steps leaves the output
/// directory untouched.
pub fn prepare<D>(
    input: &Path,
    output: &Path,
    load_models: impl FnOnce() -> Result<D, Box<dyn std::error::Error>>,
) -> Result<PreparedRun<D>, Box<dyn std::error::Error>> {
    let input = input_resolver::resolve(input)?;
    let detector = load_models()?;
    create_output_dir(output)?;
    Ok(PreparedRun { input, detector })
}

pub fn create_output_dir(path: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(path).map_err(|e| OutputError::CannotCreate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Picks the 68-point landmark model: an explicit path wins, otherwise the
/// resolved one. `None` means no model is available and the detector's own
/// keypoints should be used instead.
pub fn choose_landmark_model(
    explicit: Option<PathBuf>,
    resolve: impl FnOnce() -> Result<PathBuf, ModelResolveError>,
) -> Result<Option<PathBuf>, ModelResolveError> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    match resolve() {
        Ok(path) => Ok(Some(path)),
        Err(ModelResolveError::NotFound { name, searched }) => {
            log::warn!(
                "Landmark model {name} not found in {}; tagging eyes, nose tip and lips from face keypoints only",
                searched.display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
