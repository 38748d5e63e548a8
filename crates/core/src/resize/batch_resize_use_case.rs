use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::resize::domain::image_resizer::{ImageResizer, ResizeError};
use crate::shared::constants::RESIZABLE_EXTENSIONS;

#[derive(Error, Debug)]
pub enum BatchResizeError {
    #[error("source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("cannot read source directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create target directory {path}: {source}")]
    CreateTarget {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Resize(#[from] ResizeError),
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchResizeReport {
    pub resized: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Resizes every image in a directory into another directory, keeping file
/// names. Files that are not decodable images are skipped; a failed write
/// aborts the batch.
pub struct BatchResizeUseCase {
    resizer: Box<dyn ImageResizer>,
    on_resized: Option<Box<dyn Fn(&Path) + Send>>,
}

impl BatchResizeUseCase {
    pub fn new(
        resizer: Box<dyn ImageResizer>,
        on_resized: Option<Box<dyn Fn(&Path) + Send>>,
    ) -> Self {
        Self {
            resizer,
            on_resized,
        }
    }

    pub fn execute(
        &self,
        source_dir: &Path,
        target_dir: &Path,
    ) -> Result<BatchResizeReport, BatchResizeError> {
        if !source_dir.is_dir() {
            return Err(BatchResizeError::SourceNotFound(source_dir.to_path_buf()));
        }
        let candidates = list_candidates(source_dir)?;

        fs::create_dir_all(target_dir).map_err(|source| BatchResizeError::CreateTarget {
            path: target_dir.to_path_buf(),
            source,
        })?;

        let mut report = BatchResizeReport::default();
        for (path, is_known) in candidates {
            let Some(name) = path.file_name() else {
                continue;
            };
            if !is_known {
                log::debug!("Skipping {} (unknown extension)", path.display());
                report.skipped.push(path);
                continue;
            }

            let target = target_dir.join(name);
            match self.resizer.resize_file(&path, &target) {
                Ok(()) => {
                    if let Some(ref cb) = self.on_resized {
                        cb(&target);
                    }
                    report.resized.push(target);
                }
                Err(ResizeError::Decode { reason, .. }) => {
                    log::debug!("Skipping {}: {reason}", path.display());
                    report.skipped.push(path);
                }
                Err(e) => return Err(e.into()),
            }
        }

        log::info!(
            "Resized {} image(s), skipped {} file(s)",
            report.resized.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Regular files in `dir`, sorted by name, each paired with whether its
/// extension is one the resizer handles.
fn list_candidates(dir: &Path) -> Result<Vec<(PathBuf, bool)>, BatchResizeError> {
    let read_err = |source| BatchResizeError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files
        .into_iter()
        .map(|p| {
            let known = has_resizable_extension(&p);
            (p, known)
        })
        .collect())
}

fn has_resizable_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            RESIZABLE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}
