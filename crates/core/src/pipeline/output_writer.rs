use std::fmt;
use std::path::{Path, PathBuf};

use crate::cropping::domain::crop_result::CropResult;
use crate::shared::constants::{FEATURE_CROP_PREFIX, HEAD_CROP_PREFIX};
use crate::shared::error::OutputError;
use crate::video::domain::image_writer::ImageWriter;

/// One persisted crop.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputRecord {
    pub index: usize,
    pub path: PathBuf,
    pub tags: Vec<String>,
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved {} with tags: [{}]",
            self.path.display(),
            self.tags.join(", ")
        )
    }
}

/// Persists crops as `<dir>/feature_crop_<n>.png` with a run-scoped counter.
///
/// The counter starts at zero and only advances after a frame's crops have
/// all been written, so indices stay contiguous across skipped frames and
/// are never reused after a failure.
pub struct OutputWriter {
    output_dir: PathBuf,
    image_writer: Box<dyn ImageWriter>,
    next_index: usize,
}

impl OutputWriter {
    pub fn new(output_dir: &Path, image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            image_writer,
            next_index: 0,
        }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Writes the feature crop of one frame, and its head crop when present,
    /// under the same index.
    pub fn write(
        &mut self,
        feature: &CropResult,
        head: Option<&CropResult>,
    ) -> Result<Vec<OutputRecord>, OutputError> {
        let index = self.next_index;
        let mut records = vec![self.write_one(FEATURE_CROP_PREFIX, index, feature)?];
        if let Some(head) = head {
            records.push(self.write_one(HEAD_CROP_PREFIX, index, head)?);
        }
        self.next_index += 1;
        Ok(records)
    }

    fn write_one(
        &self,
        prefix: &str,
        index: usize,
        crop: &CropResult,
    ) -> Result<OutputRecord, OutputError> {
        let path = self.output_dir.join(format!("{prefix}_{index}.png"));
        self.image_writer
            .write(&path, &crop.frame)
            .map_err(|e| OutputError::CannotCreate {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        log::debug!("Wrote {}", path.display());
        Ok(OutputRecord {
            index,
            path,
            tags: crop.tags.clone(),
        })
    }
}
