use std::path::{Path, PathBuf};

use crate::shared::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::shared::error::InputError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a path by its extension. The match is exact, so `.JPG`
    /// is not accepted.
    pub fn from_path(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?;
        if IMAGE_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// The user-supplied source file, resolved once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMedia {
    path: PathBuf,
    kind: MediaKind,
}

impl SourceMedia {
    pub fn resolve(path: &Path) -> Result<Self, InputError> {
        if !path.is_file() {
            return Err(InputError::NotFound(path.to_path_buf()));
        }
        let kind = MediaKind::from_path(path).ok_or_else(|| InputError::UnsupportedExtension {
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}
