use std::path::Path;

use crate::shared::error::InputError;
use crate::shared::source_media::{MediaKind, SourceMedia};
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::ffmpeg_reader::FfmpegReader;
use super::image_file_reader::ImageFileReader;

/// An input that has been classified and successfully opened.
pub struct ResolvedInput {
    pub media: SourceMedia,
    pub metadata: VideoMetadata,
    pub reader: Box<dyn VideoReader>,
}

/// Classifies `path` and opens a reader for it.
///
/// Every failure is an [`InputError`] raised before any frame is decoded, so
/// callers can abort without having produced output.
pub fn resolve(path: &Path) -> Result<ResolvedInput, InputError> {
    let media = SourceMedia::resolve(path)?;
    let reader = reader_for(media.kind());
    open_with(media, reader)
}

pub fn reader_for(kind: MediaKind) -> Box<dyn VideoReader> {
    match kind {
        MediaKind::Image => Box::new(ImageFileReader::new()),
        MediaKind::Video => Box::new(FfmpegReader::new()),
    }
}

/// Opens an already-classified source with the given reader.
pub fn open_with(
    media: SourceMedia,
    mut reader: Box<dyn VideoReader>,
) -> Result<ResolvedInput, InputError> {
    let metadata = reader
        .open(media.path())
        .map_err(|e| InputError::Corrupt {
            path: media.path().to_path_buf(),
            reason: e.to_string(),
        })?;

    log::info!(
        "Resolved {:?} input {} ({}x{}, {} frame(s))",
        media.kind(),
        media.path().display(),
        metadata.width,
        metadata.height,
        metadata.total_frames
    );

    Ok(ResolvedInput {
        media,
        metadata,
        reader,
    })
}
