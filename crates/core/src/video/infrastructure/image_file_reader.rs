use std::path::Path;

use image::metadata::Orientation;
use image::{ImageDecoder, ImageReader};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::ffmpeg_reader::extract_rgb_pixels;

/// Adapts a single image file to the [`VideoReader`] interface.
///
/// Treats the image as a one-frame video with `fps=0` and `total_frames=1`,
/// so stills and selfie videos go through the same pipeline.
///
/// Decodes with ffmpeg, which is significantly faster than the pure-Rust
/// `image` crate for large phone photos. ffmpeg leaves the EXIF orientation
/// alone, so it is read with `image` and applied to the decoded frame.
pub struct ImageFileReader {
    frame: Option<Frame>,
    opened: bool,
}

// Safety: ImageFileReader holds no ffmpeg state between calls.
unsafe impl Send for ImageFileReader {}

impl ImageFileReader {
    pub fn new() -> Self {
        Self {
            frame: None,
            opened: false,
        }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_single_frame(
    ictx: &mut ffmpeg_next::format::context::Input,
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
) -> Result<Frame, Box<dyn std::error::Error>> {
    for (stream, packet) in ictx.packets() {
        if stream.index() != video_stream_index {
            continue;
        }
        decoder.send_packet(&packet)?;
        if let Some(frame) = try_receive_frame(decoder, scaler)? {
            return Ok(frame);
        }
    }

    // Some formats buffer their only frame until EOF.
    let _ = decoder.send_eof();
    try_receive_frame(decoder, scaler)?.ok_or_else(|| "Failed to decode image".into())
}

fn try_receive_frame(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if decoder.receive_frame(&mut decoded).is_err() {
        return Ok(None);
    }
    let (width, height) = (decoder.width(), decoder.height());
    let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
    scaler.run(&decoded, &mut rgb_frame)?;
    let pixels = extract_rgb_pixels(&rgb_frame, width, height);
    Ok(Some(Frame::new(pixels, width, height, 3, 0)))
}

/// EXIF orientation of a still, or no transform when it cannot be read.
fn read_orientation(path: &Path) -> Orientation {
    let read = || -> Result<Orientation, Box<dyn std::error::Error>> {
        let mut decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()?;
        Ok(decoder.orientation()?)
    };
    read().unwrap_or_else(|e| {
        log::debug!("No orientation for {}: {e}", path.display());
        Orientation::NoTransforms
    })
}

/// Turns a stored frame upright. Returns the frame and the clockwise
/// rotation that was applied.
fn apply_orientation(frame: Frame, orientation: Orientation) -> (Frame, i32) {
    match orientation {
        Orientation::NoTransforms => (frame, 0),
        Orientation::Rotate90 => (frame.rotated(90), 90),
        Orientation::Rotate180 => (frame.rotated(180), 180),
        Orientation::Rotate270 => (frame.rotated(270), 270),
        Orientation::FlipHorizontal => (frame.mirrored(), 0),
        Orientation::FlipVertical => (frame.rotated(180).mirrored(), 180),
        Orientation::Rotate90FlipH => (frame.rotated(90).mirrored(), 90),
        Orientation::Rotate270FlipH => (frame.rotated(270).mirrored(), 270),
    }
}

impl VideoReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No image data found")?;
        let video_stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let frame = decode_single_frame(&mut ictx, &mut decoder, &mut scaler, video_stream_index)?;
        let (frame, rotation) = apply_orientation(frame, read_orientation(path));
        if rotation != 0 {
            log::debug!("Applied EXIF rotation {rotation} to {}", path.display());
        }
        self.frame = Some(frame);
        self.opened = true;

        Ok(VideoMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: 1,
            codec: String::new(),
            source_path: Some(path.to_path_buf()),
            rotation,
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if !self.opened {
            return Box::new(std::iter::once(Err("ImageFileReader: not opened".into())));
        }
        Box::new(self.frame.take().into_iter().map(Ok))
    }

    fn close(&mut self) {
        self.frame = None;
        self.opened = false;
    }
}
