use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec).
///
/// Converts each decoded frame to RGB24, applies the container's display
/// rotation so portrait selfies come out upright, and wraps it in a [`Frame`].
pub struct FfmpegReader {
    stream: Option<OpenStream>,
    metadata: Option<VideoMetadata>,
}

/// Demuxer and decoder state for an opened file.
struct OpenStream {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
    width: u32,
    height: u32,
    rotation: i32,
}

// Safety: FfmpegReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegReader {}

impl FfmpegReader {
    pub fn new() -> Self {
        Self {
            stream: None,
            metadata: None,
        }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let width = decoder.width();
        let height = decoder.height();
        let rotation = extract_rotation(&stream);

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames: stream.frames().max(0) as usize,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
            rotation,
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::debug!(
            "Opened {} ({width}x{height}, {fps:.2} fps, rotation {rotation})",
            path.display()
        );

        self.metadata = Some(metadata.clone());
        self.stream = Some(OpenStream {
            ictx,
            decoder,
            scaler,
            video_stream_index,
            width,
            height,
            rotation,
        });

        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(stream) = self.stream.as_mut() else {
            return Box::new(std::iter::once(Err("FfmpegReader: not opened".into())));
        };

        Box::new(FfmpegFrameIter {
            stream,
            frame_index: 0,
            flushing: false,
            done: false,
        })
    }

    fn close(&mut self) {
        self.stream = None;
        self.metadata = None;
    }
}

/// Lazy iterator that decodes video frames one at a time, avoiding the need
/// to buffer the entire video in memory.
struct FfmpegFrameIter<'a> {
    stream: &'a mut OpenStream,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl FfmpegFrameIter<'_> {
    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let s = &mut *self.stream;
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if s.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = s.scaler.run(&decoded, &mut rgb_frame) {
            return Some(Err(Box::new(e)));
        }

        let pixels = extract_rgb_pixels(&rgb_frame, s.width, s.height);
        let frame = Frame::new(pixels, s.width, s.height, 3, self.frame_index);
        let frame = if s.rotation != 0 {
            frame.rotated(s.rotation)
        } else {
            frame
        };
        self.frame_index += 1;
        Some(Ok(frame))
    }
}

impl Iterator for FfmpegFrameIter<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let next_packet = self.stream.ictx.packets().next();
            let Some((packet_stream, packet)) = next_packet else {
                let _ = self.stream.decoder.send_eof();
                self.flushing = true;
                if let Some(result) = self.try_receive() {
                    return Some(result);
                }
                self.done = true;
                return None;
            };

            if packet_stream.index() != self.stream.video_stream_index {
                continue;
            }

            // A damaged packet loses its frame; the decoder resyncs on a later one.
            if let Err(e) = self.stream.decoder.send_packet(&packet) {
                log::warn!(
                    "Skipping undecodable packet after frame {}: {e}",
                    self.frame_index
                );
                continue;
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }
}

/// Extracts the clockwise display rotation of a video stream.
///
/// Tries stream side data (DisplayMatrix) first, then falls back to the
/// `"rotate"` metadata tag. Returns 0, 90, 180, or 270.
fn extract_rotation(stream: &ffmpeg_next::format::stream::Stream) -> i32 {
    for side_data in stream.side_data() {
        if side_data.kind() == ffmpeg_next::codec::packet::side_data::Type::DisplayMatrix {
            if let Some(angle) = parse_display_matrix(side_data.data()) {
                return normalize_rotation(angle);
            }
        }
    }

    if let Some(rotate_str) = stream.metadata().get("rotate") {
        if let Ok(angle) = rotate_str.parse::<i32>() {
            return normalize_rotation(angle);
        }
    }

    0
}

/// Parses a 3x3 display matrix (9 x i32, 16.16 fixed-point, little-endian)
/// into a rotation angle in degrees.
///
/// The matrix describes the transform needed for display, so the angle of
/// its first row vector is negated.
fn parse_display_matrix(data: &[u8]) -> Option<i32> {
    if data.len() < 36 {
        return None;
    }

    let m00 = i32::from_le_bytes(data[0..4].try_into().ok()?) as f64 / 65536.0;
    let m10 = i32::from_le_bytes(data[4..8].try_into().ok()?) as f64 / 65536.0;

    let angle_rad = m10.atan2(m00);
    Some(-angle_rad.to_degrees().round() as i32)
}

/// Snaps an angle to the nearest of 0, 90, 180, or 270.
fn normalize_rotation(angle: i32) -> i32 {
    match angle.rem_euclid(360) {
        45..=134 => 90,
        135..=224 => 180,
        225..=315 => 270,
        _ => 0,
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may pad each row (stride > width*3); the padding is dropped.
pub(crate) fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}
