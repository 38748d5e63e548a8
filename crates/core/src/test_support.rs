use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

pub fn make_frame(width: u32, height: u32, index: usize) -> Frame {
    Frame::new(
        vec![128; (width * height * 3) as usize],
        width,
        height,
        3,
        index,
    )
}

/// Frame with a horizontal gradient so crops and resizes are distinguishable.
pub fn gradient_frame(width: u32, height: u32, index: usize) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width.max(1)) as u8);
            data.push((y * 255 / height.max(1)) as u8);
            data.push(64);
        }
    }
    Frame::new(data, width, height, 3, index)
}

pub fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let mut img = image::RgbImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgb([50, 100, 200]);
    }
    img.save(&path).unwrap();
    path
}

/// Writes a JPEG whose left half is red and right half blue, with an APP1
/// Exif segment carrying the given orientation tag value.
pub fn write_test_jpeg_with_orientation(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    orientation: u16,
) -> PathBuf {
    let img = image::RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    // Big-endian TIFF header, one IFD entry: 0x0112 Orientation, SHORT, count 1.
    let mut exif = b"Exif\0\0MM\0\x2a\0\0\0\x08\0\x01\x01\x12\0\x03\0\0\0\x01".to_vec();
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let segment_len = (exif.len() + 2) as u16;

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xff, 0xe1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&exif);
    out.extend_from_slice(&jpeg[2..]);

    let path = dir.join(name);
    std::fs::write(&path, out).unwrap();
    path
}

/// Encodes `num_frames` flat grey frames with MPEG-4 into `path`. The
/// container is chosen from the extension, so `.mov` yields a QuickTime file.
pub fn create_test_video(path: &Path, num_frames: usize, width: u32, height: u32, fps: f64) {
    ffmpeg_next::init().unwrap();

    let mut octx = ffmpeg_next::format::output(path).unwrap();

    let global_header = octx
        .format()
        .flags()
        .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

    let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
    let mut ost = octx.add_stream(Some(codec)).unwrap();

    let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .unwrap();

    encoder_ctx.set_width(width);
    encoder_ctx.set_height(height);
    encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
    encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps as i32));
    encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps as i32, 1)));

    if global_header {
        encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
    }

    let mut encoder = encoder_ctx
        .open_with(ffmpeg_next::Dictionary::new())
        .unwrap();
    ost.set_parameters(&encoder);

    octx.write_header().unwrap();

    let ost_time_base = octx.stream(0).unwrap().time_base();

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        ffmpeg_next::format::Pixel::RGB24,
        width,
        height,
        ffmpeg_next::format::Pixel::YUV420P,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .unwrap();

    for i in 0..num_frames {
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
        );
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        let value = ((i * 40) % 256) as u8;
        for row in 0..height as usize {
            for col in 0..width as usize {
                let offset = row * stride + col * 3;
                data[offset] = value;
                data[offset + 1] = value;
                data[offset + 2] = value;
            }
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&rgb_frame, &mut yuv_frame).unwrap();
        yuv_frame.set_pts(Some(i as i64));

        encoder.send_frame(&yuv_frame).unwrap();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, fps as i32), ost_time_base);
            encoded.write_interleaved(&mut octx).unwrap();
        }
    }

    encoder.send_eof().unwrap();
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(0);
        encoded.rescale_ts(ffmpeg_next::Rational(1, fps as i32), ost_time_base);
        encoded.write_interleaved(&mut octx).unwrap();
    }

    octx.write_trailer().unwrap();
}

/// In-memory reader over prepared frames, optionally failing after the last one.
pub struct StubReader {
    frames: Vec<Frame>,
    fail_at_end: bool,
    pub closed: Arc<Mutex<bool>>,
}

impl StubReader {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            fail_at_end: false,
            closed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_error_after(frames: Vec<Frame>) -> Self {
        Self {
            fail_at_end: true,
            ..Self::new(frames)
        }
    }
}

impl VideoReader for StubReader {
    fn open(&mut self, _path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        let (width, height) = self
            .frames
            .first()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0));
        Ok(VideoMetadata {
            width,
            height,
            fps: 30.0,
            total_frames: self.frames.len(),
            codec: String::new(),
            source_path: None,
            rotation: 0,
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let tail: Option<Result<Frame, Box<dyn std::error::Error>>> = if self.fail_at_end {
            Some(Err("corrupt packet".into()))
        } else {
            None
        };
        Box::new(self.frames.drain(..).map(Ok).chain(tail))
    }

    fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}

/// Records written paths instead of touching the filesystem.
pub struct MemoryImageWriter {
    pub written: Arc<Mutex<Vec<PathBuf>>>,
    fail_after: Option<usize>,
}

impl MemoryImageWriter {
    pub fn new() -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
            fail_after: None,
        }
    }

    pub fn failing_after(successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::new()
        }
    }
}

impl ImageWriter for MemoryImageWriter {
    fn write(&self, path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut written = self.written.lock().unwrap();
        if self.fail_after.is_some_and(|n| written.len() >= n) {
            return Err("permission denied".into());
        }
        written.push(path.to_path_buf());
        Ok(())
    }
}
