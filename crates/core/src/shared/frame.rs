use ndarray::{s, ArrayView3, ArrayViewMut3};

use crate::shared::region::Region;

/// A single video/image frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels inside `region` into a new frame with the same index.
    ///
    /// The region must already lie within the frame.
    pub fn crop(&self, region: &Region) -> Frame {
        debug_assert!(
            region.x >= 0
                && region.y >= 0
                && region.x + region.width <= self.width as i32
                && region.y + region.height <= self.height as i32,
            "crop region must lie within the frame"
        );
        let x1 = region.x as usize;
        let y1 = region.y as usize;
        let x2 = x1 + region.width as usize;
        let y2 = y1 + region.height as usize;

        let view = self.as_ndarray();
        let data: Vec<u8> = view.slice(s![y1..y2, x1..x2, ..]).iter().copied().collect();

        Frame::new(
            data,
            region.width as u32,
            region.height as u32,
            self.channels,
            self.index,
        )
    }

    /// Returns the frame rotated clockwise by `degrees` (0, 90, 180 or 270).
    ///
    /// Any other angle returns an unchanged copy.
    pub fn rotated(&self, degrees: i32) -> Frame {
        let src = self.as_ndarray();
        let view = match degrees {
            90 => src.permuted_axes([1, 0, 2]).slice_move(s![.., ..;-1, ..]),
            180 => src.slice_move(s![..;-1, ..;-1, ..]),
            270 => src.permuted_axes([1, 0, 2]).slice_move(s![..;-1, .., ..]),
            _ => return self.clone(),
        };
        let (out_h, out_w, _) = view.dim();
        let data: Vec<u8> = view.iter().copied().collect();
        Frame::new(data, out_w as u32, out_h as u32, self.channels, self.index)
    }

    /// Returns the frame flipped left to right.
    pub fn mirrored(&self) -> Frame {
        let data: Vec<u8> = self
            .as_ndarray()
            .slice_move(s![.., ..;-1, ..])
            .iter()
            .copied()
            .collect();
        Frame::new(data, self.width, self.height, self.channels, self.index)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 RGB frame where each pixel's R channel holds `row * 10 + col`.
    fn numbered_frame() -> Frame {
        let mut data = Vec::new();
        for row in 0..2u8 {
            for col in 0..3u8 {
                data.extend_from_slice(&[row * 10 + col, 0, 0]);
            }
        }
        Frame::new(data, 3, 2, 3, 7)
    }

    fn red_channel(frame: &Frame) -> Vec<u8> {
        frame.data().chunks(3).map(|px| px[0]).collect()
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 24]; // 2x4x3
        let frame = Frame::new(data, 4, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_mut_modification() {
        let data = vec![0u8; 12]; // 2x2x3
        let mut frame = Frame::new(data, 2, 2, 3, 0);
        {
            let mut arr = frame.as_ndarray_mut();
            arr[[0, 1, 2]] = 128; // row=0, col=1, B channel
        }
        assert_eq!(frame.as_ndarray()[[0, 1, 2]], 128);
    }

    #[test]
    fn test_crop_copies_sub_rectangle() {
        let frame = numbered_frame();
        let crop = frame.crop(&Region::new(1, 0, 2, 2));
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        assert_eq!(crop.index(), 7);
        assert_eq!(red_channel(&crop), vec![1, 2, 11, 12]);
    }

    #[test]
    fn test_crop_full_frame_is_identity() {
        let frame = numbered_frame();
        let crop = frame.crop(&Region::new(0, 0, 3, 2));
        assert_eq!(crop, frame);
    }

    #[test]
    fn test_rotated_90_clockwise() {
        // 0  1  2        10  0
        // 10 11 12   ->  11  1
        //                12  2
        let rotated = numbered_frame().rotated(90);
        assert_eq!(rotated.width(), 2);
        assert_eq!(rotated.height(), 3);
        assert_eq!(red_channel(&rotated), vec![10, 0, 11, 1, 12, 2]);
    }

    #[test]
    fn test_rotated_180() {
        let rotated = numbered_frame().rotated(180);
        assert_eq!(rotated.width(), 3);
        assert_eq!(red_channel(&rotated), vec![12, 11, 10, 2, 1, 0]);
    }

    #[test]
    fn test_rotated_270_clockwise() {
        let rotated = numbered_frame().rotated(270);
        assert_eq!(rotated.width(), 2);
        assert_eq!(rotated.height(), 3);
        assert_eq!(red_channel(&rotated), vec![2, 12, 1, 11, 0, 10]);
    }

    #[test]
    fn test_mirrored_reverses_columns() {
        let mirrored = numbered_frame().mirrored();
        assert_eq!((mirrored.width(), mirrored.height()), (3, 2));
        assert_eq!(red_channel(&mirrored), vec![2, 1, 0, 12, 11, 10]);
    }

    #[test]
    fn test_rotated_keeps_channel_order() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 3, 0);
        assert_eq!(frame.rotated(90).data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(frame.rotated(180).data(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_rotated_zero_is_identity() {
        let frame = numbered_frame();
        assert_eq!(frame.rotated(0), frame);
    }
}
