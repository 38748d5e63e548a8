/// An axis-aligned rectangle in integer pixel coordinates.
///
/// `x`/`y` is the top-left corner; the right and bottom edges are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest region covering every point: floor of the minimum, ceil of
    /// the maximum. Returns `None` for an empty point set.
    pub fn bounding<'a, I>(points: I) -> Option<Region>
    where
        I: IntoIterator<Item = &'a (f64, f64)>,
    {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut any = false;

        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            any = true;
        }

        if !any {
            return None;
        }

        let x1 = min_x.floor() as i32;
        let y1 = min_y.floor() as i32;
        let x2 = max_x.ceil() as i32;
        let y2 = max_y.ceil() as i32;
        Some(Region::from_corners(x1, y1, x2, y2))
    }

    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Grows each side independently by a fraction of the region's size.
    pub fn expand(&self, left: f64, top: f64, right: f64, bottom: f64) -> Region {
        let w = self.width as f64;
        let h = self.height as f64;
        Region::from_corners(
            (self.x as f64 - w * left).floor() as i32,
            (self.y as f64 - h * top).floor() as i32,
            (self.right() as f64 + w * right).ceil() as i32,
            (self.bottom() as f64 + h * bottom).ceil() as i32,
        )
    }

    /// Intersects the region with a `frame_w` × `frame_h` frame.
    ///
    /// Returns `None` when nothing of the region remains inside the frame.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<Region> {
        let x1 = self.x.clamp(0, frame_w as i32);
        let y1 = self.y.clamp(0, frame_h as i32);
        let x2 = self.right().clamp(0, frame_w as i32);
        let y2 = self.bottom().clamp(0, frame_h as i32);
        let clamped = Region::from_corners(x1, y1, x2, y2);
        if clamped.is_empty() {
            None
        } else {
            Some(clamped)
        }
    }
}
