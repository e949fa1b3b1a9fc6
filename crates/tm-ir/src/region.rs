//! Pixel-space calibration region.

use crate::hand::PixelPoint;

/// Bounding box of hand positions observed during calibration.
///
/// `top_left <= bottom_right` component-wise once anything has been
/// observed. The default value is the degenerate `(0,0)-(0,0)` box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CalibrationRegion {
    pub top_left: PixelPoint,
    pub bottom_right: PixelPoint,
}

impl CalibrationRegion {
    pub const fn new(top_left: PixelPoint, bottom_right: PixelPoint) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn bounding<I: IntoIterator<Item = PixelPoint>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut region = Self::new(first, first);
        for p in points {
            region.include(p);
        }
        Some(region)
    }

    /// Grow to contain `point`.
    pub fn include(&mut self, point: PixelPoint) {
        self.top_left.x = self.top_left.x.min(point.x);
        self.top_left.y = self.top_left.y.min(point.y);
        self.bottom_right.x = self.bottom_right.x.max(point.x);
        self.bottom_right.y = self.bottom_right.y.max(point.y);
    }

    /// Grow to contain `other`.
    pub fn union(&mut self, other: &CalibrationRegion) {
        self.include(other.top_left);
        self.include(other.bottom_right);
    }

    /// Horizontal extent, widened so saturated pixel coordinates cannot overflow.
    pub fn width(&self) -> i64 {
        i64::from(self.bottom_right.x) - i64::from(self.top_left.x)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom_right.y) - i64::from(self.top_left.y)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Position of `x` across the region's width, clamped to [0, 1].
    ///
    /// A zero-width region yields 0.0.
    pub fn normalize_x(&self, x: i32) -> f64 {
        normalize(x, self.top_left.x, self.width())
    }

    /// Position of `y` down the region's height, clamped to [0, 1].
    ///
    /// A zero-height region yields 0.0.
    pub fn normalize_y(&self, y: i32) -> f64 {
        normalize(y, self.top_left.y, self.height())
    }
}

fn normalize(value: i32, origin: i32, extent: i64) -> f64 {
    if extent <= 0 {
        return 0.0;
    }
    let offset = i64::from(value) - i64::from(origin);
    (offset as f64 / extent as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x0: i32, y0: i32, x1: i32, y1: i32) -> CalibrationRegion {
        CalibrationRegion::new(PixelPoint::new(x0, y0), PixelPoint::new(x1, y1))
    }

    #[test]
    fn bounding_of_points() {
        let r = CalibrationRegion::bounding([
            PixelPoint::new(10, 40),
            PixelPoint::new(30, 5),
            PixelPoint::new(20, 20),
        ])
        .unwrap();
        assert_eq!(r, region(10, 5, 30, 40));
    }

    #[test]
    fn bounding_of_nothing() {
        assert!(CalibrationRegion::bounding(core::iter::empty()).is_none());
    }

    #[test]
    fn union_only_grows() {
        let mut r = region(10, 10, 20, 20);
        r.union(&region(15, 15, 18, 18));
        assert_eq!(r, region(10, 10, 20, 20));
        r.union(&region(0, 12, 25, 30));
        assert_eq!(r, region(0, 10, 25, 30));
    }

    #[test]
    fn normalize_inside_region() {
        let r = region(0, 0, 100, 100);
        assert_eq!(r.normalize_x(75), 0.75);
        assert_eq!(r.normalize_y(25), 0.25);
    }

    #[test]
    fn normalize_clamps_outside_region() {
        let r = region(100, 100, 200, 200);
        assert_eq!(r.normalize_x(50), 0.0);
        assert_eq!(r.normalize_x(500), 1.0);
        assert_eq!(r.normalize_y(-40), 0.0);
        assert_eq!(r.normalize_y(201), 1.0);
    }

    #[test]
    fn degenerate_region_is_defined() {
        let r = CalibrationRegion::default();
        assert!(r.is_degenerate());
        for v in [-1000, -1, 0, 1, 1000] {
            assert_eq!(r.normalize_x(v), 0.0);
            assert_eq!(r.normalize_y(v), 0.0);
        }
    }

    #[test]
    fn flat_region_only_guards_flat_axis() {
        let r = region(0, 50, 100, 50);
        assert_eq!(r.normalize_x(50), 0.5);
        assert_eq!(r.normalize_y(80), 0.0);
    }

    #[test]
    fn extreme_corners_do_not_overflow() {
        let r = region(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert!(!r.is_degenerate());
        assert_eq!(r.width(), u32::MAX as i64);
        assert_eq!(r.normalize_x(i32::MIN), 0.0);
        assert_eq!(r.normalize_x(i32::MAX), 1.0);

        let small = region(10, 10, 20, 20);
        assert_eq!(small.normalize_x(i32::MIN), 0.0);
        assert_eq!(small.normalize_y(i32::MAX), 1.0);
    }
}
