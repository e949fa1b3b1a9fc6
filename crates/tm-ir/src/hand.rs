//! Hand detections as delivered by the external landmark detector.

use arrayvec::ArrayVec;
use core::time::Duration;

/// Landmarks per hand reported by the detector (wrist + 4 per finger).
pub const MAX_LANDMARKS: usize = 21;

/// Upper bound on hands carried in one frame.
pub const MAX_HANDS: usize = 4;

/// Handedness label attached to a detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// The other hand.
    pub const fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    /// Single-letter label used by the trace format.
    pub const fn letter(self) -> char {
        match self {
            Handedness::Left => 'L',
            Handedness::Right => 'R',
        }
    }
}

/// A landmark in resolution-relative coordinates, nominally in [0, 1]².
///
/// Detectors may report points slightly outside the frame; nothing here
/// clamps them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Project onto the pixel grid, truncating toward zero.
    pub fn to_pixel(self, resolution: Resolution) -> PixelPoint {
        PixelPoint {
            x: (self.x * resolution.width as f32) as i32,
            y: (self.y * resolution.height as f32) as i32,
        }
    }
}

/// A point on the video frame's pixel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Video frame resolution in pixels, supplied once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// One detected hand: a raw handedness label and its ordered landmarks.
#[derive(Clone, Debug, PartialEq)]
pub struct HandDetection {
    pub handedness: Handedness,
    pub landmarks: ArrayVec<Landmark, MAX_LANDMARKS>,
}

impl HandDetection {
    /// Build a detection from `(x, y)` pairs. Points beyond
    /// [`MAX_LANDMARKS`] are dropped.
    pub fn from_points(handedness: Handedness, points: &[(f32, f32)]) -> Self {
        let landmarks = points
            .iter()
            .take(MAX_LANDMARKS)
            .map(|&(x, y)| Landmark::new(x, y))
            .collect();
        Self {
            handedness,
            landmarks,
        }
    }

    /// Landmarks projected onto the pixel grid.
    pub fn pixels(&self, resolution: Resolution) -> impl Iterator<Item = PixelPoint> + '_ {
        self.landmarks.iter().map(move |l| l.to_pixel(resolution))
    }
}

/// Everything the detector reported for one video frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionFrame {
    /// Capture time relative to the start of the stream
    pub timestamp: Duration,
    /// Detected hands in detector order
    pub hands: ArrayVec<HandDetection, MAX_HANDS>,
}

impl DetectionFrame {
    /// A frame with no hands.
    pub fn empty(timestamp: Duration) -> Self {
        Self {
            timestamp,
            hands: ArrayVec::new(),
        }
    }

    /// A frame carrying the given hands. Hands beyond [`MAX_HANDS`] are dropped.
    pub fn with_hands(timestamp: Duration, hands: impl IntoIterator<Item = HandDetection>) -> Self {
        Self {
            timestamp,
            hands: hands.into_iter().take(MAX_HANDS).collect(),
        }
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_projection_truncates() {
        let res = Resolution::new(640, 480);
        let p = Landmark::new(0.5, 0.999).to_pixel(res);
        assert_eq!(p, PixelPoint::new(320, 479));
    }

    #[test]
    fn opposite_hand() {
        assert_eq!(Handedness::Left.opposite(), Handedness::Right);
        assert_eq!(Handedness::Right.opposite(), Handedness::Left);
    }

    #[test]
    fn from_points_caps_landmarks() {
        let points = [(0.1, 0.1); 30];
        let hand = HandDetection::from_points(Handedness::Left, &points);
        assert_eq!(hand.landmarks.len(), MAX_LANDMARKS);
    }

    #[test]
    fn with_hands_caps_hand_count() {
        let hand = HandDetection::from_points(Handedness::Right, &[(0.2, 0.3)]);
        let frame = DetectionFrame::with_hands(Duration::ZERO, core::iter::repeat(hand).take(6));
        assert_eq!(frame.hand_count(), MAX_HANDS);
    }
}
