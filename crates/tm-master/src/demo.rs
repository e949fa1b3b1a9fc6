//! Synthetic two-hand performance.

use std::f64::consts::TAU;
use std::time::Duration;

use tm_ir::{DetectionFrame, HandDetection, Handedness, Resolution, ThereminConfig};

use crate::source::{DetectionSource, SourceError};

const DEMO_FPS: u32 = 30;
/// Normalized playing box the hands sweep during calibration.
const BOX_MIN: f64 = 0.15;
const BOX_MAX: f64 = 0.85;
/// Landmark offsets around each hand's centre.
const HAND_SHAPE: [(f64, f64); 5] = [
    (0.0, 0.0),
    (0.03, -0.05),
    (-0.03, -0.04),
    (0.04, 0.02),
    (-0.02, 0.05),
];

/// A scripted player: sweeps both hands across the playing box during
/// calibration, then glides pitch with one hand and swells volume with the
/// other.
///
/// Raw labels follow the configured mirroring, so the mapper's correction
/// recovers the intended hands.
pub struct DemoPerformance {
    resolution: Resolution,
    calibration: f64,
    length: Duration,
    mirrored: bool,
    frame_index: u64,
}

impl DemoPerformance {
    /// A performance of `length`, including the calibration window.
    pub fn new(config: &ThereminConfig, length: Duration) -> Self {
        Self {
            resolution: Resolution::default(),
            calibration: config.calibration_seconds,
            length,
            mirrored: config.mirrored_input,
            frame_index: 0,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Centres of the pitch and volume hands at time `t` seconds.
    fn hand_centres(&self, t: f64) -> ((f64, f64), (f64, f64)) {
        let span = BOX_MAX - BOX_MIN;
        if t <= self.calibration {
            // Diagonal sweeps: the pitch hand covers the right half, the
            // volume hand the left, together reaching every edge of the box.
            let s = if self.calibration > 0.0 { t / self.calibration } else { 1.0 };
            let lerp = |a: f64, b: f64| a + (b - a) * s;
            let pitch = (lerp(BOX_MIN + span * 0.5, BOX_MAX), lerp(BOX_MAX, BOX_MIN));
            let volume = (lerp(BOX_MIN, BOX_MIN + span * 0.5), lerp(BOX_MAX, BOX_MIN));
            return (pitch, volume);
        }

        let u = t - self.calibration;
        let glide = 0.5 - 0.5 * (TAU * u / 8.0).cos();
        let swell = 0.5 - 0.5 * (TAU * u / 5.0).cos();
        let pitch = (BOX_MIN + span * (0.3 + 0.7 * glide), BOX_MIN + span * 0.5);
        let volume = (BOX_MIN + span * 0.2, BOX_MIN + span * (0.9 - 0.8 * swell));
        (pitch, volume)
    }

    fn hand(&self, player_hand: Handedness, centre: (f64, f64)) -> HandDetection {
        let raw = if self.mirrored {
            player_hand.opposite()
        } else {
            player_hand
        };
        let points: Vec<(f32, f32)> = HAND_SHAPE
            .iter()
            .map(|&(dx, dy)| ((centre.0 + dx) as f32, (centre.1 + dy) as f32))
            .collect();
        HandDetection::from_points(raw, &points)
    }
}

impl DetectionSource for DemoPerformance {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError> {
        let timestamp = Duration::from_secs(self.frame_index) / DEMO_FPS;
        if timestamp > self.length {
            return Ok(None);
        }
        self.frame_index += 1;

        let (pitch, volume) = self.hand_centres(timestamp.as_secs_f64());
        let hands = [
            self.hand(Handedness::Right, pitch),
            self.hand(Handedness::Left, volume),
        ];
        Ok(Some(DetectionFrame::with_hands(timestamp, hands)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_tracking::{GestureMapper, MapperSettings, MapperUpdate};

    fn drive(config: &ThereminConfig, seconds: u64) -> (GestureMapper, Vec<MapperUpdate>) {
        let mut demo = DemoPerformance::new(config, Duration::from_secs(seconds));
        let mut mapper = GestureMapper::new(MapperSettings::from_config(config, demo.resolution()));
        let mut updates = Vec::new();
        while let Some(frame) = demo.next_frame().unwrap() {
            updates.push(mapper.process(&frame));
        }
        (mapper, updates)
    }

    #[test]
    fn frame_count_and_timestamps() {
        let config = ThereminConfig::default();
        let mut demo = DemoPerformance::new(&config, Duration::from_secs(2));
        let mut last = None;
        let mut count = 0;
        while let Some(frame) = demo.next_frame().unwrap() {
            assert_eq!(frame.hand_count(), 2);
            if let Some(prev) = last {
                assert!(frame.timestamp > prev);
            }
            last = Some(frame.timestamp);
            count += 1;
        }
        assert_eq!(count, 61);
        assert_eq!(last, Some(Duration::from_secs(2)));
    }

    #[test]
    fn calibrates_a_real_region() {
        let config = ThereminConfig::default();
        let (mapper, updates) = drive(&config, 8);
        let transitions = updates
            .iter()
            .filter(|u| matches!(u, MapperUpdate::Calibrated { .. }))
            .count();
        assert_eq!(transitions, 1);
        assert!(mapper.is_calibrated());
        let region = mapper.region();
        assert!(!region.is_degenerate());
        assert!(region.width() > 300);
        assert!(region.height() > 200);
    }

    #[test]
    fn performance_moves_both_controls() {
        let config = ThereminConfig::default();
        let (_, updates) = drive(&config, 15);
        let tracked: Vec<_> = updates
            .iter()
            .filter_map(|u| match u {
                MapperUpdate::Tracking { controls, fresh: true } => Some(*controls),
                _ => None,
            })
            .collect();
        assert!(!tracked.is_empty());

        let (min_p, max_p) = tracked
            .iter()
            .fold((1.0f64, 0.0f64), |(lo, hi), c| (lo.min(c.pitch), hi.max(c.pitch)));
        let (min_v, max_v) = tracked
            .iter()
            .fold((1.0f64, 0.0f64), |(lo, hi), c| (lo.min(c.volume), hi.max(c.volume)));
        assert!(max_p - min_p > 0.4);
        assert!(max_v - min_v > 0.4);
    }

    #[test]
    fn unmirrored_demo_maps_the_same() {
        let mirrored = ThereminConfig::default();
        let plain = ThereminConfig {
            mirrored_input: false,
            ..ThereminConfig::default()
        };
        let (a, _) = drive(&mirrored, 7);
        let (b, _) = drive(&plain, 7);
        assert_eq!(a.controls(), b.controls());
    }
}
