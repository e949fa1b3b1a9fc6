//! Normalized gesture controls.

/// Pitch and volume in [0, 1], as produced by the gesture mapper.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlValues {
    pub pitch: f64,
    pub volume: f64,
}

impl ControlValues {
    /// Construct with both values clamped to [0, 1]. NaN maps to 0.
    pub fn new(pitch: f64, volume: f64) -> Self {
        Self {
            pitch: clamp_unit(pitch),
            volume: clamp_unit(volume),
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
