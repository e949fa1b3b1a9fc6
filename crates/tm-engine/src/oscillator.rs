//! Waveform math.
//!
//! Every waveform is a function of phase in cycles, `[0, 1)`, and is zero
//! at phase 0. Amplitudes scale with `volume`:
//!
//! | Waveform | Formula | Peak |
//! |---|---|---|
//! | Sine | `sin(2πp)` | `vol` |
//! | Square | `sign(sin(2πp)) * 0.5` | `vol / 2` |
//! | Triangle | `(2/π) * asin(sin(2πp))` | `vol` |
//! | Sawtooth | `2 * frac(p + 0.5) - 1` | `vol` |

use core::f64::consts::{FRAC_2_PI, TAU};
use tm_ir::Waveform;

/// One sample of `waveform` at `phase` cycles, scaled by `volume`.
#[inline]
pub fn waveform_sample(waveform: Waveform, phase: f64, volume: f64) -> f64 {
    let s = libm::sin(TAU * phase);
    let unit = match waveform {
        Waveform::Sine => s,
        Waveform::Square => signum(s) * 0.5,
        Waveform::Triangle => FRAC_2_PI * libm::asin(s.clamp(-1.0, 1.0)),
        Waveform::Sawtooth => {
            let shifted = phase + 0.5;
            2.0 * (shifted - libm::floor(shifted)) - 1.0
        }
    };
    unit * volume
}

/// Sign with `signum(0) == 0`, unlike `f64::signum`.
#[inline]
fn signum(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn all_waveforms_start_at_zero() {
        for w in Waveform::ALL {
            assert!(waveform_sample(w, 0.0, 1.0).abs() < EPS, "{w} not zero at phase 0");
        }
    }

    #[test]
    fn sine_quarter_cycle_peaks() {
        assert!((waveform_sample(Waveform::Sine, 0.25, 0.8) - 0.8).abs() < EPS);
        assert!((waveform_sample(Waveform::Sine, 0.75, 0.8) + 0.8).abs() < EPS);
    }

    #[test]
    fn square_is_half_amplitude() {
        assert_eq!(waveform_sample(Waveform::Square, 0.1, 1.0), 0.5);
        assert_eq!(waveform_sample(Waveform::Square, 0.6, 1.0), -0.5);
    }

    #[test]
    fn triangle_is_linear_between_peaks() {
        assert!((waveform_sample(Waveform::Triangle, 0.25, 1.0) - 1.0).abs() < 1e-9);
        assert!((waveform_sample(Waveform::Triangle, 0.125, 1.0) - 0.5).abs() < 1e-9);
        assert!((waveform_sample(Waveform::Triangle, 0.75, 1.0) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn sawtooth_ramps_across_full_range() {
        assert!((waveform_sample(Waveform::Sawtooth, 0.25, 1.0) - 0.5).abs() < EPS);
        assert!((waveform_sample(Waveform::Sawtooth, 0.49, 1.0) - 0.98).abs() < 1e-9);
        assert!((waveform_sample(Waveform::Sawtooth, 0.5, 1.0) + 1.0).abs() < EPS);
        assert!((waveform_sample(Waveform::Sawtooth, 0.75, 1.0) + 0.5).abs() < EPS);
    }

    #[test]
    fn amplitude_bounded_by_volume() {
        for w in Waveform::ALL {
            for i in 0..1000 {
                let v = waveform_sample(w, i as f64 / 1000.0, 0.3);
                assert!(v.abs() <= 0.3 + 1e-12, "{w} exceeded volume: {v}");
            }
        }
    }
}
