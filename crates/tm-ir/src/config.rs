//! Configuration surface shared by the engine, the mapper and the CLI.

use crate::waveform::Waveform;

/// Lowest octave accepted for the note table.
pub const MIN_OCTAVE: i32 = 0;

/// Highest octave bound accepted for the note table (exclusive upper end).
pub const MAX_OCTAVE: i32 = 10;

/// Chromatic note names starting from C, sharps and flats combined.
pub const DEFAULT_NOTE_NAMES: [&str; 12] = [
    "C", "C#/Db", "D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab", "A", "A#/Bb", "B",
];

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `max_octave` must be strictly greater than `min_octave`
    InvalidOctaveRange { min: i32, max: i32 },
    /// Octave outside [`MIN_OCTAVE`, `MAX_OCTAVE`]
    OctaveOutOfRange(i32),
    /// The note-name list has no `A` to anchor A4
    MissingReferenceNote,
    /// A note name is too long to be stored
    NoteNameTooLong(usize),
    /// A4 reference frequency must be finite and positive
    InvalidReferenceFrequency,
    /// Sample rate must be non-zero
    InvalidSampleRate,
    /// Calibration window must be finite and non-negative
    InvalidCalibrationTime,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidOctaveRange { min, max } => {
                write!(f, "Invalid octave range: max {} must exceed min {}", max, min)
            }
            ConfigError::OctaveOutOfRange(oct) => write!(
                f,
                "Octave {} outside supported range {}..={}",
                oct, MIN_OCTAVE, MAX_OCTAVE
            ),
            ConfigError::MissingReferenceNote => write!(f, "Note names do not contain 'A'"),
            ConfigError::NoteNameTooLong(idx) => write!(f, "Note name {} is too long", idx),
            ConfigError::InvalidReferenceFrequency => {
                write!(f, "A4 frequency must be finite and positive")
            }
            ConfigError::InvalidSampleRate => write!(f, "Sample rate must be non-zero"),
            ConfigError::InvalidCalibrationTime => {
                write!(f, "Calibration time must be finite and non-negative")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Check an octave range the way the note table needs it.
pub fn check_octaves(min: i32, max: i32) -> Result<(), ConfigError> {
    for oct in [min, max] {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&oct) {
            return Err(ConfigError::OctaveOutOfRange(oct));
        }
    }
    if max <= min {
        return Err(ConfigError::InvalidOctaveRange { min, max });
    }
    Ok(())
}

/// Full theremin configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ThereminConfig {
    /// First octave in the note table
    pub min_octave: i32,
    /// Octave bound (exclusive) of the note table
    pub max_octave: i32,
    /// Reference pitch for A4 in Hz
    pub a4_hz: f64,
    pub waveform: Waveform,
    /// Snap pitch to table notes instead of a continuous glide
    pub perfect_pitch: bool,
    /// Length of the calibration window
    pub calibration_seconds: f64,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Input frames are horizontally flipped before detection
    pub mirrored_input: bool,
}

impl Default for ThereminConfig {
    fn default() -> Self {
        Self {
            min_octave: 3,
            max_octave: 5,
            a4_hz: 440.0,
            waveform: Waveform::Sine,
            perfect_pitch: true,
            calibration_seconds: 5.0,
            sample_rate: 44_100,
            mirrored_input: true,
        }
    }
}

impl ThereminConfig {
    /// Validate every field, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_octaves(self.min_octave, self.max_octave)?;
        if !self.a4_hz.is_finite() || self.a4_hz <= 0.0 {
            return Err(ConfigError::InvalidReferenceFrequency);
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if !self.calibration_seconds.is_finite() || self.calibration_seconds < 0.0 {
            return Err(ConfigError::InvalidCalibrationTime);
        }
        Ok(())
    }

    /// The calibration window as a `Duration`, assuming a validated config.
    pub fn calibration_window(&self) -> core::time::Duration {
        core::time::Duration::from_secs_f64(self.calibration_seconds.max(0.0))
    }
}
