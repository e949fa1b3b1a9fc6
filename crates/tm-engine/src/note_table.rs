//! Equal-tempered note table.
//!
//! Frequencies are derived from the semitone distance to A4:
//! `freq = a4 * 2^(i / 12)`. Octave numbers follow scientific pitch
//! notation, with A4 in octave 4.

use alloc::vec::Vec;
use arrayvec::ArrayString;
use tm_ir::{check_octaves, ConfigError};

/// Storage for a display name such as `"G#/Ab4"`.
pub type NoteName = ArrayString<16>;

/// Longest note name accepted, leaving room for the octave suffix.
const MAX_BASE_NAME: usize = 12;

/// One entry of the table.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub name: NoteName,
    pub frequency: f64,
}

/// Ordered notes spanning `[min_octave, max_octave)`, strictly increasing
/// in frequency. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteTable {
    notes: Vec<Note>,
    min_octave: i32,
    max_octave: i32,
}

impl NoteTable {
    /// Build the table for the given octave range.
    ///
    /// `note_names` must list the chromatic scale starting from C and
    /// contain an `"A"` entry, which anchors `a4_hz`.
    pub fn build(
        a4_hz: f64,
        min_octave: i32,
        max_octave: i32,
        note_names: &[&str; 12],
    ) -> Result<Self, ConfigError> {
        check_octaves(min_octave, max_octave)?;
        if !a4_hz.is_finite() || a4_hz <= 0.0 {
            return Err(ConfigError::InvalidReferenceFrequency);
        }
        if let Some(idx) = note_names.iter().position(|n| n.len() > MAX_BASE_NAME) {
            return Err(ConfigError::NoteNameTooLong(idx));
        }
        let a_index = note_names
            .iter()
            .position(|n| *n == "A")
            .ok_or(ConfigError::MissingReferenceNote)? as i32;

        // Semitone distance from A4 to C<min> and to C<max>
        let lowest = 12 * (min_octave - 4) - a_index;
        let highest = 12 * (max_octave - 4) - a_index;

        let mut notes = Vec::with_capacity((highest - lowest) as usize);
        for i in lowest..highest {
            let chromatic = i + a_index;
            let base = note_names[chromatic.rem_euclid(12) as usize];
            let octave = 4 + chromatic.div_euclid(12);

            let mut name = NoteName::new();
            name.push_str(base);
            push_int(&mut name, octave);

            notes.push(Note {
                name,
                frequency: a4_hz * libm::pow(2.0, i as f64 / 12.0),
            });
        }

        Ok(Self {
            notes,
            min_octave,
            max_octave,
        })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Frequency of the note with the given display name.
    pub fn frequency_of(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.notes[i].frequency)
    }

    /// Index of the note with the given display name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.name.as_str() == name)
    }

    /// Highest frequency in the table (0.0 for an empty table).
    pub fn max_frequency(&self) -> f64 {
        self.notes.last().map_or(0.0, |n| n.frequency)
    }

    /// Lowest frequency in the table (0.0 for an empty table).
    pub fn min_frequency(&self) -> f64 {
        self.notes.first().map_or(0.0, |n| n.frequency)
    }

    /// Table index selected by a normalized pitch.
    ///
    /// `floor(pitch * N) - 1`, clamped to `[0, N - 1]`: pitch 1.0 gives the
    /// last note and pitch 0.0 the first.
    pub fn quantize(&self, pitch: f64) -> usize {
        let n = self.notes.len() as i64;
        if n == 0 {
            return 0;
        }
        let raw = libm::floor(pitch * n as f64) as i64 - 1;
        raw.clamp(0, n - 1) as usize
    }

    pub fn octave_range(&self) -> (i32, i32) {
        (self.min_octave, self.max_octave)
    }
}

/// Append a small signed integer without going through `alloc::format!`.
fn push_int(name: &mut NoteName, value: i32) {
    if value < 0 {
        name.push('-');
    }
    let v = value.unsigned_abs();
    if v >= 10 {
        name.push(char::from(b'0' + (v / 10 % 10) as u8));
    }
    name.push(char::from(b'0' + (v % 10) as u8));
}
