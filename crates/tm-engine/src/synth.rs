//! Control side of the synthesizer.

use alloc::sync::Arc;
use core::fmt::Write;
use tm_ir::{ConfigError, ControlValues, ThereminConfig, Waveform, DEFAULT_NOTE_NAMES};

use crate::note_table::NoteTable;
use crate::renderer::Renderer;
use crate::shared::{ControlSnapshot, SharedControls};

/// Volume before the first control update.
pub const INITIAL_VOLUME: f64 = 0.1;

/// Note name, or frequency formatted to two decimals.
pub type DisplayLabel = heapless::String<24>;

/// Owns the note table and pitch policy, and publishes frequency, volume
/// and waveform for the [`Renderer`].
///
/// Volume is stored inverted (`1 - volume`): a raised hand is quiet.
pub struct SynthesisEngine {
    table: NoteTable,
    a4_hz: f64,
    perfect_pitch: bool,
    waveform: Waveform,
    frequency: f64,
    volume: f64,
    /// Table index of the current frequency, when it came from the table
    selected_note: Option<usize>,
    /// Last pitch given to `set_control_values`, reused on range changes
    last_pitch: Option<f64>,
    sample_rate: u32,
    shared: Arc<SharedControls>,
}

impl SynthesisEngine {
    /// Create an engine from a configuration.
    pub fn new(config: &ThereminConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = NoteTable::build(
            config.a4_hz,
            config.min_octave,
            config.max_octave,
            &DEFAULT_NOTE_NAMES,
        )?;
        let frequency = table.min_frequency();
        let shared = Arc::new(SharedControls::new(ControlSnapshot {
            frequency,
            volume: INITIAL_VOLUME,
            waveform: config.waveform,
        }));

        Ok(Self {
            table,
            a4_hz: config.a4_hz,
            perfect_pitch: config.perfect_pitch,
            waveform: config.waveform,
            frequency,
            volume: INITIAL_VOLUME,
            selected_note: Some(0),
            last_pitch: None,
            sample_rate: config.sample_rate,
            shared,
        })
    }

    /// A renderer reading this engine's controls at the configured sample rate.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.shared.clone(), self.sample_rate)
    }

    /// A renderer at a sample rate chosen by the audio device.
    pub fn renderer_at(&self, sample_rate: u32) -> Renderer {
        Renderer::new(self.shared.clone(), sample_rate)
    }

    pub fn shared(&self) -> &Arc<SharedControls> {
        &self.shared
    }

    // --- Waveform ---

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        self.shared.set_waveform(waveform);
    }

    /// Select a waveform by name. Unknown names select Sine.
    pub fn set_waveform_by_name(&mut self, name: &str) -> Waveform {
        let waveform = Waveform::from_name(name);
        self.set_waveform(waveform);
        waveform
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    // --- Gesture controls ---

    /// Apply normalized pitch and volume from the gesture mapper.
    ///
    /// Inputs are clamped to [0, 1]. With perfect pitch the frequency snaps
    /// to `table[floor(pitch * N) - 1]`; otherwise it is
    /// `pitch * max_frequency`.
    pub fn set_control_values(&mut self, pitch: f64, volume: f64) {
        let controls = ControlValues::new(pitch, volume);
        self.last_pitch = Some(controls.pitch);
        self.volume = 1.0 - controls.volume;
        self.apply_pitch(controls.pitch);
        self.shared.set_volume(self.volume);
    }

    /// Current volume and display label.
    pub fn control_values(&self) -> (f64, DisplayLabel) {
        (self.volume, self.label())
    }

    fn apply_pitch(&mut self, pitch: f64) {
        if self.perfect_pitch && !self.table.is_empty() {
            let index = self.table.quantize(pitch);
            self.selected_note = Some(index);
            self.frequency = self.table.notes()[index].frequency;
        } else {
            self.selected_note = None;
            self.frequency = pitch * self.table.max_frequency();
        }
        self.shared.set_frequency(self.frequency);
    }

    fn label(&self) -> DisplayLabel {
        let mut label = DisplayLabel::new();
        let note = self
            .selected_note
            .filter(|_| self.perfect_pitch)
            .and_then(|i| self.table.get(i));
        match note {
            Some(note) => {
                let _ = label.push_str(note.name.as_str());
            }
            None => {
                let _ = write!(label, "{:.2}", self.frequency);
            }
        }
        label
    }

    // --- Settings ---

    pub fn perfect_pitch(&self) -> bool {
        self.perfect_pitch
    }

    /// Switch pitch policy. Takes effect on the next control update.
    pub fn set_perfect_pitch(&mut self, enabled: bool) {
        self.perfect_pitch = enabled;
    }

    pub fn toggle_perfect_pitch(&mut self) -> bool {
        self.perfect_pitch = !self.perfect_pitch;
        self.perfect_pitch
    }

    /// Rebuild the note table for a new octave range.
    ///
    /// On error the previous table stays in place. On success the current
    /// frequency is re-derived from the last pitch, if any.
    pub fn set_octave_range(&mut self, min_octave: i32, max_octave: i32) -> Result<(), ConfigError> {
        let table = NoteTable::build(self.a4_hz, min_octave, max_octave, &DEFAULT_NOTE_NAMES)?;
        self.table = table;
        match self.last_pitch {
            Some(pitch) => self.apply_pitch(pitch),
            None => {
                self.selected_note = Some(0);
                self.frequency = self.table.min_frequency();
                self.shared.set_frequency(self.frequency);
            }
        }
        Ok(())
    }

    /// Jump straight to a named table note. Returns `false` for unknown names.
    pub fn set_note(&mut self, name: &str) -> bool {
        match self.table.index_of(name) {
            Some(index) => {
                self.selected_note = Some(index);
                self.frequency = self.table.notes()[index].frequency;
                self.shared.set_frequency(self.frequency);
                true
            }
            None => false,
        }
    }

    pub fn table(&self) -> &NoteTable {
        &self.table
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Stored (inverted) volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: i32, max: i32) -> ThereminConfig {
        ThereminConfig {
            min_octave: min,
            max_octave: max,
            ..Default::default()
        }
    }

    fn engine() -> SynthesisEngine {
        SynthesisEngine::new(&config(0, 8)).unwrap()
    }

    #[test]
    fn initial_state_uses_lowest_note() {
        let e = SynthesisEngine::new(&config(3, 5)).unwrap();
        let (volume, label) = e.control_values();
        assert_eq!(volume, INITIAL_VOLUME);
        assert_eq!(label.as_str(), "C3");
    }

    #[test]
    fn rejects_invalid_range() {
        assert!(matches!(
            SynthesisEngine::new(&config(5, 3)),
            Err(ConfigError::InvalidOctaveRange { min: 5, max: 3 })
        ));
    }

    #[test]
    fn volume_is_inverted() {
        let mut e = engine();
        e.set_control_values(0.5, 0.25);
        assert_eq!(e.volume(), 0.75);
        assert_eq!(e.shared().snapshot().volume, 0.75);
    }

    #[test]
    fn quantized_top_is_last_note() {
        let mut e = engine();
        e.set_control_values(1.0, 0.0);
        assert_eq!(e.frequency(), e.table().max_frequency());
        assert_eq!(e.control_values().1.as_str(), "B7");
    }

    #[test]
    fn quantized_bottom_clamps_to_first_note() {
        let mut e = engine();
        e.set_control_values(0.0, 0.0);
        assert_eq!(e.frequency(), e.table().min_frequency());
        assert_eq!(e.control_values().1.as_str(), "C0");
    }

    #[test]
    fn quantized_never_interpolates() {
        let mut e = engine();
        for i in 0..=100 {
            e.set_control_values(i as f64 / 100.0, 0.5);
            let f = e.frequency();
            assert!(e.table().notes().iter().any(|n| n.frequency == f));
        }
    }

    #[test]
    fn continuous_is_linear_in_pitch() {
        let mut e = engine();
        e.set_perfect_pitch(false);
        e.set_control_values(0.5, 0.0);
        let expected = 0.5 * e.table().max_frequency();
        assert_eq!(e.frequency(), expected);
        let (_, label) = e.control_values();
        let mut want = DisplayLabel::new();
        write!(want, "{:.2}", expected).unwrap();
        assert_eq!(label, want);
    }

    #[test]
    fn continuous_zero_pitch_is_zero_hz() {
        let mut e = engine();
        e.set_perfect_pitch(false);
        e.set_control_values(0.0, 1.0);
        assert_eq!(e.frequency(), 0.0);
        let (volume, label) = e.control_values();
        assert_eq!(volume, 0.0);
        assert_eq!(label.as_str(), "0.00");
    }

    #[test]
    fn inputs_are_clamped() {
        let mut e = engine();
        e.set_control_values(3.0, -2.0);
        assert_eq!(e.frequency(), e.table().max_frequency());
        assert_eq!(e.volume(), 1.0);
    }

    #[test]
    fn repeated_updates_are_idempotent() {
        let mut e = engine();
        e.set_control_values(0.42, 0.3);
        let first = (e.frequency(), e.volume(), e.shared().snapshot());
        e.set_control_values(0.42, 0.3);
        assert_eq!(first, (e.frequency(), e.volume(), e.shared().snapshot()));
    }

    #[test]
    fn toggle_switches_label_format() {
        let mut e = engine();
        e.set_control_values(1.0, 0.0);
        assert!(!e.toggle_perfect_pitch());
        // Label falls back to the frequency once perfect pitch is off
        assert!(e.control_values().1.as_str().contains('.'));
        assert!(e.toggle_perfect_pitch());
        assert_eq!(e.control_values().1.as_str(), "B7");
    }

    #[test]
    fn unknown_waveform_name_selects_sine() {
        let mut e = engine();
        e.set_waveform(Waveform::Square);
        assert_eq!(e.set_waveform_by_name("wobble"), Waveform::Sine);
        assert_eq!(e.shared().snapshot().waveform, Waveform::Sine);
        assert_eq!(e.set_waveform_by_name("Triangle"), Waveform::Triangle);
    }

    #[test]
    fn range_change_rederives_frequency() {
        let mut e = SynthesisEngine::new(&config(3, 5)).unwrap();
        e.set_control_values(1.0, 0.0);
        assert_eq!(e.control_values().1.as_str(), "B4");
        e.set_octave_range(2, 6).unwrap();
        assert_eq!(e.control_values().1.as_str(), "B5");
        assert_eq!(e.shared().snapshot().frequency, e.frequency());
    }

    #[test]
    fn rejected_range_keeps_old_table() {
        let mut e = SynthesisEngine::new(&config(3, 5)).unwrap();
        let before = e.table().clone();
        assert!(e.set_octave_range(6, 6).is_err());
        assert_eq!(e.table(), &before);
    }

    #[test]
    fn set_note_by_name() {
        let mut e = engine();
        assert!(e.set_note("A4"));
        assert!((e.frequency() - 440.0).abs() < 1e-9);
        assert_eq!(e.control_values().1.as_str(), "A4");
        assert!(!e.set_note("H4"));
        assert!((e.frequency() - 440.0).abs() < 1e-9);
    }
}
