//! Synthesis engine for theremulator.
//!
//! Splits into a control side ([`SynthesisEngine`]), driven from the
//! gesture domain at frame rate, and an audio side ([`Renderer`]), driven
//! from the audio callback. The two share a lock-free [`SharedControls`]
//! snapshot.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod note_table;
mod oscillator;
mod renderer;
mod shared;
mod synth;

pub use note_table::{Note, NoteName, NoteTable};
pub use oscillator::waveform_sample;
pub use renderer::Renderer;
pub use shared::{ControlSnapshot, SharedControls};
pub use synth::{DisplayLabel, SynthesisEngine, INITIAL_VOLUME};

/// Largest block rendered in one pass by audio backends.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
