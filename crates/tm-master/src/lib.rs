//! Headless controller for theremulator.
//!
//! Wires detection sources, the gesture mapper and the synthesizer
//! together, for both live playback and offline rendering.

mod demo;
mod display;
mod offline;
mod orchestrator;
mod source;
mod synthesizer;
mod wav;

// Re-export common types so callers don't need the lower crates directly.
pub use tm_audio::{AudioError, AudioOutput, CpalOutput, NullOutput};
pub use tm_engine::SynthesisEngine;
pub use tm_formats::FormatError;
pub use tm_ir::{ConfigError, DetectionFrame, Resolution, ThereminConfig, Waveform};
pub use tm_tracking::MapperUpdate;

pub use demo::DemoPerformance;
pub use display::{DisplayFrame, LatestCell};
pub use offline::{render_offline, OfflineRender, DEFAULT_MAX_SECONDS};
pub use orchestrator::{Orchestrator, OrchestratorError, RunExit, RunSummary};
pub use source::{
    DetectionSource, PacedSource, ScriptedSource, SourceError, ThreadedSource, TraceSource,
};
pub use synthesizer::Synthesizer;
pub use wav::{samples_to_wav, write_wav};
