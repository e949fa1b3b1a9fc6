//! Synthesis engine paired with an audio output.

use tm_audio::{AudioError, AudioOutput, CpalOutput};
use tm_engine::{DisplayLabel, SynthesisEngine};
use tm_ir::ThereminConfig;

use crate::orchestrator::OrchestratorError;

/// A [`SynthesisEngine`] and the output its renderer plays through.
///
/// `start` and `stop` control the output stream and are idempotent.
pub struct Synthesizer<O> {
    engine: SynthesisEngine,
    output: O,
}

impl<O: AudioOutput> Synthesizer<O> {
    pub fn new(engine: SynthesisEngine, output: O) -> Self {
        Self { engine, output }
    }

    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.output.is_running() {
            return Ok(());
        }
        self.output.start()?;
        log::info!("audio started at {} Hz", self.output.sample_rate());
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), AudioError> {
        if !self.output.is_running() {
            return Ok(());
        }
        self.output.stop()?;
        log::info!("audio stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.output.is_running()
    }

    pub fn set_control_values(&mut self, pitch: f64, volume: f64) {
        self.engine.set_control_values(pitch, volume);
    }

    pub fn control_values(&self) -> (f64, DisplayLabel) {
        self.engine.control_values()
    }

    pub fn engine(&self) -> &SynthesisEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SynthesisEngine {
        &mut self.engine
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl Synthesizer<CpalOutput> {
    /// Engine from `config`, playing on the default output device.
    pub fn with_default_device(config: &ThereminConfig) -> Result<Self, OrchestratorError> {
        let engine = SynthesisEngine::new(config)?;
        let output = CpalOutput::new(engine.shared().clone(), config.sample_rate)?;
        Ok(Self::new(engine, output))
    }
}

impl<O> Synthesizer<O> {
    pub fn into_parts(self) -> (SynthesisEngine, O) {
        (self.engine, self.output)
    }
}
