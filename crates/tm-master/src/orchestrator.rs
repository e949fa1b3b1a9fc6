//! Frame loop: detections in, control values and playback state out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tm_audio::{AudioError, AudioOutput};
use tm_engine::SynthesisEngine;
use tm_ir::{ConfigError, DetectionFrame, Resolution, ThereminConfig};
use tm_tracking::{GestureMapper, MapperSettings, MapperUpdate};

use crate::display::{DisplayFrame, LatestCell};
use crate::source::{DetectionSource, SourceError};
use crate::synthesizer::Synthesizer;

/// Error type for the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// Invalid configuration
    Config(ConfigError),
    /// The detection source failed
    Source(SourceError),
    /// The audio output failed
    Audio(AudioError),
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::Config(e) => write!(f, "Configuration error: {}", e),
            OrchestratorError::Source(e) => write!(f, "{}", e),
            OrchestratorError::Audio(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl From<ConfigError> for OrchestratorError {
    fn from(e: ConfigError) -> Self {
        OrchestratorError::Config(e)
    }
}

impl From<SourceError> for OrchestratorError {
    fn from(e: SourceError) -> Self {
        OrchestratorError::Source(e)
    }
}

impl From<AudioError> for OrchestratorError {
    fn from(e: AudioError) -> Self {
        OrchestratorError::Audio(e)
    }
}

/// Why [`Orchestrator::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    Cancelled,
    SourceEnded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames processed during this run
    pub frames: u64,
    /// Whether calibration had completed when the run returned
    pub calibrated: bool,
    pub exit: RunExit,
}

/// Feeds detection frames through the [`GestureMapper`] into a
/// [`Synthesizer`].
///
/// Audio starts on the calibration transition. Stopping it is explicit
/// ([`Orchestrator::stop`]); cancelling a run leaves it playing.
pub struct Orchestrator<O> {
    mapper: GestureMapper,
    synth: Synthesizer<O>,
    display: Arc<LatestCell<DisplayFrame>>,
    frames: u64,
}

impl<O: AudioOutput> Orchestrator<O> {
    /// Build an engine from `config` and play it through `output`.
    pub fn new(
        config: &ThereminConfig,
        resolution: Resolution,
        output: O,
    ) -> Result<Self, OrchestratorError> {
        let engine = SynthesisEngine::new(config)?;
        Ok(Self::with_synthesizer(
            config,
            resolution,
            Synthesizer::new(engine, output),
        ))
    }

    /// Use an already built synthesizer, e.g. one playing on a device.
    pub fn with_synthesizer(
        config: &ThereminConfig,
        resolution: Resolution,
        synth: Synthesizer<O>,
    ) -> Self {
        let mapper = GestureMapper::new(MapperSettings::from_config(config, resolution));
        Self::from_parts(mapper, synth)
    }

    pub fn from_parts(mapper: GestureMapper, synth: Synthesizer<O>) -> Self {
        Self {
            mapper,
            synth,
            display: Arc::new(LatestCell::new()),
            frames: 0,
        }
    }

    /// Process one frame.
    ///
    /// On the calibration transition the synthesizer is started; while
    /// calibrated, fresh control values are passed to the engine. A
    /// [`DisplayFrame`] is published either way.
    pub fn process_frame(&mut self, frame: &DetectionFrame) -> Result<MapperUpdate, OrchestratorError> {
        let update = self.mapper.process(frame);
        match update {
            MapperUpdate::Calibrated { region } => {
                log::info!(
                    "calibration complete at {:.2}s: ({}, {})-({}, {})",
                    frame.timestamp.as_secs_f64(),
                    region.top_left.x,
                    region.top_left.y,
                    region.bottom_right.x,
                    region.bottom_right.y
                );
                self.synth.start()?;
            }
            MapperUpdate::Tracking {
                controls,
                fresh: true,
            } => {
                self.synth.set_control_values(controls.pitch, controls.volume);
            }
            MapperUpdate::Tracking { fresh: false, .. } => {
                log::debug!("holding controls, {} hand(s) in frame", frame.hand_count());
            }
            MapperUpdate::Calibrating { .. } => {}
        }
        self.frames += 1;
        self.publish_display();
        Ok(update)
    }

    /// Pull frames from `source` until it ends or `cancel` is set.
    ///
    /// `cancel` is checked once before each frame.
    pub fn run<S: DetectionSource + ?Sized>(
        &mut self,
        source: &mut S,
        cancel: &AtomicBool,
    ) -> Result<RunSummary, OrchestratorError> {
        let mut frames = 0;
        let exit = loop {
            if cancel.load(Ordering::Relaxed) {
                break RunExit::Cancelled;
            }
            let Some(frame) = source.next_frame()? else {
                break RunExit::SourceEnded;
            };
            self.process_frame(&frame)?;
            frames += 1;
        };

        let summary = RunSummary {
            frames,
            calibrated: self.mapper.is_calibrated(),
            exit,
        };
        log::info!("run finished: {:?}", summary);
        Ok(summary)
    }

    fn publish_display(&self) {
        let (volume, label) = self.synth.control_values();
        self.display.publish(DisplayFrame {
            calibrated: self.mapper.is_calibrated(),
            region: self.mapper.region(),
            volume,
            label,
        });
    }

    /// Stop audio output.
    pub fn stop(&mut self) -> Result<(), OrchestratorError> {
        Ok(self.synth.stop()?)
    }

    /// Shared handle to the latest display state.
    pub fn display(&self) -> Arc<LatestCell<DisplayFrame>> {
        self.display.clone()
    }

    pub fn mapper(&self) -> &GestureMapper {
        &self.mapper
    }

    pub fn synthesizer(&self) -> &Synthesizer<O> {
        &self.synth
    }

    pub fn synthesizer_mut(&mut self) -> &mut Synthesizer<O> {
        &mut self.synth
    }

    /// Frames processed since creation.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}
