//! Output that plays nothing, for offline rendering and tests.

use crate::traits::{AudioError, AudioOutput};

/// An [`AudioOutput`] with no device behind it.
///
/// Tracks playback state and counts real start/stop transitions.
#[derive(Debug, Clone, Default)]
pub struct NullOutput {
    sample_rate: u32,
    running: bool,
    starts: usize,
    stops: usize,
}

impl NullOutput {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Number of times playback went from stopped to running.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of times playback went from running to stopped.
    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl AudioOutput for NullOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&mut self) -> Result<(), AudioError> {
        if !self.running {
            self.running = true;
            self.starts += 1;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
