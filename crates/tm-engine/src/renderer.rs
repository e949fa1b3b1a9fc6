//! Audio side of the synthesizer.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::oscillator::waveform_sample;
use crate::shared::{ControlSnapshot, SharedControls};

/// Renders mono sample blocks from the published controls.
///
/// Owned by the audio callback. Phase is carried across blocks, so
/// consecutive blocks form one continuous waveform, including across
/// frequency changes. Rendering never blocks or allocates.
pub struct Renderer {
    shared: Arc<SharedControls>,
    sample_rate: u32,
    /// Oscillator phase in cycles, [0, 1)
    phase: f64,
    /// Samples rendered since creation
    running_sample_index: u64,
}

impl Renderer {
    pub fn new(shared: Arc<SharedControls>, sample_rate: u32) -> Self {
        Self {
            shared,
            sample_rate,
            phase: 0.0,
            running_sample_index: 0,
        }
    }

    /// Fill `out` with the next `out.len()` samples.
    ///
    /// Reads the control snapshot once per block. A snapshot that cannot
    /// produce a valid signal (non-finite or negative frequency, non-finite
    /// volume, zero sample rate) yields a silent block; the sample index
    /// still advances.
    pub fn render_block(&mut self, out: &mut [f32]) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.render_into(out));
        #[cfg(not(feature = "alloc_check"))]
        self.render_into(out);
    }

    fn render_into(&mut self, out: &mut [f32]) {
        let snap = self.shared.snapshot();
        self.running_sample_index += out.len() as u64;

        if !self.is_renderable(&snap) {
            out.fill(0.0);
            return;
        }

        let step = snap.frequency / self.sample_rate as f64;
        let mut phase = self.phase;
        for sample in out.iter_mut() {
            let v = waveform_sample(snap.waveform, phase, snap.volume) as f32;
            *sample = if v.is_finite() { v } else { 0.0 };
            phase += step;
            phase -= libm::floor(phase);
        }
        self.phase = phase;
    }

    /// Render `frame_count` samples into a new buffer (offline use).
    pub fn render_frames(&mut self, frame_count: usize) -> Vec<f32> {
        let mut out = vec![0.0; frame_count];
        self.render_block(&mut out);
        out
    }

    fn is_renderable(&self, snap: &ControlSnapshot) -> bool {
        self.sample_rate > 0
            && snap.frequency.is_finite()
            && snap.frequency >= 0.0
            && snap.volume.is_finite()
    }

    pub fn running_sample_index(&self) -> u64 {
        self.running_sample_index
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current oscillator phase in cycles.
    pub fn phase(&self) -> f64 {
        self.phase
    }
}
