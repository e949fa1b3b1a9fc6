//! Offline rendering: drive the orchestrator from a source and render the
//! resulting audio on the same thread.

use tm_audio::NullOutput;
use tm_engine::MAX_BLOCK_SIZE;
use tm_ir::{Resolution, ThereminConfig};

use crate::orchestrator::{Orchestrator, OrchestratorError};
use crate::source::DetectionSource;
use crate::wav::samples_to_wav;

/// Render length cap used when the caller has no better bound.
pub const DEFAULT_MAX_SECONDS: f64 = 600.0;

/// Rendered mono audio plus what the run did.
#[derive(Clone, Debug)]
pub struct OfflineRender {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Frames processed
    pub frames: u64,
    /// Whether calibration completed
    pub calibrated: bool,
    /// Whether the source ran past the length cap and was cut off
    pub truncated: bool,
}

impl OfflineRender {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn to_wav(&self) -> Vec<u8> {
        samples_to_wav(&self.samples, self.sample_rate)
    }
}

/// Render the performance in `source`.
///
/// Before each frame is processed, audio is rendered up to that frame's
/// timestamp: silence until the output has started, then the synthesizer's
/// signal in blocks of at most [`MAX_BLOCK_SIZE`].
///
/// Output never exceeds `max_seconds`. The first frame stamped past the cap
/// ends the render and is not processed.
pub fn render_offline<S: DetectionSource + ?Sized>(
    config: &ThereminConfig,
    resolution: Resolution,
    source: &mut S,
    max_seconds: f64,
) -> Result<OfflineRender, OrchestratorError> {
    let sample_rate = config.sample_rate;
    let mut orch = Orchestrator::new(config, resolution, NullOutput::new(sample_rate))?;
    let mut renderer = orch.synthesizer().engine().renderer();
    let mut samples = Vec::new();
    let max_samples = (max_seconds.max(0.0) * sample_rate as f64) as usize;
    let mut truncated = false;

    while let Some(frame) = source.next_frame()? {
        let wanted = (frame.timestamp.as_secs_f64() * sample_rate as f64) as usize;
        let target = wanted.min(max_samples);
        let start = samples.len();
        if target > start {
            samples.resize(target, 0.0);
            if orch.synthesizer().is_running() {
                for block in samples[start..].chunks_mut(MAX_BLOCK_SIZE) {
                    renderer.render_block(block);
                }
            }
        }
        if wanted > max_samples {
            log::warn!(
                "frame at {:.3}s is past the {}s render limit, stopping",
                frame.timestamp.as_secs_f64(),
                max_seconds
            );
            truncated = true;
            break;
        }
        orch.process_frame(&frame)?;
    }

    log::info!(
        "rendered {} samples from {} frames",
        samples.len(),
        orch.frames_processed()
    );
    Ok(OfflineRender {
        samples,
        sample_rate,
        frames: orch.frames_processed(),
        calibrated: orch.mapper().is_calibrated(),
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoPerformance;
    use crate::source::ScriptedSource;
    use std::time::Duration;
    use tm_ir::DetectionFrame;

    #[test]
    fn silent_until_calibrated() {
        let config = ThereminConfig::default();
        let mut demo = DemoPerformance::new(&config, Duration::from_secs(8));
        let res = demo.resolution();
        let out = render_offline(&config, res, &mut demo, DEFAULT_MAX_SECONDS).unwrap();

        assert!(out.calibrated);
        assert_eq!(out.frames, 241);
        assert_eq!(out.samples.len(), 8 * 44_100);

        let calib_end = 5 * 44_100;
        assert!(out.samples[..calib_end].iter().all(|&s| s == 0.0));
        assert!(out.samples[calib_end..].iter().any(|&s| s != 0.0));
        assert!(out.samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn never_calibrated_is_all_silence() {
        let config = ThereminConfig::default();
        let frames = (0..60).map(|i| DetectionFrame::empty(Duration::from_millis(i * 50)));
        let mut src = ScriptedSource::new(Resolution::default(), frames);
        let out = render_offline(&config, Resolution::default(), &mut src, DEFAULT_MAX_SECONDS).unwrap();

        assert!(!out.calibrated);
        assert!(!out.truncated);
        assert!(out.samples.iter().all(|&s| s == 0.0));
        assert!((out.duration_secs() - 2.95).abs() < 1e-3);
    }

    #[test]
    fn wav_export_has_one_sample_per_frame() {
        let config = ThereminConfig {
            sample_rate: 8_000,
            ..ThereminConfig::default()
        };
        let mut demo = DemoPerformance::new(&config, Duration::from_secs(6));
        let res = demo.resolution();
        let out = render_offline(&config, res, &mut demo, DEFAULT_MAX_SECONDS).unwrap();
        let wav = out.to_wav();
        assert_eq!(wav.len(), 44 + out.samples.len() * 2);
    }

    #[test]
    fn far_future_frame_is_capped() {
        let config = ThereminConfig {
            sample_rate: 8_000,
            ..ThereminConfig::default()
        };
        let frames = [0.0, 1.0, 1e15, 2e15]
            .into_iter()
            .map(|t| DetectionFrame::empty(Duration::from_secs_f64(t)));
        let mut src = ScriptedSource::new(Resolution::default(), frames);
        let out = render_offline(&config, Resolution::default(), &mut src, 10.0).unwrap();

        assert!(out.truncated);
        assert_eq!(out.frames, 2);
        assert_eq!(out.samples.len(), 10 * 8_000);
    }

    #[test]
    fn cap_shorter_than_performance_cuts_it_off() {
        let config = ThereminConfig {
            sample_rate: 8_000,
            ..ThereminConfig::default()
        };
        let mut demo = DemoPerformance::new(&config, Duration::from_secs(8));
        let res = demo.resolution();
        let out = render_offline(&config, res, &mut demo, 6.0).unwrap();

        assert!(out.truncated);
        assert!(out.calibrated);
        assert_eq!(out.samples.len(), 6 * 8_000);
    }
}
