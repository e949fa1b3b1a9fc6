//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tm_engine::{Renderer, SharedControls, MAX_BLOCK_SIZE};

use crate::traits::{AudioError, AudioOutput};

/// CPAL-based audio output.
///
/// The stream is built up front, paused. The callback owns a [`Renderer`]
/// and renders mono blocks that are copied to every device channel.
pub struct CpalOutput {
    config: StreamConfig,
    stream: Stream,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device at `sample_rate` if it supports it,
    /// otherwise at the device's default rate.
    pub fn new(shared: Arc<SharedControls>, sample_rate: u32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;

        let config = choose_config(&device, sample_rate)?;
        if config.sample_rate.0 != sample_rate {
            log::warn!(
                "output device does not support {} Hz, using {} Hz",
                sample_rate,
                config.sample_rate.0
            );
        }
        log::info!(
            "audio output: {} Hz, {} channel(s)",
            config.sample_rate.0,
            config.channels
        );

        let running = Arc::new(AtomicBool::new(false));
        let renderer = Renderer::new(shared, config.sample_rate.0);
        let stream = build_stream(&device, &config, renderer, running.clone())?;
        // Some hosts start streams on creation.
        if let Err(e) = stream.pause() {
            log::warn!("could not pause new audio stream: {}", e);
        }

        Ok(Self {
            config,
            stream,
            running,
        })
    }
}

fn choose_config(device: &Device, sample_rate: u32) -> Result<StreamConfig, AudioError> {
    let wanted = SampleRate(sample_rate);
    let supported = device
        .supported_output_configs()
        .map_err(|e| AudioError::DeviceInit(e.to_string()))?
        .filter(|range| range.sample_format() == SampleFormat::F32)
        .find(|range| range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate());

    match supported {
        Some(range) => Ok(range.with_sample_rate(wanted).into()),
        None => {
            let config = device
                .default_output_config()
                .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
            Ok(config.into())
        }
    }
}

fn build_stream(
    device: &Device,
    config: &StreamConfig,
    mut renderer: Renderer,
    running: Arc<AtomicBool>,
) -> Result<Stream, AudioError> {
    let channels = (config.channels as usize).max(1);
    let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];

    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if !running.load(Ordering::Relaxed) {
                    data.fill(0.0);
                    return;
                }

                for out in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = out.len() / channels;
                    let block = &mut scratch[..frames];
                    renderer.render_block(block);
                    for (frame, &sample) in out.chunks_mut(channels).zip(block.iter()) {
                        frame.fill(sample);
                    }
                }
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::StreamCreate(e.to_string()))
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn start(&mut self) -> Result<(), AudioError> {
        let stream = &self.stream;
        switch_running(&self.running, true, || {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))
        })
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let stream = &self.stream;
        switch_running(&self.running, false, || {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))
        })
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Run `action` unless `running` already equals `on`, and record the new
/// state only if it succeeded.
fn switch_running(
    running: &AtomicBool,
    on: bool,
    action: impl FnOnce() -> Result<(), AudioError>,
) -> Result<(), AudioError> {
    if running.load(Ordering::Relaxed) == on {
        return Ok(());
    }
    action()?;
    running.store(on, Ordering::Relaxed);
    Ok(())
}
