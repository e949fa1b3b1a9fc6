//! Audio output trait and error types.

/// Error type for audio operations.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Trait for audio output backends.
///
/// A backend pulls samples from a renderer on its own thread; the control
/// side only toggles playback. `start` and `stop` are idempotent.
pub trait AudioOutput {
    /// Get the sample rate the output actually runs at.
    fn sample_rate(&self) -> u32;

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback. Output is silent afterwards.
    fn stop(&mut self) -> Result<(), AudioError>;

    /// Whether playback is running.
    fn is_running(&self) -> bool;
}
