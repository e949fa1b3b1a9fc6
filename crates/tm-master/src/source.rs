//! Detection sources: where hand detections come from.
//!
//! The landmark detector itself lives outside this program. A source
//! hands the orchestrator one [`DetectionFrame`] at a time.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tm_formats::{FormatError, TraceReader};
use tm_ir::{DetectionFrame, Resolution};

/// Frames held in flight between a [`ThreadedSource`] worker and its reader.
const THREADED_QUEUE_DEPTH: usize = 8;

/// Error type for detection sources.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Failed to read the underlying stream
    Io(String),
    /// Malformed trace data
    Format(FormatError),
    /// No frame arrived within the timeout
    Timeout(Duration),
    /// The producing thread went away without ending the stream
    Disconnected,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(msg) => write!(f, "Source I/O error: {}", msg),
            SourceError::Format(e) => write!(f, "Trace format error: {}", e),
            SourceError::Timeout(d) => write!(f, "No detection frame within {:?}", d),
            SourceError::Disconnected => write!(f, "Detection source disconnected"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<FormatError> for SourceError {
    fn from(e: FormatError) -> Self {
        SourceError::Format(e)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e.to_string())
    }
}

/// A stream of detection frames with a fixed resolution.
pub trait DetectionSource {
    /// Resolution the landmarks are normalized against.
    fn resolution(&self) -> Resolution;

    /// Next frame, or `None` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError>;
}

impl<S: DetectionSource + ?Sized> DetectionSource for Box<S> {
    fn resolution(&self) -> Resolution {
        (**self).resolution()
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError> {
        (**self).next_frame()
    }
}

// --- In-memory ---

/// Replays a fixed list of frames.
pub struct ScriptedSource {
    resolution: Resolution,
    frames: VecDeque<DetectionFrame>,
}

impl ScriptedSource {
    pub fn new(resolution: Resolution, frames: impl IntoIterator<Item = DetectionFrame>) -> Self {
        Self {
            resolution,
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DetectionSource for ScriptedSource {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError> {
        Ok(self.frames.pop_front())
    }
}

// --- Trace ---

/// Reads frames from a detection trace.
pub struct TraceSource<R> {
    reader: TraceReader<R>,
}

impl<R: BufRead> TraceSource<R> {
    pub fn new(reader: R) -> Result<Self, SourceError> {
        Ok(Self {
            reader: TraceReader::new(reader)?,
        })
    }
}

impl TraceSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> DetectionSource for TraceSource<R> {
    fn resolution(&self) -> Resolution {
        self.reader.resolution()
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError> {
        Ok(self.reader.next_frame()?)
    }
}

// --- Pacing ---

/// Delivers frames no earlier than their timestamps, measured from the
/// first frame.
pub struct PacedSource<S> {
    inner: S,
    origin: Option<(Instant, Duration)>,
}

impl<S: DetectionSource> PacedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            origin: None,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DetectionSource> DetectionSource for PacedSource<S> {
    fn resolution(&self) -> Resolution {
        self.inner.resolution()
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError> {
        let Some(frame) = self.inner.next_frame()? else {
            return Ok(None);
        };
        let (start, first_ts) = *self
            .origin
            .get_or_insert_with(|| (Instant::now(), frame.timestamp));

        let due = start + frame.timestamp.saturating_sub(first_ts);
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        Ok(Some(frame))
    }
}

// --- Threaded ---

enum Message {
    Frame(DetectionFrame),
    End,
    Failed(SourceError),
}

/// Runs a source on its own thread and waits at most `timeout` per frame.
///
/// A slow or stuck producer surfaces as [`SourceError::Timeout`] instead of
/// stalling the caller. The worker exits once this handle is dropped.
pub struct ThreadedSource {
    resolution: Resolution,
    rx: Receiver<Message>,
    timeout: Duration,
    ended: bool,
}

impl ThreadedSource {
    pub fn spawn<S: DetectionSource + Send + 'static>(source: S, timeout: Duration) -> Self {
        let resolution = source.resolution();
        let (tx, rx) = mpsc::sync_channel(THREADED_QUEUE_DEPTH);
        thread::spawn(move || {
            let mut source = source;
            loop {
                let msg = match source.next_frame() {
                    Ok(Some(frame)) => Message::Frame(frame),
                    Ok(None) => Message::End,
                    Err(e) => Message::Failed(e),
                };
                let last = !matches!(msg, Message::Frame(_));
                if tx.send(msg).is_err() || last {
                    break;
                }
            }
        });

        Self {
            resolution,
            rx,
            timeout,
            ended: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl DetectionSource for ThreadedSource {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>, SourceError> {
        if self.ended {
            return Ok(None);
        }
        match self.rx.recv_timeout(self.timeout) {
            Ok(Message::Frame(frame)) => Ok(Some(frame)),
            Ok(Message::End) => {
                self.ended = true;
                Ok(None)
            }
            Ok(Message::Failed(e)) => {
                self.ended = true;
                Err(e)
            }
            Err(RecvTimeoutError::Timeout) => Err(SourceError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                self.ended = true;
                Err(SourceError::Disconnected)
            }
        }
    }
}
