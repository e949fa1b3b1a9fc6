//! File formats for theremulator.
//!
//! Currently a line-oriented text trace of hand detections, so an external
//! landmark detector can feed the theremin through a pipe or a file.

mod trace_format;

pub use trace_format::{parse_frame_line, write_frame, write_header, TraceReader};

/// Error type for format parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Missing or malformed `resolution` header
    InvalidHeader,
    /// Malformed frame line
    Parse { line: usize, reason: String },
    /// More than [`tm_ir::MAX_HANDS`] hands on one line
    TooManyHands { line: usize },
    /// More than [`tm_ir::MAX_LANDMARKS`] points for one hand
    TooManyLandmarks { line: usize },
    /// Timestamp earlier than the previous frame's
    TimestampOutOfOrder { line: usize },
    /// I/O error
    Io(String),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::InvalidHeader => write!(f, "Missing or invalid trace header"),
            FormatError::Parse { line, reason } => write!(f, "Line {}: {}", line, reason),
            FormatError::TooManyHands { line } => write!(
                f,
                "Line {}: more than {} hands",
                line,
                tm_ir::MAX_HANDS
            ),
            FormatError::TooManyLandmarks { line } => write!(
                f,
                "Line {}: more than {} landmarks in one hand",
                line,
                tm_ir::MAX_LANDMARKS
            ),
            FormatError::TimestampOutOfOrder { line } => {
                write!(f, "Line {}: timestamp goes backwards", line)
            }
            FormatError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<std::io::Error> for FormatError {
    fn from(e: std::io::Error) -> Self {
        FormatError::Io(e.to_string())
    }
}
