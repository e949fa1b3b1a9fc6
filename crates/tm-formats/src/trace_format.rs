//! Detection trace reader and writer.
//!
//! ```text
//! # comment
//! resolution 640 480
//! 0.000
//! 0.033 L 0.61,0.40 0.66,0.35 R 0.22,0.71
//! ```
//!
//! Each frame line is a timestamp in seconds followed by zero or more
//! hands, each a raw `L`/`R` label and its normalized `x,y` landmarks.

use std::io::{BufRead, Write};
use std::time::Duration;

use tm_ir::{DetectionFrame, HandDetection, Handedness, Landmark, Resolution};

use crate::FormatError;

const HEADER_KEYWORD: &str = "resolution";

/// Streaming reader over a trace.
pub struct TraceReader<R> {
    reader: R,
    resolution: Resolution,
    line_no: usize,
    last_timestamp: Duration,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Read the header and position the reader at the first frame.
    pub fn new(reader: R) -> Result<Self, FormatError> {
        let mut trace = Self {
            reader,
            resolution: Resolution::default(),
            line_no: 0,
            last_timestamp: Duration::ZERO,
            buf: String::new(),
        };
        let header = trace.next_significant_line()?.ok_or(FormatError::InvalidHeader)?;
        trace.resolution = parse_header(&header)?;
        Ok(trace)
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Line number of the last line read (1-based).
    pub fn line(&self) -> usize {
        self.line_no
    }

    /// Next frame, or `None` at end of input.
    pub fn next_frame(&mut self) -> Result<Option<DetectionFrame>, FormatError> {
        let Some(line) = self.next_significant_line()? else {
            return Ok(None);
        };
        let frame = parse_frame_line(&line, self.line_no)?;
        if frame.timestamp < self.last_timestamp {
            return Err(FormatError::TimestampOutOfOrder { line: self.line_no });
        }
        self.last_timestamp = frame.timestamp;
        Ok(Some(frame))
    }

    fn next_significant_line(&mut self) -> Result<Option<String>, FormatError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            return Ok(Some(line.to_string()));
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<DetectionFrame, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

fn parse_header(line: &str) -> Result<Resolution, FormatError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some(HEADER_KEYWORD) {
        return Err(FormatError::InvalidHeader);
    }
    let width = parts.next().and_then(|s| s.parse::<u32>().ok());
    let height = parts.next().and_then(|s| s.parse::<u32>().ok());
    match (width, height, parts.next()) {
        (Some(w), Some(h), None) if w > 0 && h > 0 => Ok(Resolution::new(w, h)),
        _ => Err(FormatError::InvalidHeader),
    }
}

/// Parse one frame line. `line` is used for error reporting only.
pub fn parse_frame_line(text: &str, line: usize) -> Result<DetectionFrame, FormatError> {
    let parse_err = |reason: String| FormatError::Parse { line, reason };

    let mut tokens = text.split_whitespace();
    let ts_token = tokens
        .next()
        .ok_or_else(|| parse_err("empty frame line".into()))?;
    let secs: f64 = ts_token
        .parse()
        .map_err(|_| parse_err(format!("invalid timestamp '{}'", ts_token)))?;
    let timestamp = Duration::try_from_secs_f64(secs)
        .map_err(|_| parse_err(format!("invalid timestamp '{}'", ts_token)))?;

    let mut frame = DetectionFrame::empty(timestamp);
    for token in tokens {
        if let Some(handedness) = parse_label(token) {
            let hand = HandDetection::from_points(handedness, &[]);
            frame
                .hands
                .try_push(hand)
                .map_err(|_| FormatError::TooManyHands { line })?;
            continue;
        }

        let point = parse_point(token)
            .ok_or_else(|| parse_err(format!("invalid token '{}'", token)))?;
        let hand = frame
            .hands
            .last_mut()
            .ok_or_else(|| parse_err("landmark before hand label".into()))?;
        hand.landmarks
            .try_push(point)
            .map_err(|_| FormatError::TooManyLandmarks { line })?;
    }
    Ok(frame)
}

fn parse_label(token: &str) -> Option<Handedness> {
    match token {
        "L" => Some(Handedness::Left),
        "R" => Some(Handedness::Right),
        _ => None,
    }
}

fn parse_point(token: &str) -> Option<Landmark> {
    let (x, y) = token.split_once(',')?;
    let x: f32 = x.parse().ok()?;
    let y: f32 = y.parse().ok()?;
    (x.is_finite() && y.is_finite()).then(|| Landmark::new(x, y))
}

/// Write the `resolution` header line.
pub fn write_header(w: &mut impl Write, resolution: Resolution) -> std::io::Result<()> {
    writeln!(w, "{} {} {}", HEADER_KEYWORD, resolution.width, resolution.height)
}

/// Write one frame line.
pub fn write_frame(w: &mut impl Write, frame: &DetectionFrame) -> std::io::Result<()> {
    write!(w, "{:.6}", frame.timestamp.as_secs_f64())?;
    for hand in &frame.hands {
        write!(w, " {}", hand.handedness.letter())?;
        for l in &hand.landmarks {
            write!(w, " {},{}", l.x, l.y)?;
        }
    }
    writeln!(w)
}
