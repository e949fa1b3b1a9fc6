//! Core types for theremulator.
//!
//! This crate defines the data shared by every layer: the per-frame hand
//! detections supplied by the external landmark detector, the calibration
//! region, the normalized control values, and the configuration surface.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod control;
mod hand;
mod region;
mod waveform;

pub use config::{check_octaves, ConfigError, ThereminConfig, DEFAULT_NOTE_NAMES, MAX_OCTAVE, MIN_OCTAVE};
pub use control::ControlValues;
pub use hand::{
    DetectionFrame, HandDetection, Handedness, Landmark, PixelPoint, Resolution, MAX_HANDS,
    MAX_LANDMARKS,
};
pub use region::CalibrationRegion;
pub use waveform::Waveform;
