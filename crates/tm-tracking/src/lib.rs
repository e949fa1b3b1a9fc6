//! Gesture-to-parameter mapping for theremulator.
//!
//! Turns per-frame hand detections into normalized pitch and volume. A
//! fixed calibration window first learns the playing area, after which
//! one hand's horizontal reach sets pitch and the other hand's height
//! sets volume.

mod mapper;

pub use mapper::{GestureMapper, MapperSettings, MapperState, MapperUpdate};
