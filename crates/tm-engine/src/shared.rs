//! Lock-free control snapshot shared between the gesture and audio domains.
//!
//! Each field is its own atomic: a reader may see a frequency from one
//! update and a volume from the next, but never a torn value within a
//! field.

use core::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use tm_ir::Waveform;

/// Values the renderer needs for one block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSnapshot {
    pub frequency: f64,
    pub volume: f64,
    pub waveform: Waveform,
}

/// Published control state.
#[derive(Debug)]
pub struct SharedControls {
    frequency: AtomicU64,
    volume: AtomicU64,
    waveform: AtomicU8,
}

impl SharedControls {
    pub fn new(snapshot: ControlSnapshot) -> Self {
        Self {
            frequency: AtomicU64::new(snapshot.frequency.to_bits()),
            volume: AtomicU64::new(snapshot.volume.to_bits()),
            waveform: AtomicU8::new(snapshot.waveform.id()),
        }
    }

    pub fn publish(&self, snapshot: ControlSnapshot) {
        self.set_frequency(snapshot.frequency);
        self.set_volume(snapshot.volume);
        self.set_waveform(snapshot.waveform);
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            frequency: f64::from_bits(self.frequency.load(Ordering::Relaxed)),
            volume: f64::from_bits(self.volume.load(Ordering::Relaxed)),
            waveform: Waveform::from_id(self.waveform.load(Ordering::Relaxed)),
        }
    }

    pub fn set_frequency(&self, hz: f64) {
        self.frequency.store(hz.to_bits(), Ordering::Relaxed);
    }

    pub fn set_volume(&self, volume: f64) {
        self.volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform.id(), Ordering::Relaxed);
    }
}
