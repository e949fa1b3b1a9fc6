//! Latest-value hand-off to display consumers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tm_engine::DisplayLabel;
use tm_ir::CalibrationRegion;

/// Single-slot cell: each publish overwrites the previous value.
///
/// Readers never see a partially written value and may miss intermediate
/// ones. The version increases by one per publish.
pub struct LatestCell<T> {
    slot: Mutex<Option<T>>,
    version: AtomicU64,
}

impl<T> LatestCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            version: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(value);
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Number of values published so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Remove and return the current value.
    pub fn take(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<T: Clone> LatestCell<T> {
    /// Copy of the current value, if any.
    pub fn latest(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Default for LatestCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a display shows after each processed frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayFrame {
    pub calibrated: bool,
    pub region: CalibrationRegion,
    /// Stored (inverted) volume, [0, 1]
    pub volume: f64,
    /// Note name or formatted frequency
    pub label: DisplayLabel,
}

impl fmt::Display for DisplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.calibrated {
            return write!(f, "Calibrating...");
        }
        write!(f, "V: {:.0}%, P: {}", self.volume * 100.0, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_until_published() {
        let cell: LatestCell<u32> = LatestCell::new();
        assert_eq!(cell.latest(), None);
        assert_eq!(cell.version(), 0);
    }

    #[test]
    fn publish_overwrites() {
        let cell = LatestCell::new();
        cell.publish(1);
        cell.publish(2);
        assert_eq!(cell.latest(), Some(2));
        assert_eq!(cell.version(), 2);
        assert_eq!(cell.take(), Some(2));
        assert_eq!(cell.latest(), None);
    }

    #[test]
    fn readable_from_other_thread() {
        let cell = Arc::new(LatestCell::new());
        let writer = cell.clone();
        std::thread::spawn(move || {
            for i in 0..100 {
                writer.publish(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(cell.latest(), Some(99));
        assert_eq!(cell.version(), 100);
    }

    #[test]
    fn status_line() {
        let mut label = DisplayLabel::new();
        label.push_str("A4").unwrap();
        let mut frame = DisplayFrame {
            calibrated: true,
            region: CalibrationRegion::default(),
            volume: 0.75,
            label,
        };
        assert_eq!(frame.to_string(), "V: 75%, P: A4");
        frame.calibrated = false;
        assert_eq!(frame.to_string(), "Calibrating...");
    }
}
