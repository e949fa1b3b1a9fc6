//! Calibration and tracking state machine.

use std::time::Duration;

use tm_ir::{
    CalibrationRegion, ControlValues, DetectionFrame, HandDetection, Handedness, Resolution,
    ThereminConfig,
};

/// Hands required before a frame is used for calibration or tracking.
const MIN_HANDS: usize = 2;

/// Mapper parameters derived from the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapperSettings {
    /// Frame resolution used to project landmarks onto pixels
    pub resolution: Resolution,
    /// Calibration completes once elapsed time exceeds this
    pub calibration: Duration,
    /// Invert detector handedness labels (input frames are mirrored)
    pub mirrored_input: bool,
}

impl MapperSettings {
    pub fn from_config(config: &ThereminConfig, resolution: Resolution) -> Self {
        Self {
            resolution,
            calibration: config.calibration_window(),
            mirrored_input: config.mirrored_input,
        }
    }
}

/// The mapper's two states. The only transition is
/// `Uncalibrated -> Calibrated`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapperState {
    Uncalibrated {
        /// Time calibration started, on the frame clock
        anchor: Duration,
        /// Bounds seen so far, `None` until a two-hand frame arrives
        observed: Option<CalibrationRegion>,
    },
    Calibrated {
        region: CalibrationRegion,
        controls: ControlValues,
    },
}

/// Result of feeding one frame to the mapper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapperUpdate {
    /// Still inside the calibration window
    Calibrating { region: CalibrationRegion },
    /// Calibration just completed. Emitted exactly once.
    Calibrated { region: CalibrationRegion },
    /// Calibrated. `fresh` is false when the frame lacked two hands and the
    /// previous values were held.
    Tracking { controls: ControlValues, fresh: bool },
}

/// Calibrates a pixel region from observed hands, then maps hand positions
/// inside it to [`ControlValues`].
pub struct GestureMapper {
    settings: MapperSettings,
    state: MapperState,
}

impl GestureMapper {
    /// Start uncalibrated, with the calibration clock anchored at zero.
    pub fn new(settings: MapperSettings) -> Self {
        Self::starting_at(settings, Duration::ZERO)
    }

    /// Start uncalibrated, with the calibration clock anchored at `anchor`.
    pub fn starting_at(settings: MapperSettings, anchor: Duration) -> Self {
        Self {
            settings,
            state: MapperState::Uncalibrated {
                anchor,
                observed: None,
            },
        }
    }

    /// Feed one detection frame.
    ///
    /// While uncalibrated, a frame with two or more hands grows the region
    /// by the bounding box of all their landmarks. The transition is then
    /// checked against the frame's timestamp, so the frame that completes
    /// calibration still contributes to the region.
    pub fn process(&mut self, frame: &DetectionFrame) -> MapperUpdate {
        match &mut self.state {
            MapperState::Uncalibrated { anchor, observed } => {
                if frame.hand_count() >= MIN_HANDS {
                    let all = frame
                        .hands
                        .iter()
                        .flat_map(|h| h.pixels(self.settings.resolution));
                    if let Some(bounds) = CalibrationRegion::bounding(all) {
                        match observed {
                            Some(region) => region.union(&bounds),
                            None => *observed = Some(bounds),
                        }
                        log::debug!("calibration region now {:?}", observed);
                    }
                }

                let region = observed.unwrap_or_default();
                let elapsed = frame.timestamp.saturating_sub(*anchor);
                if elapsed > self.settings.calibration {
                    if region.is_degenerate() {
                        log::warn!("calibrated with degenerate region {:?}", region);
                    }
                    self.state = MapperState::Calibrated {
                        region,
                        controls: ControlValues::default(),
                    };
                    MapperUpdate::Calibrated { region }
                } else {
                    MapperUpdate::Calibrating { region }
                }
            }
            MapperState::Calibrated { region, controls } => {
                let tracked = if frame.hand_count() < MIN_HANDS {
                    None
                } else {
                    track(&self.settings, region, &frame.hands[0], &frame.hands[1])
                };
                match tracked {
                    Some(next) => {
                        *controls = next;
                        MapperUpdate::Tracking {
                            controls: next,
                            fresh: true,
                        }
                    }
                    None => MapperUpdate::Tracking {
                        controls: *controls,
                        fresh: false,
                    },
                }
            }
        }
    }

    pub fn state(&self) -> &MapperState {
        &self.state
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, MapperState::Calibrated { .. })
    }

    /// The current region: the frozen one once calibrated, otherwise the
    /// bounds observed so far (degenerate before any two-hand frame).
    pub fn region(&self) -> CalibrationRegion {
        match self.state {
            MapperState::Uncalibrated { observed, .. } => observed.unwrap_or_default(),
            MapperState::Calibrated { region, .. } => region,
        }
    }

    /// Latest control values, once calibrated.
    pub fn controls(&self) -> Option<ControlValues> {
        match self.state {
            MapperState::Calibrated { controls, .. } => Some(controls),
            MapperState::Uncalibrated { .. } => None,
        }
    }

    pub fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    /// Handedness as seen by the player, undoing the mirror if needed.
    pub fn corrected(&self, raw: Handedness) -> Handedness {
        correct(&self.settings, raw)
    }
}

fn correct(settings: &MapperSettings, raw: Handedness) -> Handedness {
    if settings.mirrored_input {
        raw.opposite()
    } else {
        raw
    }
}

/// Pitch from the right hand's rightmost landmark, volume from the left
/// hand's highest landmark. `None` when either hand carries no landmarks.
fn track(
    settings: &MapperSettings,
    region: &CalibrationRegion,
    first: &HandDetection,
    second: &HandDetection,
) -> Option<ControlValues> {
    let (pitch_hand, volume_hand) = if correct(settings, first.handedness) == Handedness::Right {
        (first, second)
    } else {
        (second, first)
    };

    let res = settings.resolution;
    let pitch = pitch_hand
        .pixels(res)
        .map(|p| p.x)
        .max()
        .map(|x| region.normalize_x(x))?;
    let volume = volume_hand
        .pixels(res)
        .map(|p| p.y)
        .min()
        .map(|y| region.normalize_y(y))?;

    Some(ControlValues::new(pitch, volume))
}
