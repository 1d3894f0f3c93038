//! Configuration of a control stream.
//!
//! A [`Config`] is assembled by the application (eg. from its settings screen), then handed to
//! [`ControlStream::new`][crate::pipeline::ControlStream::new], which validates it and refuses to
//! start on invalid values.

use std::fmt;

use crate::{
    estimator::{Anchor, AngleEstimator},
    filter::{AdaptiveFilter, AlphaResponse},
    gesture::{CrossingDetector, FingerCounter, GestureClassifier, GestureMode},
    landmark::{HandSelector, Handedness, LandmarkIdx},
    mapper::ControlMapper,
};

/// Settings for one control stream (one player).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    dominant_hand: Handedness,
    swap_handedness: bool,
    mirror_left_hand: bool,
    anchor: Anchor,
    target: LandmarkIdx,
    min_confidence: f32,
    angle_up: f32,
    angle_down: f32,
    alpha_min: f32,
    alpha_max: f32,
    response: AlphaResponse,
    signal_lost_after: u32,
    debounce_window: usize,
    extension_ratio: f32,
    min_wrist_separation: f32,
    gesture_mode: GestureMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dominant_hand: Handedness::Right,
            swap_handedness: false,
            mirror_left_hand: true,
            anchor: Anchor::default(),
            target: LandmarkIdx::ThumbTip,
            min_confidence: HandSelector::DEFAULT_MIN_CONFIDENCE,
            angle_up: ControlMapper::DEFAULT_ANGLE_UP,
            angle_down: ControlMapper::DEFAULT_ANGLE_DOWN,
            alpha_min: AdaptiveFilter::DEFAULT_ALPHA_MIN,
            alpha_max: AdaptiveFilter::DEFAULT_ALPHA_MAX,
            response: AlphaResponse::default(),
            signal_lost_after: AdaptiveFilter::DEFAULT_SIGNAL_LOST_AFTER,
            debounce_window: GestureClassifier::DEFAULT_WINDOW,
            extension_ratio: FingerCounter::DEFAULT_EXTENSION_RATIO,
            min_wrist_separation: CrossingDetector::DEFAULT_MIN_WRIST_SEPARATION,
            gesture_mode: GestureMode::default(),
        }
    }
}

impl Config {
    /// Sets the hand that controls the paddle and whose fingers are counted.
    pub fn dominant_hand(self, dominant_hand: Handedness) -> Self {
        Self {
            dominant_hand,
            ..self
        }
    }

    /// Treats the detector's Left/Right labels as swapped.
    pub fn swap_handedness(self, swap_handedness: bool) -> Self {
        Self {
            swap_handedness,
            ..self
        }
    }

    /// Mirrors a left dominant hand so it controls the paddle like a right hand (default: on).
    pub fn mirror_left_hand(self, mirror_left_hand: bool) -> Self {
        Self {
            mirror_left_hand,
            ..self
        }
    }

    /// Sets the lever the control angle is measured on.
    pub fn lever(self, anchor: Anchor, target: LandmarkIdx) -> Self {
        Self {
            anchor,
            target,
            ..self
        }
    }

    /// Hands detected with a lower confidence are ignored.
    pub fn min_confidence(self, min_confidence: f32) -> Self {
        Self {
            min_confidence,
            ..self
        }
    }

    /// Sets the angles (in degrees) that move the paddle to the top and to the bottom.
    pub fn angle_range(self, angle_up: f32, angle_down: f32) -> Self {
        Self {
            angle_up,
            angle_down,
            ..self
        }
    }

    /// Sets the bounds of the adaptive smoothing coefficient.
    pub fn alpha_range(self, alpha_min: f32, alpha_max: f32) -> Self {
        Self {
            alpha_min,
            alpha_max,
            ..self
        }
    }

    /// Sets how the angular rate is mapped to the smoothing coefficient.
    pub fn response(self, response: AlphaResponse) -> Self {
        Self { response, ..self }
    }

    /// Number of consecutive frames without a usable hand after which the signal counts as lost.
    pub fn signal_lost_after(self, frames: u32) -> Self {
        Self {
            signal_lost_after: frames,
            ..self
        }
    }

    /// Number of identical consecutive readings required to confirm a gesture.
    pub fn debounce_window(self, frames: usize) -> Self {
        Self {
            debounce_window: frames,
            ..self
        }
    }

    pub fn extension_ratio(self, extension_ratio: f32) -> Self {
        Self {
            extension_ratio,
            ..self
        }
    }

    /// Minimum distance between the wrists (in normalized image units) for the pause pose.
    pub fn min_wrist_separation(self, min_wrist_separation: f32) -> Self {
        Self {
            min_wrist_separation,
            ..self
        }
    }

    /// Sets the gesture mode a new stream starts in.
    pub fn gesture_mode(self, gesture_mode: GestureMode) -> Self {
        Self {
            gesture_mode,
            ..self
        }
    }

    #[inline]
    pub fn initial_gesture_mode(&self) -> GestureMode {
        self.gesture_mode
    }

    /// Checks all values, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ConfidenceOutOfRange(self.min_confidence));
        }
        for (name, value) in [("angle_up", self.angle_up), ("angle_down", self.angle_down)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteAngle { name, value });
            }
        }
        if self.angle_up == self.angle_down {
            return Err(ConfigError::EmptyAngleRange(self.angle_up));
        }
        for (name, value) in [("alpha_min", self.alpha_min), ("alpha_max", self.alpha_max)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::AlphaOutOfRange { name, value });
            }
        }
        if self.alpha_min <= 0.0 {
            return Err(ConfigError::ZeroAlphaMin);
        }
        if self.alpha_min > self.alpha_max {
            return Err(ConfigError::AlphaBoundsInverted {
                min: self.alpha_min,
                max: self.alpha_max,
            });
        }
        if !self.response.is_valid() {
            return Err(ConfigError::InvalidResponse(self.response));
        }
        if self.debounce_window == 0 {
            return Err(ConfigError::EmptyDebounceWindow);
        }
        if !(self.extension_ratio.is_finite() && self.extension_ratio > 0.0) {
            return Err(ConfigError::InvalidThreshold {
                name: "extension_ratio",
                value: self.extension_ratio,
            });
        }
        if !(self.min_wrist_separation.is_finite() && self.min_wrist_separation >= 0.0) {
            return Err(ConfigError::InvalidThreshold {
                name: "min_wrist_separation",
                value: self.min_wrist_separation,
            });
        }
        Ok(())
    }

    // The constructors below assume `validate` has passed.

    fn selector(&self) -> HandSelector {
        HandSelector::new(self.dominant_hand)
            .with_min_confidence(self.min_confidence)
            .with_swapped_labels(self.swap_handedness)
    }

    pub(crate) fn estimator(&self) -> AngleEstimator {
        AngleEstimator::from_selector(self.selector())
            .with_anchor(self.anchor)
            .with_target(self.target)
            .with_left_hand_mirroring(self.mirror_left_hand)
    }

    pub(crate) fn filter(&self) -> AdaptiveFilter {
        AdaptiveFilter::new(self.alpha_min, self.alpha_max, self.response)
            .with_signal_lost_after(self.signal_lost_after)
    }

    pub(crate) fn classifier(&self) -> GestureClassifier {
        GestureClassifier::new(self.selector(), self.debounce_window)
            .with_finger_counter(FingerCounter::new(self.extension_ratio))
            .with_crossing_detector(CrossingDetector::new(
                self.min_confidence,
                self.min_wrist_separation,
            ))
    }

    pub(crate) fn mapper(&self) -> ControlMapper {
        ControlMapper::new(self.angle_up, self.angle_down)
    }
}

/// An invalid [`Config`] value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ConfidenceOutOfRange(f32),
    NonFiniteAngle { name: &'static str, value: f32 },
    EmptyAngleRange(f32),
    AlphaOutOfRange { name: &'static str, value: f32 },
    /// `alpha_min` is 0, so a still hand would never move the filtered value.
    ZeroAlphaMin,
    AlphaBoundsInverted { min: f32, max: f32 },
    InvalidResponse(AlphaResponse),
    EmptyDebounceWindow,
    InvalidThreshold { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfidenceOutOfRange(v) => {
                write!(f, "minimum hand confidence {v} is not between 0 and 1")
            }
            ConfigError::NonFiniteAngle { name, value } => {
                write!(f, "`{name}` must be a finite angle, got {value}")
            }
            ConfigError::EmptyAngleRange(angle) => {
                write!(f, "`angle_up` and `angle_down` are both {angle}°")
            }
            ConfigError::AlphaOutOfRange { name, value } => {
                write!(f, "`{name}` must be between 0 and 1, got {value}")
            }
            ConfigError::ZeroAlphaMin => {
                f.write_str("`alpha_min` must be larger than 0, or the filter never settles")
            }
            ConfigError::AlphaBoundsInverted { min, max } => {
                write!(f, "`alpha_min` ({min}) is larger than `alpha_max` ({max})")
            }
            ConfigError::InvalidResponse(response) => {
                write!(f, "invalid alpha response curve {response:?}")
            }
            ConfigError::EmptyDebounceWindow => f.write_str("debounce window must not be 0"),
            ConfigError::InvalidThreshold { name, value } => {
                write!(f, "invalid value {value} for `{name}`")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
