//! Estimation of the raw control angle from hand landmarks.

use std::time::Duration;

use nalgebra::{Point2, Vector2};

use crate::{
    angle,
    landmark::{HandLandmarks, HandSelector, Handedness, LandmarkFrame, LandmarkIdx},
};

/// Anchor-to-target vectors shorter than this are considered degenerate.
const MIN_LEVER_LENGTH: f32 = 1e-6;

/// The reference point the control angle is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A single landmark.
    Landmark(LandmarkIdx),
    /// The midpoint between two landmarks.
    Midpoint(LandmarkIdx, LandmarkIdx),
}

impl Anchor {
    fn point(&self, hand: &HandLandmarks) -> Point2<f32> {
        match *self {
            Anchor::Landmark(idx) => hand.point(idx),
            Anchor::Midpoint(a, b) => nalgebra::center(&hand.point(a), &hand.point(b)),
        }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::Landmark(LandmarkIdx::Wrist)
    }
}

/// One raw control angle measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    raw_angle: Option<f32>,
    timestamp: Duration,
}

impl AngleSample {
    /// Creates a valid sample. `raw_angle` is normalized into `[0, 360)`.
    ///
    /// A non-finite `raw_angle` has no meaningful direction and produces an invalid sample.
    pub fn new(raw_angle: f32, timestamp: Duration) -> Self {
        Self {
            raw_angle: raw_angle.is_finite().then(|| angle::normalize(raw_angle)),
            timestamp,
        }
    }

    /// Creates a sample recording that no usable hand was present.
    pub fn invalid(timestamp: Duration) -> Self {
        Self {
            raw_angle: None,
            timestamp,
        }
    }

    /// The measured angle in degrees, or `None` if the sample is invalid.
    #[inline]
    pub fn raw_angle(&self) -> Option<f32> {
        self.raw_angle
    }

    #[inline]
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.raw_angle.is_some()
    }
}

/// Computes the angle of the lever formed by an anchor point and a target landmark (by default
/// the wrist and the thumb tip) of the dominant hand.
///
/// The angle is measured counter-clockwise from the image's X axis, with Y pointing *up* (the
/// landmark Y axis is flipped), and normalized into `[0, 360)`. It is not clamped to any playable
/// range.
#[derive(Debug, Clone)]
pub struct AngleEstimator {
    selector: HandSelector,
    anchor: Anchor,
    target: LandmarkIdx,
    mirror_left_hand: bool,
}

impl AngleEstimator {
    /// Creates an estimator tracking the given dominant hand.
    pub fn new(hand: Handedness) -> Self {
        Self::from_selector(HandSelector::new(hand))
    }

    /// Creates an estimator tracking the hand picked by `selector`.
    pub fn from_selector(selector: HandSelector) -> Self {
        Self {
            selector,
            anchor: Anchor::default(),
            target: LandmarkIdx::ThumbTip,
            mirror_left_hand: true,
        }
    }

    pub fn with_anchor(self, anchor: Anchor) -> Self {
        Self { anchor, ..self }
    }

    pub fn with_target(self, target: LandmarkIdx) -> Self {
        Self { target, ..self }
    }

    /// Sets whether a left dominant hand is mirrored horizontally before computing its angle.
    ///
    /// When enabled (the default), a left hand making the same motion as a right hand produces the
    /// same angle.
    pub fn with_left_hand_mirroring(self, mirror_left_hand: bool) -> Self {
        Self {
            mirror_left_hand,
            ..self
        }
    }

    #[inline]
    pub fn selector(&self) -> &HandSelector {
        &self.selector
    }

    /// Estimates the control angle of a single frame.
    ///
    /// Returns an invalid sample when the dominant hand is missing, not confident enough, or when
    /// the anchor and target coincide.
    pub fn estimate(&self, frame: &LandmarkFrame) -> AngleSample {
        let timestamp = frame.timestamp();
        match self.selector.select(frame).and_then(|hand| self.lever_angle(hand)) {
            Some(deg) => AngleSample::new(deg, timestamp),
            None => AngleSample::invalid(timestamp),
        }
    }

    fn lever_angle(&self, hand: &HandLandmarks) -> Option<f32> {
        let lever: Vector2<f32> = hand.point(self.target) - self.anchor.point(hand);
        if !(lever.x.is_finite() && lever.y.is_finite()) {
            log::trace!("non-finite landmark coordinates, ignoring hand");
            return None;
        }
        if lever.norm() < MIN_LEVER_LENGTH {
            log::trace!("degenerate lever, anchor and target coincide");
            return None;
        }

        let dx = if self.mirror_left_hand && self.selector.handedness() == Handedness::Left {
            -lever.x
        } else {
            lever.x
        };
        // Landmark Y points down.
        let dy = -lever.y;
        Some(angle::normalize(dy.atan2(dx).to_degrees()))
    }
}
