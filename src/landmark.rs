//! Hand landmark frames as delivered by the external hand detector.
//!
//! Coordinates are normalized image coordinates: X points to the right and Y points *down*, with
//! `(0, 0)` in the top left corner of the camera image. Z, if the detector provides it, is carried
//! along but not used by this crate.

use std::{fmt, str::FromStr, time::Duration};

use nalgebra::Point2;

type Position = [f32; 3];

/// Number of landmarks in the hand model.
pub const NUM_LANDMARKS: usize = 21;

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Returns the other hand.
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        })
    }
}

/// Error returned when parsing a [`Handedness`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHandednessError {
    input: String,
}

impl fmt::Display for ParseHandednessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid handedness `{}` (expected `Left` or `Right`)", self.input)
    }
}

impl std::error::Error for ParseHandednessError {}

impl FromStr for Handedness {
    type Err = ParseHandednessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(Handedness::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(Handedness::Right)
        } else {
            Err(ParseHandednessError { input: s.into() })
        }
    }
}

/// The landmarks of one detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    positions: Box<[Position]>,
    handedness: Handedness,
    confidence: f32,
}

impl HandLandmarks {
    /// Creates a hand from its landmark positions, in [`LandmarkIdx`] order.
    ///
    /// # Panics
    ///
    /// This method panics if `positions` does not contain exactly [`NUM_LANDMARKS`] entries.
    pub fn new(positions: Vec<Position>, handedness: Handedness, confidence: f32) -> Self {
        assert_eq!(
            positions.len(),
            NUM_LANDMARKS,
            "hand must have exactly {NUM_LANDMARKS} landmarks"
        );
        Self {
            positions: positions.into_boxed_slice(),
            handedness,
            confidence,
        }
    }

    /// Creates a hand from 2D landmark positions, setting all Z coordinates to `0.0`.
    pub fn from_2d(positions: &[[f32; 2]], handedness: Handedness, confidence: f32) -> Self {
        Self::new(
            positions.iter().map(|&[x, y]| [x, y, 0.0]).collect(),
            handedness,
            confidence,
        )
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Detection confidence reported by the detector, usually between 0.0 and 1.0.
    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Returns a landmark's full position.
    #[inline]
    pub fn position(&self, idx: LandmarkIdx) -> Position {
        self.positions[idx as usize]
    }

    /// Returns a landmark's position projected onto the image plane.
    #[inline]
    pub fn point(&self, idx: LandmarkIdx) -> Point2<f32> {
        let [x, y, _] = self.position(idx);
        Point2::new(x, y)
    }

    /// Returns a copy of `self` with one landmark moved to a new image position (Z is kept).
    pub fn with_landmark(mut self, idx: LandmarkIdx, [x, y]: [f32; 2]) -> Self {
        let p = &mut self.positions[idx as usize];
        p[0] = x;
        p[1] = y;
        self
    }

    /// Returns a copy of `self` mirrored horizontally around the image center, with its
    /// handedness label flipped.
    pub fn mirrored(&self) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|&[x, y, z]| [1.0 - x, y, z])
                .collect(),
            handedness: self.handedness.opposite(),
            confidence: self.confidence,
        }
    }
}

/// All hands detected in one camera frame.
///
/// Frames are immutable once produced. A frame with no hands is valid input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkFrame {
    hands: Vec<HandLandmarks>,
    timestamp: Duration,
}

impl LandmarkFrame {
    pub fn new(hands: Vec<HandLandmarks>, timestamp: Duration) -> Self {
        Self { hands, timestamp }
    }

    /// Creates a frame containing no hands.
    pub fn empty(timestamp: Duration) -> Self {
        Self::new(Vec::new(), timestamp)
    }

    /// Capture time of the frame, relative to an arbitrary but fixed epoch.
    #[inline]
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn hands(&self) -> &[HandLandmarks] {
        &self.hands
    }

    /// Returns the most confident hand carrying the given handedness label.
    ///
    /// If `swap_labels` is `true`, the detector's labels are treated as swapped (the detector
    /// assumed a mirrored selfie image).
    pub fn hand(&self, handedness: Handedness, swap_labels: bool) -> Option<&HandLandmarks> {
        let wanted = if swap_labels {
            handedness.opposite()
        } else {
            handedness
        };
        self.hands
            .iter()
            .filter(|hand| hand.handedness == wanted)
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

/// Picks the dominant hand out of a [`LandmarkFrame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSelector {
    handedness: Handedness,
    swap_labels: bool,
    min_confidence: f32,
}

impl HandSelector {
    pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            swap_labels: false,
            min_confidence: Self::DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Sets the detection confidence below which a hand is ignored.
    ///
    /// # Panics
    ///
    /// This method panics if `min_confidence` is not between 0.0 and 1.0.
    pub fn with_min_confidence(self, min_confidence: f32) -> Self {
        assert!((0.0..=1.0).contains(&min_confidence));
        Self {
            min_confidence,
            ..self
        }
    }

    /// Sets whether the detector's handedness labels are swapped.
    ///
    /// Detectors that assume a mirrored selfie image label the user's right hand as "Left".
    pub fn with_swapped_labels(self, swap_labels: bool) -> Self {
        Self {
            swap_labels,
            ..self
        }
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[inline]
    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Returns the dominant hand in `frame`, if it is present with sufficient confidence.
    pub fn select<'a>(&self, frame: &'a LandmarkFrame) -> Option<&'a HandLandmarks> {
        frame
            .hand(self.handedness, self.swap_labels)
            .filter(|hand| hand.confidence() >= self.min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use crate::synth::open_hand;

    use super::*;

    #[test]
    fn parse_handedness() {
        assert_eq!("Left".parse(), Ok(Handedness::Left));
        assert_eq!("right".parse(), Ok(Handedness::Right));
        assert!("both".parse::<Handedness>().is_err());
        assert_eq!(Handedness::Left.to_string(), "Left");
    }

    #[test]
    fn select_hand_by_label() {
        let right = open_hand(Handedness::Right, 0.9);
        let weak_right = open_hand(Handedness::Right, 0.4);
        let frame = LandmarkFrame::new(vec![weak_right, right.clone()], Duration::ZERO);

        assert_eq!(frame.hand(Handedness::Right, false), Some(&right));
        assert_eq!(frame.hand(Handedness::Left, false), None);
        assert_eq!(frame.hand(Handedness::Left, true), Some(&right));
    }

    #[test]
    fn selector_confidence() {
        let frame = LandmarkFrame::new(vec![open_hand(Handedness::Left, 0.45)], Duration::ZERO);
        let selector = HandSelector::new(Handedness::Left);
        assert_eq!(selector.select(&frame), None);
        assert!(selector.with_min_confidence(0.4).select(&frame).is_some());
        assert_eq!(
            selector
                .with_min_confidence(0.4)
                .with_swapped_labels(true)
                .select(&frame),
            None
        );
    }

    #[test]
    fn mirror_flips_x_and_label() {
        let hand = open_hand(Handedness::Right, 1.0);
        let mirrored = hand.mirrored();
        assert_eq!(mirrored.handedness(), Handedness::Left);
        let [x, y, _] = hand.position(LandmarkIdx::ThumbTip);
        let [mx, my, _] = mirrored.position(LandmarkIdx::ThumbTip);
        assert_eq!(mx, 1.0 - x);
        assert_eq!(my, y);
    }

    #[test]
    #[should_panic]
    fn wrong_landmark_count() {
        HandLandmarks::new(vec![[0.0; 3]; 5], Handedness::Left, 1.0);
    }
}
