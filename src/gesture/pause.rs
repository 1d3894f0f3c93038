use nalgebra::{Point2, Vector2};

use crate::landmark::{HandLandmarks, LandmarkFrame, LandmarkIdx};

/// Result of checking a pair of hands for the crossed pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Whether the index fingers form an X.
    pub crossed: bool,
    /// Confidence of the pair: the lower of the two hand confidences.
    pub confidence: f32,
}

/// Detects two index fingers crossed into an X.
///
/// Each index finger is modeled as the segment from its knuckle (MCP) to its tip. The pose is
/// detected when the two segments properly intersect and the wrists are far enough apart that the
/// two hands cannot be the same hand detected twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingDetector {
    min_confidence: f32,
    min_wrist_separation: f32,
}

impl CrossingDetector {
    pub const DEFAULT_MIN_WRIST_SEPARATION: f32 = 0.2;

    /// # Panics
    ///
    /// This method panics if `min_confidence` is not between 0.0 and 1.0, or if
    /// `min_wrist_separation` is negative or not finite.
    pub fn new(min_confidence: f32, min_wrist_separation: f32) -> Self {
        assert!((0.0..=1.0).contains(&min_confidence));
        assert!(min_wrist_separation.is_finite() && min_wrist_separation >= 0.0);
        Self {
            min_confidence,
            min_wrist_separation,
        }
    }

    /// Checks a frame for the crossed pose.
    ///
    /// The two most confident hands in the frame are used. Returns `None` if there are fewer than
    /// two hands that pass the confidence threshold.
    pub fn detect(&self, frame: &LandmarkFrame) -> Option<Crossing> {
        let mut hands = frame
            .hands()
            .iter()
            .filter(|hand| hand.confidence() >= self.min_confidence)
            .collect::<Vec<_>>();
        hands.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
        let [a, b] = hands.get(..2)? else {
            return None;
        };

        let confidence = a.confidence().min(b.confidence());
        let separation = nalgebra::distance(
            &a.point(LandmarkIdx::Wrist),
            &b.point(LandmarkIdx::Wrist),
        );
        let crossed = separation >= self.min_wrist_separation && {
            let (a0, a1) = index_finger(a);
            let (b0, b1) = index_finger(b);
            segments_cross(a0, a1, b0, b1)
        };
        Some(Crossing {
            crossed,
            confidence,
        })
    }
}

fn index_finger(hand: &HandLandmarks) -> (Point2<f32>, Point2<f32>) {
    (
        hand.point(LandmarkIdx::IndexFingerMcp),
        hand.point(LandmarkIdx::IndexFingerTip),
    )
}

/// Z component of the cross product of `(b - a)` and `(c - a)`.
///
/// Positive if `a -> b -> c` turns counter-clockwise (in a Y-up frame), negative if clockwise, zero
/// if collinear.
fn orientation(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let ab: Vector2<f32> = b - a;
    let ac: Vector2<f32> = c - a;
    ab.perp(&ac)
}

/// Returns whether segment `a0-a1` and segment `b0-b1` cross each other.
///
/// Only proper crossings count: segments that merely touch at an endpoint, or that are collinear,
/// are not considered crossed.
pub fn segments_cross(
    a0: Point2<f32>,
    a1: Point2<f32>,
    b0: Point2<f32>,
    b1: Point2<f32>,
) -> bool {
    let d1 = orientation(a0, a1, b0);
    let d2 = orientation(a0, a1, b1);
    let d3 = orientation(b0, b1, a0);
    let d4 = orientation(b0, b1, a1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
