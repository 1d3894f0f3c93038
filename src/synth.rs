//! Synthetic hand poses.
//!
//! Used to drive the pipeline without a camera (in the demo binary and in tests). The poses are
//! idealized upright hands in normalized image coordinates.

use std::f32::consts::PI;

use crate::landmark::{HandLandmarks, Handedness, LandmarkIdx, NUM_LANDMARKS};

const WRIST: [f32; 2] = [0.5, 0.8];

/// Distance of the thumb tip from the wrist in [`pointing_thumb`] poses.
const THUMB_REACH: f32 = 0.25;

/// Per finger (index, middle, ring, pinky): X coordinate, then Y of MCP, PIP, DIP, extended tip
/// and curled tip.
const FINGERS: [(f32, [f32; 5]); 4] = [
    (0.45, [0.60, 0.50, 0.45, 0.40, 0.62]),
    (0.50, [0.60, 0.49, 0.44, 0.38, 0.62]),
    (0.55, [0.60, 0.50, 0.45, 0.40, 0.62]),
    (0.60, [0.62, 0.54, 0.50, 0.46, 0.63]),
];

const THUMB_BASE: [[f32; 2]; 3] = [[0.42, 0.75], [0.36, 0.70], [0.32, 0.66]];
const THUMB_EXTENDED: [f32; 2] = [0.25, 0.60];
const THUMB_FOLDED: [f32; 2] = [0.50, 0.66];

/// Creates a right hand with the given fingers extended, shifted horizontally by `offset_x`.
///
/// `fingers` is in index, middle, ring, pinky order.
fn right_hand(thumb: bool, fingers: [bool; 4], offset_x: f32, confidence: f32) -> HandLandmarks {
    let mut pos = Vec::with_capacity(NUM_LANDMARKS);
    pos.push(WRIST);
    pos.extend_from_slice(&THUMB_BASE);
    pos.push(if thumb { THUMB_EXTENDED } else { THUMB_FOLDED });
    for (&(x, [mcp, pip, dip, tip, curled]), extended) in FINGERS.iter().zip(fingers) {
        pos.push([x, mcp]);
        pos.push([x, pip]);
        pos.push([x, dip]);
        pos.push([x, if extended { tip } else { curled }]);
    }

    for p in &mut pos {
        p[0] += offset_x;
    }
    HandLandmarks::from_2d(&pos, Handedness::Right, confidence)
}

fn with_handedness(hand: HandLandmarks, handedness: Handedness) -> HandLandmarks {
    match handedness {
        Handedness::Right => hand,
        Handedness::Left => hand.mirrored(),
    }
}

/// Creates a hand showing `count` fingers.
///
/// Fingers are raised in counting order: index, middle, ring, pinky, then the thumb.
///
/// # Panics
///
/// This function panics if `count` is larger than 5.
pub fn counting_hand(handedness: Handedness, count: u8, confidence: f32) -> HandLandmarks {
    assert!(count <= 5, "a hand cannot show {count} fingers");
    let count = usize::from(count);
    let mut fingers = [false; 4];
    for raised in fingers.iter_mut().take(count) {
        *raised = true;
    }
    with_handedness(
        right_hand(count == 5, fingers, 0.0, confidence),
        handedness,
    )
}

/// Creates an open hand (all five fingers extended).
pub fn open_hand(handedness: Handedness, confidence: f32) -> HandLandmarks {
    counting_hand(handedness, 5, confidence)
}

/// Creates an open hand whose thumb tip points at `angle_deg` as seen from the wrist.
///
/// The angle is measured counter-clockwise from the positive X axis with Y pointing *up*, so
/// 90° places the thumb tip straight above the wrist in the image.
pub fn pointing_thumb(handedness: Handedness, angle_deg: f32, confidence: f32) -> HandLandmarks {
    let rad = angle_deg * PI / 180.0;
    let tip = [
        WRIST[0] + THUMB_REACH * rad.cos(),
        WRIST[1] - THUMB_REACH * rad.sin(),
    ];
    let hand =
        right_hand(true, [true; 4], 0.0, confidence).with_landmark(LandmarkIdx::ThumbTip, tip);
    match handedness {
        Handedness::Right => hand,
        // Keep the thumb geometry as given; only the label changes.
        Handedness::Left => {
            HandLandmarks::new(hand.positions().to_vec(), Handedness::Left, confidence)
        }
    }
}

fn index_pair(crossed: bool, confidence: f32) -> [HandLandmarks; 2] {
    let (left_tip, right_tip) = if crossed {
        ([0.60, 0.35], [0.40, 0.35])
    } else {
        ([0.35, 0.35], [0.65, 0.35])
    };
    let left = right_hand(false, [true, false, false, false], -0.2, confidence)
        .with_landmark(LandmarkIdx::IndexFingerMcp, [0.35, 0.60])
        .with_landmark(LandmarkIdx::IndexFingerTip, left_tip);
    let right = right_hand(false, [true, false, false, false], 0.2, confidence)
        .with_landmark(LandmarkIdx::IndexFingerMcp, [0.65, 0.60])
        .with_landmark(LandmarkIdx::IndexFingerTip, right_tip);
    [
        HandLandmarks::new(left.positions().to_vec(), Handedness::Left, confidence),
        right,
    ]
}

/// Creates two hands whose index fingers form an X.
pub fn crossed_index_fingers(confidence: f32) -> [HandLandmarks; 2] {
    index_pair(true, confidence)
}

/// Creates two hands whose raised index fingers point straight up, side by side.
pub fn parallel_index_fingers(confidence: f32) -> [HandLandmarks; 2] {
    index_pair(false, confidence)
}
