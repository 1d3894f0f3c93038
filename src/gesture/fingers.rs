use crate::landmark::{HandLandmarks, LandmarkIdx};

/// (tip, reference joint) for the four fingers, measured from the wrist.
const FINGERS: [(LandmarkIdx, LandmarkIdx); 4] = {
    use LandmarkIdx::*;
    [
        (IndexFingerTip, IndexFingerPip),
        (MiddleFingerTip, MiddleFingerPip),
        (RingFingerTip, RingFingerPip),
        (PinkyTip, PinkyPip),
    ]
};

/// Counts extended fingers.
///
/// A finger counts as extended when its tip is farther away from the wrist than its PIP joint
/// (scaled by the extension ratio). The thumb is measured from the pinky knuckle instead, since it
/// folds across the palm rather than towards the wrist. Both tests only compare distances, so
/// they work for any in-plane rotation of the hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerCounter {
    extension_ratio: f32,
}

impl FingerCounter {
    pub const DEFAULT_EXTENSION_RATIO: f32 = 1.0;

    /// # Panics
    ///
    /// This method panics if `extension_ratio` is not finite and positive.
    pub fn new(extension_ratio: f32) -> Self {
        assert!(extension_ratio.is_finite() && extension_ratio > 0.0);
        Self { extension_ratio }
    }

    /// Returns the number of extended fingers, between 0 and 5.
    pub fn count(&self, hand: &HandLandmarks) -> u8 {
        let wrist = hand.point(LandmarkIdx::Wrist);
        let fingers = FINGERS
            .iter()
            .filter(|(tip, joint)| {
                let tip = nalgebra::distance(&hand.point(*tip), &wrist);
                let joint = nalgebra::distance(&hand.point(*joint), &wrist);
                tip > joint * self.extension_ratio
            })
            .count();

        let pinky = hand.point(LandmarkIdx::PinkyMcp);
        let thumb_tip = nalgebra::distance(&hand.point(LandmarkIdx::ThumbTip), &pinky);
        let thumb_ip = nalgebra::distance(&hand.point(LandmarkIdx::ThumbIp), &pinky);
        let thumb = thumb_tip > thumb_ip * self.extension_ratio;

        // At most 5, so this never truncates.
        (fingers + usize::from(thumb)) as u8
    }
}

impl Default for FingerCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXTENSION_RATIO)
    }
}
