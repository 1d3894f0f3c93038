//! Discrete gesture classification.
//!
//! Two detectors run on every frame:
//!
//! - the finger-count detector counts the extended fingers of the dominant hand, and is used for
//!   menu navigation and for answering in-game questions,
//! - the crossing detector looks for both index fingers crossed into an X, which pauses the game.
//!
//! Raw per-frame readings of both detectors are debounced, and events are only emitted when the
//! debounced (confirmed) reading changes.

mod debounce;
mod fingers;
mod pause;

use tinyvec::ArrayVec;

use crate::landmark::{HandSelector, LandmarkFrame};

pub use debounce::Debouncer;
pub use fingers::FingerCounter;
pub use pause::{segments_cross, Crossing, CrossingDetector};

/// Determines what a confirmed finger count means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// Menu navigation: 1 to 3 fingers select a menu entry, other counts are ignored.
    #[default]
    Navigate,
    /// Answering a question: any count from 0 to 5 is an answer.
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureKind {
    #[default]
    None,
    /// Menu entry 1 to 3.
    Navigate(u8),
    /// Answer 0 to 5.
    Answer(u8),
    /// Index fingers were crossed.
    Pause,
    /// Index fingers are no longer crossed.
    Resume,
}

impl GestureKind {
    fn from_count(mode: GestureMode, count: u8) -> Self {
        match (mode, count) {
            (GestureMode::Navigate, 1..=3) => GestureKind::Navigate(count),
            (GestureMode::Navigate, _) => GestureKind::None,
            (GestureMode::Answer, 0..=5) => GestureKind::Answer(count),
            (GestureMode::Answer, _) => GestureKind::None,
        }
    }
}

/// A confirmed gesture change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Detection confidence of the hand (or, for pause and resume, the weaker of the two hands) in
    /// the frame that confirmed the gesture. 0.0 if the change was caused by the hands leaving the
    /// camera view.
    ///
    /// A confirmed "no hand" count produces no event at all.
    pub confidence: f32,
}

/// Events produced by a single frame.
///
/// A frame produces at most one pause-related and one finger-count event.
pub type GestureEvents = ArrayVec<[GestureEvent; 2]>;

/// Gesture classification parameters.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    selector: HandSelector,
    counter: FingerCounter,
    crossing: CrossingDetector,
    window: usize,
}

/// Per-stream state of a [`GestureClassifier`].
#[derive(Debug, Clone)]
pub struct GestureState {
    mode: GestureMode,
    /// Finger count of the dominant hand, `None` while it is absent.
    fingers: Debouncer<Option<u8>>,
    crossed: Debouncer<bool>,
}

impl GestureState {
    #[inline]
    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    /// Switches the meaning of finger counts.
    ///
    /// If the mode changes, the finger-count history is cleared, so a gesture that is currently
    /// held has to be confirmed again before it produces an event in the new mode.
    pub fn set_mode(&mut self, mode: GestureMode) {
        if mode != self.mode {
            log::debug!("gesture mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.fingers.reset();
        }
    }

    /// The confirmed finger count, or `None` if no count is confirmed.
    #[inline]
    pub fn finger_count(&self) -> Option<u8> {
        self.fingers.confirmed()
    }

    /// Whether the crossed-fingers pose is currently confirmed.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.crossed.confirmed()
    }

    /// How long the crossed pose has been held, relative to the debounce window.
    ///
    /// Rises from 0.0 to 1.0 while the index fingers are kept crossed (reaching 1.0 in the frame
    /// that confirms the pause), and drops back to 0.0 as soon as they are not. Meant for a
    /// progress indicator.
    pub fn pause_progress(&self) -> f32 {
        match self.crossed.latest() {
            Some(true) => self.crossed.progress(),
            _ => 0.0,
        }
    }

    /// How long the current finger count has been held, relative to the debounce window.
    ///
    /// 0.0 while no count is being read (no dominant hand, or the pause pose is shown).
    pub fn count_progress(&self) -> f32 {
        match self.fingers.latest() {
            Some(Some(_)) => self.fingers.progress(),
            _ => 0.0,
        }
    }
}

impl GestureClassifier {
    pub const DEFAULT_WINDOW: usize = 4;

    /// Creates a classifier that counts fingers on the hand picked by `selector`.
    ///
    /// # Panics
    ///
    /// This method panics if `window` is 0.
    pub fn new(selector: HandSelector, window: usize) -> Self {
        assert!(window > 0);
        Self {
            selector,
            counter: FingerCounter::default(),
            crossing: CrossingDetector::new(
                selector.min_confidence(),
                CrossingDetector::DEFAULT_MIN_WRIST_SEPARATION,
            ),
            window,
        }
    }

    pub fn with_finger_counter(self, counter: FingerCounter) -> Self {
        Self { counter, ..self }
    }

    pub fn with_crossing_detector(self, crossing: CrossingDetector) -> Self {
        Self { crossing, ..self }
    }

    /// Creates the state for a new stream.
    pub fn new_state(&self, mode: GestureMode) -> GestureState {
        GestureState {
            mode,
            fingers: Debouncer::new(self.window, None),
            crossed: Debouncer::new(self.window, false),
        }
    }

    /// Classifies one frame, returning the confirmed gesture changes it caused.
    ///
    /// While the crossing pose is detected or confirmed, finger counts are not reported: pausing
    /// takes precedence, and the fingers are not in a meaningful counting pose anyway.
    pub fn classify(&self, state: &mut GestureState, frame: &LandmarkFrame) -> GestureEvents {
        let mut events = GestureEvents::new();

        let crossing = self.crossing.detect(frame);
        let crossed_now = crossing.is_some_and(|c| c.crossed);
        if let Some(crossed) = state.crossed.push(crossed_now) {
            let kind = if crossed {
                GestureKind::Pause
            } else {
                GestureKind::Resume
            };
            log::debug!("confirmed {:?}", kind);
            events.push(GestureEvent {
                kind,
                confidence: crossing.map_or(0.0, |c| c.confidence),
            });
        }

        let hand = self.selector.select(frame);
        let count = if crossed_now || state.crossed.confirmed() {
            None
        } else {
            hand.map(|hand| self.counter.count(hand))
        };
        if let Some(Some(count)) = state.fingers.push(count) {
            let kind = GestureKind::from_count(state.mode, count);
            if kind != GestureKind::None {
                log::debug!("confirmed {:?}", kind);
                events.push(GestureEvent {
                    kind,
                    confidence: hand.map_or(0.0, |hand| hand.confidence()),
                });
            }
        }

        events
    }
}
