//! Exponential moving average with a rate-dependent coefficient.

use std::time::Duration;

use crate::{angle, estimator::AngleSample};

use super::AlphaResponse;

/// Lower bound for the time between two samples, in seconds.
///
/// Protects the rate computation against duplicate or out-of-order timestamps.
const MIN_ELAPSED: f32 = 1e-3;

/// An Exponential Moving Average (EMA) filter for angles whose smoothing coefficient adapts to how
/// fast the raw angle is changing.
///
/// When the hand is (nearly) still, the coefficient stays close to `alpha_min`, which heavily
/// smoothes optical jitter. Fast, deliberate motion pushes it towards `alpha_max`, so the filtered
/// value follows the raw value with little lag.
///
/// Blending is done along the shortest arc, so crossing the 0°/360° seam does not cause a jump.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveFilter {
    alpha_min: f32,
    alpha_max: f32,
    response: AlphaResponse,
    signal_lost_after: u32,
}

/// Per-stream state of an [`AdaptiveFilter`].
///
/// Create one with [`AdaptiveFilter::new_state`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    filtered: Option<f32>,
    previous_raw: Option<f32>,
    previous_timestamp: Duration,
    alpha: f32,
    missed_frames: u32,
    signal_lost: bool,
}

impl FilterState {
    /// The current filtered angle, defined once the first valid sample has been processed.
    #[inline]
    pub fn filtered_value(&self) -> Option<f32> {
        self.filtered
    }

    /// The smoothing coefficient used for the most recent update.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of consecutive invalid samples.
    #[inline]
    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }

    #[inline]
    pub fn is_signal_lost(&self) -> bool {
        self.signal_lost
    }
}

/// Result of pushing one sample through an [`AdaptiveFilter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStatus {
    /// Filtered angle in `[0, 360)`, `None` until the first valid sample.
    pub value: Option<f32>,
    pub alpha: f32,
    /// Whether the stream has gone without a valid sample for longer than the tolerance.
    pub signal_lost: bool,
}

impl AdaptiveFilter {
    pub const DEFAULT_ALPHA_MIN: f32 = 0.15;
    pub const DEFAULT_ALPHA_MAX: f32 = 0.9;
    pub const DEFAULT_SIGNAL_LOST_AFTER: u32 = 15;

    /// Creates a new set of adaptive filter parameters.
    ///
    /// # Panics
    ///
    /// This method panics if `alpha_min` is not in `(0.0, 1.0]`, if `alpha_max` is not between 0.0
    /// and 1.0, if `alpha_min > alpha_max`, or if `response` has an unusable parameter.
    ///
    /// A zero `alpha_min` would freeze the filter as soon as the hand holds still.
    pub fn new(alpha_min: f32, alpha_max: f32, response: AlphaResponse) -> Self {
        assert!(alpha_min > 0.0 && alpha_min <= 1.0);
        assert!((0.0..=1.0).contains(&alpha_max));
        assert!(alpha_min <= alpha_max);
        assert!(response.is_valid());
        Self {
            alpha_min,
            alpha_max,
            response,
            signal_lost_after: Self::DEFAULT_SIGNAL_LOST_AFTER,
        }
    }

    /// Returns a copy of `self` that reports signal loss after more than `frames` consecutive
    /// invalid samples.
    pub fn with_signal_lost_after(self, frames: u32) -> Self {
        Self {
            signal_lost_after: frames,
            ..self
        }
    }

    #[inline]
    pub fn alpha_min(&self) -> f32 {
        self.alpha_min
    }

    #[inline]
    pub fn alpha_max(&self) -> f32 {
        self.alpha_max
    }

    /// Creates the state for a new, empty stream.
    pub fn new_state(&self) -> FilterState {
        FilterState {
            filtered: None,
            previous_raw: None,
            previous_timestamp: Duration::ZERO,
            alpha: self.alpha_min,
            missed_frames: 0,
            signal_lost: false,
        }
    }

    /// Resets `state` to be identical to a freshly created one.
    pub fn reset(&self, state: &mut FilterState) {
        *state = self.new_state();
    }

    /// Maps an angular rate (degrees per second) to the smoothing coefficient.
    ///
    /// The result is always in `[alpha_min, alpha_max]` and never decreases as `rate` grows.
    pub fn alpha_for_rate(&self, rate: f32) -> f32 {
        let span = self.alpha_max - self.alpha_min;
        (self.alpha_min + span * self.response.weight(rate)).clamp(self.alpha_min, self.alpha_max)
    }

    /// Pushes one sample into the filter, updating `state`.
    pub fn filter(&self, state: &mut FilterState, sample: &AngleSample) -> FilterStatus {
        match sample.raw_angle() {
            None => self.hold(state),
            Some(raw) => self.update(state, raw, sample.timestamp()),
        }

        FilterStatus {
            value: state.filtered,
            alpha: state.alpha,
            signal_lost: state.signal_lost,
        }
    }

    fn hold(&self, state: &mut FilterState) {
        state.missed_frames = state.missed_frames.saturating_add(1);
        if !state.signal_lost && state.missed_frames > self.signal_lost_after {
            log::warn!(
                "control signal lost ({} frames without a usable hand)",
                state.missed_frames
            );
            state.signal_lost = true;
        }
    }

    fn update(&self, state: &mut FilterState, raw: f32, timestamp: Duration) {
        if state.signal_lost {
            log::info!(
                "control signal reacquired after {} frames",
                state.missed_frames
            );
        }
        state.missed_frames = 0;
        state.signal_lost = false;

        let (Some(previous_raw), Some(filtered)) = (state.previous_raw, state.filtered) else {
            state.filtered = Some(raw);
            state.alpha = self.alpha_min;
            state.previous_raw = Some(raw);
            state.previous_timestamp = timestamp;
            return;
        };

        let delta = angle::shortest_distance(raw, previous_raw);
        let elapsed = timestamp
            .saturating_sub(state.previous_timestamp)
            .as_secs_f32()
            .max(MIN_ELAPSED);
        let rate = delta.abs() / elapsed;

        state.alpha = self.alpha_for_rate(rate);
        state.filtered = Some(angle::lerp(filtered, raw, state.alpha));
        state.previous_raw = Some(raw);
        state.previous_timestamp = timestamp;
    }
}

impl Default for AdaptiveFilter {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ALPHA_MIN,
            Self::DEFAULT_ALPHA_MAX,
            AlphaResponse::default(),
        )
    }
}
