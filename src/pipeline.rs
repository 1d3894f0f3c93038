//! Per-player processing of landmark frames.
//!
//! A [`ControlStream`] owns the state of one player: it runs the angle estimator, the adaptive
//! filter, the control mapper and the gesture classifier on every frame, in that order, and
//! completes all of them before the next frame is accepted.
//!
//! Streams share nothing with each other. Several players are handled by creating one stream per
//! player.

use crate::{
    config::{Config, ConfigError},
    estimator::{AngleEstimator, AngleSample},
    filter::{AdaptiveFilter, FilterState, FilterStatus},
    gesture::{GestureClassifier, GestureEvents, GestureMode, GestureState},
    landmark::LandmarkFrame,
    mapper::{ControlMapper, PaddleCommand},
    telemetry::{TelemetryRecord, TelemetryRecorder},
};

/// Everything a single frame produced.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Raw angle measured in the frame.
    pub sample: AngleSample,
    /// Filter output after this frame.
    pub filter: FilterStatus,
    /// Paddle command, `None` until the dominant hand has been seen once.
    ///
    /// While no hand is visible, the last known position is held.
    pub command: Option<PaddleCommand>,
    /// Gesture changes confirmed by this frame.
    pub events: GestureEvents,
}

/// The control pipeline of one player.
pub struct ControlStream {
    estimator: AngleEstimator,
    filter: AdaptiveFilter,
    mapper: ControlMapper,
    classifier: GestureClassifier,
    filter_state: FilterState,
    gesture_state: GestureState,
    telemetry: Option<TelemetryRecorder>,
}

impl ControlStream {
    /// Creates a stream from a configuration, checking it first.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let filter = config.filter();
        let classifier = config.classifier();
        Ok(Self {
            estimator: config.estimator(),
            filter_state: filter.new_state(),
            gesture_state: classifier.new_state(config.initial_gesture_mode()),
            filter,
            mapper: config.mapper(),
            classifier,
            telemetry: None,
        })
    }

    /// Records the raw and filtered angle of every processed frame.
    pub fn with_telemetry(self, recorder: TelemetryRecorder) -> Self {
        Self {
            telemetry: Some(recorder),
            ..self
        }
    }

    /// Detaches and returns the telemetry recorder, if any.
    pub fn take_telemetry(&mut self) -> Option<TelemetryRecorder> {
        self.telemetry.take()
    }

    /// Processes one frame.
    ///
    /// Frames are expected in capture order. Frames without a usable hand are fine: the paddle is
    /// held in place, and after enough of them [`FilterStatus::signal_lost`] is set.
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameOutput {
        let sample = self.estimator.estimate(frame);
        let status = self.filter.filter(&mut self.filter_state, &sample);
        let command = status.value.map(|angle| self.mapper.map(angle));
        let events = self.classifier.classify(&mut self.gesture_state, frame);

        if let Some(telemetry) = &mut self.telemetry {
            telemetry.record(TelemetryRecord {
                timestamp: sample.timestamp(),
                raw_angle: sample.raw_angle(),
                filtered_angle: status.value,
                alpha: status.alpha,
            });
        }

        FrameOutput {
            sample,
            filter: status,
            command,
            events,
        }
    }

    /// The paddle command for the most recently processed frame.
    ///
    /// For consumers that poll at their own rate instead of handling every [`FrameOutput`].
    pub fn command(&self) -> Option<PaddleCommand> {
        self.filter_state
            .filtered_value()
            .map(|angle| self.mapper.map(angle))
    }

    #[inline]
    pub fn is_signal_lost(&self) -> bool {
        self.filter_state.is_signal_lost()
    }

    #[inline]
    pub fn gesture_mode(&self) -> GestureMode {
        self.gesture_state.mode()
    }

    /// Switches between menu navigation and answering.
    pub fn set_gesture_mode(&mut self, mode: GestureMode) {
        self.gesture_state.set_mode(mode);
    }

    #[inline]
    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    #[inline]
    pub fn gesture_state(&self) -> &GestureState {
        &self.gesture_state
    }

    /// Forgets all history, as if the stream had just been created.
    ///
    /// The gesture mode is kept.
    pub fn reset(&mut self) {
        self.filter.reset(&mut self.filter_state);
        self.gesture_state = self.classifier.new_state(self.gesture_state.mode());
    }
}
