use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
    time::Duration,
};

use approx::assert_relative_eq;
use handpaddle::{
    angle,
    config::{Config, ConfigError},
    gesture::{GestureKind, GestureMode},
    landmark::{HandLandmarks, Handedness, LandmarkFrame, LandmarkIdx},
    pipeline::ControlStream,
    synth,
    telemetry::{TelemetryRecorder, HEADER},
};

const FRAME: Duration = Duration::from_micros(16_667);

fn frame(i: u32, hands: Vec<HandLandmarks>) -> LandmarkFrame {
    LandmarkFrame::new(hands, FRAME * i)
}

fn thumb(i: u32, angle: f32) -> LandmarkFrame {
    frame(i, vec![synth::pointing_thumb(Handedness::Right, angle, 0.9)])
}

fn stream(config: Config) -> ControlStream {
    ControlStream::new(&config).unwrap()
}

#[test]
fn out_of_range_angle_is_clamped() {
    let mut stream = stream(Config::default());
    let command = stream.process(&thumb(0, 50.0)).command.unwrap();
    assert_eq!(command.position, 0.0);
    assert!(command.clamped);

    stream.reset();
    let command = stream.process(&thumb(0, 300.0)).command.unwrap();
    assert_eq!(command.position, 1.0);
    assert!(command.clamped);
}

#[test]
fn jitter_is_smoothed() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut stream = stream(Config::default());

    let mut raw_motion = 0.0;
    let mut filtered_motion = 0.0;
    let mut prev: Option<(f32, f32)> = None;
    for i in 0..300 {
        let noisy = 175.0 + (rng.f32() - 0.5) * 4.0;
        let out = stream.process(&thumb(i, noisy));
        let raw = out.sample.raw_angle().unwrap();
        let filtered = out.filter.value.unwrap();
        if let Some((prev_raw, prev_filtered)) = prev {
            raw_motion += angle::shortest_distance(raw, prev_raw).abs();
            filtered_motion += angle::shortest_distance(filtered, prev_filtered).abs();
        }
        prev = Some((raw, filtered));
        assert!(out.filter.alpha < 0.6, "alpha {} at frame {i}", out.filter.alpha);
    }

    assert!(
        filtered_motion < raw_motion * 0.5,
        "filtered {filtered_motion}, raw {raw_motion}"
    );
    assert_relative_eq!(stream.filter_state().filtered_value().unwrap(), 175.0, epsilon = 1.5);
}

#[test]
fn fast_motion_is_followed() {
    let mut stream = stream(Config::default());
    for i in 0..10 {
        stream.process(&thumb(i, 110.0));
    }
    // A sudden 130° turn gets the largest coefficient.
    let out = stream.process(&thumb(10, 240.0));
    assert_relative_eq!(out.filter.alpha, 0.9, epsilon = 1e-4);
    assert!(out.filter.value.unwrap() > 220.0);
}

#[test]
fn crossing_the_seam() {
    let config = Config::default().angle_range(300.0, 60.0);
    let mut stream = stream(config);
    let angles = [340.0, 350.0, 0.0, 10.0, 20.0, 20.0, 20.0];
    for (i, &a) in angles.iter().enumerate() {
        let out = stream.process(&thumb(i as u32, a));
        let filtered = out.filter.value.unwrap();
        // The filtered value stays near the seam instead of cutting through 180°.
        assert!(
            angle::shortest_distance(filtered, a).abs() < 30.0,
            "frame {i}: raw {a}, filtered {filtered}"
        );
        assert!((0.0..360.0).contains(&filtered));
    }
}

#[test]
fn signal_loss_and_recovery() {
    let mut stream = stream(Config::default());
    stream.process(&thumb(0, 175.0));
    let held = stream.command();

    for i in 1..=15 {
        let out = stream.process(&frame(i, Vec::new()));
        assert!(!out.filter.signal_lost, "lost after {i} frames");
        assert_eq!(out.command, held);
    }
    let out = stream.process(&frame(16, Vec::new()));
    assert!(out.filter.signal_lost);
    assert!(stream.is_signal_lost());
    assert_eq!(out.command, held);

    let out = stream.process(&thumb(17, 180.0));
    assert!(!out.filter.signal_lost);
    assert_eq!(stream.filter_state().missed_frames(), 0);
}

#[test]
fn broken_landmark_does_not_poison_the_stream() {
    let mut stream = stream(Config::default());
    stream.process(&thumb(0, 175.0));

    let broken = synth::pointing_thumb(Handedness::Right, 175.0, 0.9)
        .with_landmark(LandmarkIdx::ThumbTip, [f32::NAN, 0.5]);
    let out = stream.process(&frame(1, vec![broken]));
    assert!(!out.sample.is_valid());

    let mut last = None;
    for i in 2..100 {
        last = stream.process(&thumb(i, 175.0)).command;
    }
    let command = last.unwrap();
    assert!((0.0..=1.0).contains(&command.position), "{command:?}");
    assert_relative_eq!(command.position, 0.5, epsilon = 1e-3);
}

#[test]
fn zero_alpha_floor_is_rejected() {
    let res = ControlStream::new(&Config::default().alpha_range(0.0, 0.9));
    assert!(matches!(res, Err(ConfigError::ZeroAlphaMin)));

    // The smallest usable floor still converges on a held angle.
    let mut stream = stream(Config::default().alpha_range(0.01, 0.9));
    stream.process(&thumb(0, 120.0));
    for i in 1..2000 {
        stream.process(&thumb(i, 200.0));
    }
    let filtered = stream.filter_state().filtered_value().unwrap();
    assert_relative_eq!(filtered, 200.0, epsilon = 1e-2);
}

#[test]
fn pause_progress_and_resume_confidence() {
    let mut stream = stream(Config::default().debounce_window(4));
    let mut progress = Vec::new();
    for i in 0..4 {
        stream.process(&frame(i, synth::crossed_index_fingers(0.9).to_vec()));
        progress.push(stream.gesture_state().pause_progress());
    }
    assert_eq!(progress, [0.25, 0.5, 0.75, 1.0]);

    let mut resume = None;
    for i in 4..8 {
        let out = stream.process(&frame(i, synth::parallel_index_fingers(0.7).to_vec()));
        assert_eq!(stream.gesture_state().pause_progress(), 0.0);
        resume = resume.or(out
            .events
            .iter()
            .find(|event| event.kind == GestureKind::Resume)
            .copied());
    }
    assert_eq!(resume.map(|event| event.confidence), Some(0.7));
}

#[test]
fn unconfident_hand_counts_as_missing() {
    let mut stream = stream(Config::default().signal_lost_after(2));
    for i in 0..3 {
        let weak = synth::pointing_thumb(Handedness::Right, 175.0, 0.2);
        let out = stream.process(&frame(i, vec![weak]));
        assert!(!out.sample.is_valid());
        assert_eq!(out.command, None);
    }
    assert!(stream.is_signal_lost());
}

#[test]
fn left_handed_player() {
    let mut left = stream(Config::default().dominant_hand(Handedness::Left));
    let mut right = stream(Config::default());
    // The left thumb pointing up and to the left is the mirror image of the right thumb pointing
    // up and to the right.
    let left_out = left.process(&frame(
        0,
        vec![synth::pointing_thumb(Handedness::Left, 150.0, 0.9)],
    ));
    let right_out = right.process(&thumb(0, 30.0));
    assert_relative_eq!(
        left_out.sample.raw_angle().unwrap(),
        right_out.sample.raw_angle().unwrap(),
        epsilon = 1e-3
    );

    // The right hand is ignored by a left-handed stream.
    left.reset();
    assert!(!left.process(&thumb(0, 30.0)).sample.is_valid());
}

#[test]
fn pause_takes_precedence_over_counting() {
    let mut stream = stream(Config::default().debounce_window(3));
    let mut kinds = Vec::new();
    for i in 0..8 {
        let out = stream.process(&frame(i, synth::crossed_index_fingers(0.9).to_vec()));
        kinds.extend(out.events.iter().map(|event| event.kind));
    }
    assert_eq!(kinds, [GestureKind::Pause]);
    assert!(stream.gesture_state().is_paused());

    for i in 8..16 {
        let out = stream.process(&frame(i, synth::parallel_index_fingers(0.9).to_vec()));
        kinds.extend(out.events.iter().map(|event| event.kind));
    }
    assert_eq!(
        kinds,
        [GestureKind::Pause, GestureKind::Resume, GestureKind::Navigate(1)]
    );
}

#[test]
fn answers_while_playing() {
    let config = Config::default()
        .gesture_mode(GestureMode::Answer)
        .debounce_window(4);
    let mut stream = stream(config);
    let readings = [2, 2, 2, 5, 2, 2, 2, 2, 0, 0, 0, 0];
    let kinds = readings
        .iter()
        .enumerate()
        .flat_map(|(i, &count)| {
            let hand = synth::counting_hand(Handedness::Right, count, 0.9);
            stream.process(&frame(i as u32, vec![hand])).events
        })
        .map(|event| event.kind)
        .collect::<Vec<_>>();
    assert_eq!(kinds, [GestureKind::Answer(2), GestureKind::Answer(0)]);
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn telemetry_rows() {
    let buf = SharedBuf::default();
    let recorder = TelemetryRecorder::spawn(buf.clone(), 64).unwrap();
    let mut stream = stream(Config::default()).with_telemetry(recorder);

    stream.process(&frame(0, Vec::new()));
    stream.process(&thumb(1, 175.0));
    stream.process(&frame(2, Vec::new()));

    let recorder = stream.take_telemetry().unwrap();
    assert_eq!(recorder.dropped(), 0);
    recorder.finish().unwrap();

    let contents = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], "0.000000,,,0.1500");

    let fields = lines[2].split(',').collect::<Vec<_>>();
    assert_eq!(fields[0], "0.016667");
    let raw: f32 = fields[1].parse().unwrap();
    assert_relative_eq!(raw, 175.0, epsilon = 1e-2);
    assert_eq!(fields[1], fields[2]);

    let fields = lines[3].split(',').collect::<Vec<_>>();
    assert_eq!(fields[1], "");
    assert_eq!(fields[2], lines[2].split(',').nth(2).unwrap());
}
