//! Replays a synthetic session through a control stream and logs what it produces.
//!
//! Usage: `handpaddle [telemetry.csv]`

use std::{env, time::Duration};

use anyhow::Context;
use handpaddle::{
    config::Config,
    gesture::GestureMode,
    landmark::{HandLandmarks, Handedness, LandmarkFrame},
    pipeline::ControlStream,
    synth,
    telemetry::TelemetryRecorder,
};

const FPS: u32 = 60;
const FRAME: Duration = Duration::from_micros(1_000_000 / FPS as u64);

fn main() -> anyhow::Result<()> {
    handpaddle::init_logger!();

    let config = Config::default();
    let mut stream = ControlStream::new(&config).context("invalid configuration")?;
    if let Some(path) = env::args_os().nth(1) {
        let recorder = TelemetryRecorder::create(&path)
            .with_context(|| format!("failed to create {}", path.to_string_lossy()))?;
        stream = stream.with_telemetry(recorder);
    }

    let mut frames = session().enumerate().peekable();
    while let Some((i, hands)) = frames.next() {
        // Switch to answering once the menu section of the session is over.
        if i == ANSWER_START {
            stream.set_gesture_mode(GestureMode::Answer);
        }

        let frame = LandmarkFrame::new(hands, FRAME * i as u32);
        let out = stream.process(&frame);
        for event in out.events {
            log::info!(
                "t={:.3}s {:?} (confidence {:.2})",
                frame.timestamp().as_secs_f32(),
                event.kind,
                event.confidence,
            );
        }
        if i % 30 == 0 || frames.peek().is_none() {
            match out.command {
                Some(command) => log::info!(
                    "t={:.3}s raw={:?} filtered={:?} alpha={:.2} paddle={:.3}{}",
                    frame.timestamp().as_secs_f32(),
                    out.sample.raw_angle(),
                    out.filter.value,
                    out.filter.alpha,
                    command.position,
                    if command.clamped { " (clamped)" } else { "" },
                ),
                None => log::info!("t={:.3}s no hand yet", frame.timestamp().as_secs_f32()),
            }
        }
    }

    if let Some(recorder) = stream.take_telemetry() {
        let dropped = recorder.dropped();
        recorder.finish().context("failed to write telemetry")?;
        log::info!("telemetry written ({dropped} rows dropped)");
    }

    Ok(())
}

const SWEEP_FRAMES: usize = 4 * FPS as usize;
const GAP_FRAMES: usize = 30;
const PAUSE_FRAMES: usize = 40;
const COUNT_FRAMES: usize = 20;
const ANSWER_START: usize = SWEEP_FRAMES + GAP_FRAMES + 2 * PAUSE_FRAMES + 3 * COUNT_FRAMES;

/// The hands visible in every frame of the session.
///
/// 1. The thumb sweeps from 60° to 290° and back, with a little jitter.
/// 2. The hand leaves the camera view for half a second.
/// 3. The index fingers are crossed (pause), then uncrossed.
/// 4. 1, 2 and 3 fingers are shown for menu navigation.
/// 5. 4 fingers are shown as an answer.
fn session() -> impl Iterator<Item = Vec<HandLandmarks>> {
    let sweep = (0..SWEEP_FRAMES).map(|i| {
        let t = i as f32 / SWEEP_FRAMES as f32;
        let base = 175.0 - 115.0 * (t * std::f32::consts::TAU).cos();
        let jitter = 1.5 * (i as f32 * 2.7).sin();
        vec![synth::pointing_thumb(Handedness::Right, base + jitter, 0.9)]
    });
    let gap = (0..GAP_FRAMES).map(|_| Vec::new());
    let pause = (0..PAUSE_FRAMES).map(|_| synth::crossed_index_fingers(0.85).to_vec());
    let resume = (0..PAUSE_FRAMES).map(|_| synth::parallel_index_fingers(0.85).to_vec());
    let menu = (1..=3).flat_map(|count| {
        (0..COUNT_FRAMES).map(move |_| vec![synth::counting_hand(Handedness::Right, count, 0.9)])
    });
    let answer =
        (0..COUNT_FRAMES).map(|_| vec![synth::counting_hand(Handedness::Right, 4, 0.9)]);

    sweep
        .chain(gap)
        .chain(pause)
        .chain(resume)
        .chain(menu)
        .chain(answer)
}
