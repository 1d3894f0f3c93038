//! Turns noisy hand landmarks into a smooth paddle control signal and debounced gesture events.
//!
//! Frames of hand landmarks (from any hand tracker) are fed into a [`pipeline::ControlStream`],
//! which produces a normalized paddle position and confirmed gesture changes for each frame.

use log::LevelFilter;

pub mod angle;
pub mod config;
pub mod estimator;
pub mod filter;
pub mod gesture;
pub mod landmark;
pub mod mapper;
pub mod pipeline;
pub mod synth;
pub mod telemetry;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library log at *debug* level. `RUST_LOG` overrides the defaults.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
