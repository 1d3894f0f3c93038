//! Smoothing of the raw angle stream.
//!
//! Filters in this module are split into an immutable parameter type (eg. [`AdaptiveFilter`]) and
//! a separate state type (eg. [`FilterState`]). One parameter set can drive any number of
//! independent streams, each owning its own state.

mod adaptive;
mod response;

pub use adaptive::{AdaptiveFilter, FilterState, FilterStatus};
pub use response::AlphaResponse;
