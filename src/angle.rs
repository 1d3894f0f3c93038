//! Circular angle arithmetic.
//!
//! All angles in this crate are in degrees. Angles are circular: 359° and 1° are 2° apart, not
//! 358°. Anything that compares or blends two angles must go through the helpers in this module
//! instead of using plain subtraction.

/// Normalizes `deg` into the range `[0, 360)`.
pub fn normalize(deg: f32) -> f32 {
    let n = deg.rem_euclid(360.0);
    // `rem_euclid` can round up to exactly 360.0 for tiny negative inputs.
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// Returns the signed shortest angular distance to go from `from` to `to`.
///
/// The result lies in `[-180, 180)`. A positive value means `to` is reached by turning
/// counter-clockwise (increasing angle) from `from`.
pub fn shortest_distance(to: f32, from: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d >= 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Blends `from` towards `to` along the shortest arc.
///
/// `t = 0.0` returns `from`, `t = 1.0` returns `to` (both normalized). This is the wrap-aware
/// equivalent of `t * to + (1.0 - t) * from`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    normalize(from + t * shortest_distance(to, from))
}
