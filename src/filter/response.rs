//! Rate-to-alpha response curves.

/// Maps the angular rate of the raw signal (in degrees per second) to a blend weight in
/// `[0.0, 1.0]`.
///
/// A weight of 0.0 selects the filter's minimum alpha (heavy smoothing), 1.0 selects its maximum
/// alpha (near-raw tracking). All curves are monotonically non-decreasing in the rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaResponse {
    /// Rises linearly from 0.0 at rest to 1.0 at `full_rate` and stays there.
    Linear { full_rate: f32 },
    /// Approaches 1.0 exponentially: `1 - exp(-rate / rate_constant)`.
    ///
    /// At `rate_constant` the weight is about 0.63.
    Saturating { rate_constant: f32 },
}

impl AlphaResponse {
    /// 10 degrees per frame at 60 FPS.
    pub const DEFAULT_FULL_RATE: f32 = 600.0;

    /// Returns whether the curve parameter is usable (finite and positive).
    pub fn is_valid(&self) -> bool {
        let p = match *self {
            AlphaResponse::Linear { full_rate } => full_rate,
            AlphaResponse::Saturating { rate_constant } => rate_constant,
        };
        p.is_finite() && p > 0.0
    }

    /// Computes the blend weight for an angular rate in degrees per second.
    ///
    /// Negative rates are treated like their absolute value.
    pub fn weight(&self, rate: f32) -> f32 {
        let rate = rate.abs();
        let w = match *self {
            AlphaResponse::Linear { full_rate } => rate / full_rate,
            AlphaResponse::Saturating { rate_constant } => 1.0 - (-rate / rate_constant).exp(),
        };
        if w.is_nan() {
            // Only reachable for NaN rates.
            0.0
        } else {
            w.clamp(0.0, 1.0)
        }
    }
}

impl Default for AlphaResponse {
    fn default() -> Self {
        AlphaResponse::Linear {
            full_rate: Self::DEFAULT_FULL_RATE,
        }
    }
}
