//! Personal-power scaling for risky actions.
use crate::constants::{POWER_HALF_SCALE, POWER_MULTIPLIER_CEILING};

/// Bonus multiplier applied to risky success chances as
/// `base * (1 + risk_multiplier(pp))`.
///
/// Zero at `pp = 0`, strictly increasing, and strictly below `0.75` for
/// every representable input.
#[must_use]
pub fn risk_multiplier(personal_power: u32) -> f64 {
    let scaled = f64::from(personal_power) / POWER_HALF_SCALE;
    POWER_MULTIPLIER_CEILING * (1.0 - 1.0 / (1.0 + scaled))
}

/// Apply the power bonus to a base success probability.
#[must_use]
pub fn boosted_chance(base: f64, personal_power: u32) -> f64 {
    base * (1.0 + risk_multiplier(personal_power))
}
