//! Rating derivation and decimal rounding.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Last production year a ship can have; ratings are measured against it.
pub const CURRENT_YEAR: i32 = 3019;

/// Round `value` to `scale` decimal places using round-half-to-even.
///
/// The value goes through its shortest decimal representation first, so
/// `0.125` rounds to `0.12` rather than whatever the nearest binary fraction
/// would suggest. Returns `None` for non-finite values or values too large
/// for a decimal.
pub fn round_half_even(value: f64, scale: u32) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()?
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
        .to_f64()
}

/// Derive a ship rating from its speed, used flag, and production year.
///
/// Inputs are expected to have passed validation, so `prod_year` never
/// exceeds [`CURRENT_YEAR`].
pub fn rating(speed: f64, is_used: bool, prod_year: i32) -> f64 {
    let wear = if is_used { 0.5 } else { 1.0 };
    let age = f64::from(CURRENT_YEAR - prod_year + 1);
    let raw = (80.0 * speed * wear) / age;
    round_half_even(raw, 2).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::{rating, round_half_even};

    #[test]
    fn rounds_midpoints_to_even_neighbour() {
        assert_eq!(round_half_even(0.125, 2), Some(0.12));
        assert_eq!(round_half_even(0.135, 2), Some(0.14));
        assert_eq!(round_half_even(0.005, 2), Some(0.0));
        assert_eq!(round_half_even(0.015, 2), Some(0.02));
        assert_eq!(round_half_even(0.995, 2), Some(1.0));
    }

    #[test]
    fn rounds_non_midpoints_normally() {
        assert_eq!(round_half_even(0.126, 2), Some(0.13));
        assert_eq!(round_half_even(0.0051, 2), Some(0.01));
        assert_eq!(round_half_even(0.5, 2), Some(0.5));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(round_half_even(f64::NAN, 2), None);
        assert_eq!(round_half_even(f64::INFINITY, 2), None);
    }

    #[test]
    fn new_ship_rating_uses_full_speed() {
        // 80 * 0.5 / 120
        assert_eq!(rating(0.5, false, 2900), 0.33);
    }

    #[test]
    fn used_ship_rating_is_halved() {
        assert_eq!(rating(0.8, true, 3019), 32.0);
        assert_eq!(rating(0.8, false, 3019), 64.0);
    }

    #[test]
    fn older_ships_rate_lower() {
        assert!(rating(0.5, false, 2800) < rating(0.5, false, 3000));
        // 80 * 0.99 / 220
        assert_eq!(rating(0.99, false, 2800), 0.36);
    }
}
