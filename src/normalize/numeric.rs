//! Numeric normalization for stat values.

/// Decimal precision for percentage and rate statistics.
const STAT_SCALE: f64 = 1_000.0;

/// Bounds of the store's fixed-precision numeric columns.
const STAT_RANGE: f64 = 9_999_999.999;

/// Round a statistic to 3 decimals and clamp it into the representable
/// range of the storage columns. Applied to every numeric stat value on the
/// way into the store; integral counts pass through unchanged.
pub fn round_stat(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    ((value * STAT_SCALE).round() / STAT_SCALE).clamp(-STAT_RANGE, STAT_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_three_decimals() {
        assert_eq!(round_stat(0.123_456), 0.123);
        assert_eq!(round_stat(0.499_5), 0.5);
        assert_eq!(round_stat(12.0), 12.0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(round_stat(1e12), STAT_RANGE);
        assert_eq!(round_stat(-1e12), -STAT_RANGE);
    }

    #[test]
    fn non_finite_values_become_zero() {
        assert_eq!(round_stat(f64::NAN), 0.0);
        assert_eq!(round_stat(f64::INFINITY), 0.0);
    }
}
