//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u8 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u8, f64>(u8::MAX).unwrap_or(255.0);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u8>(clamped).unwrap_or(0)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Rounded percentage of `part` over `whole`, clamped to `0..=100`.
///
/// `whole` is floored at 1 so an empty denominator yields 0 instead of NaN.
#[must_use]
pub fn percent_of(part: usize, whole: usize) -> u8 {
    let ratio = count_to_f64(part) / count_to_f64(whole.max(1));
    round_f64_to_u8(ratio * 100.0).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounder_handles_nan_and_range() {
        assert_eq!(round_f64_to_u8(f64::NAN), 0);
        assert_eq!(round_f64_to_u8(-4.0), 0);
        assert_eq!(round_f64_to_u8(1_000.0), u8::MAX);
        assert_eq!(round_f64_to_u8(66.5), 67);
    }

    #[test]
    fn percent_guards_zero_denominator() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(3, 0), 100);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(9, 4), 100);
    }
}
