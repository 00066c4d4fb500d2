use crate::models::Range;

/// Fraction of the range width over which credit decays to zero outside it
pub const TOLERANCE_FRACTION: f64 = 0.5;

/// Tolerant range score on [0, max_score]
///
/// Full credit inside `range` (inclusive). Outside, credit falls linearly and
/// reaches 0 once the distance to the nearest bound equals half the range width.
pub fn soft_range_score(value: f64, range: &Range, max_score: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if range.contains(value) {
        return max_score;
    }

    let deviation = if value < range.min {
        range.min - value
    } else {
        value - range.max
    };
    let tolerance = range.width() * TOLERANCE_FRACTION;
    if tolerance <= 0.0 {
        return 0.0;
    }

    (max_score * (1.0 - deviation / tolerance)).max(0.0)
}

/// Linear penalty from a target value, used by the strict profile
pub fn linear_error_score(value: f64, target: f64, max_score: f64, divisor: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (max_score - (value - target).abs() / divisor).max(0.0)
}
