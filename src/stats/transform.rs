//! Logit transform for percentage outcomes

/// Log-odds of a proportion: `ln(p / (1 - p))`
///
/// Infinite at 0 and 1, NaN outside `[0, 1]`.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Log-odds of a percentage value, `logit(value / 100)`.
///
/// Returns `None` when the result would not be finite, i.e. for values at or
/// beyond 0 and 100.
pub fn logit_percent(value: f64) -> Option<f64> {
    if value > 0.0 && value < 100.0 {
        let transformed = logit(value / 100.0);
        transformed.is_finite().then_some(transformed)
    } else {
        None
    }
}
