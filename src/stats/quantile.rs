//! Empirical quantiles
//!
//! Uses linear interpolation between the closest ranks, the same rule
//! spreadsheet and dataframe tools apply by default. NaN values are skipped.

/// Empirical quantile `q` (0.0..=1.0) of `values`.
///
/// Returns `None` when there are no finite values or `q` is outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let sorted = sorted_finite(values);
    quantile_sorted(&sorted, q)
}

/// The `q` and `1 - q` quantiles of `values`, lowest first.
pub fn quantile_range(values: &[f64], q: f64) -> Option<(f64, f64)> {
    let sorted = sorted_finite(values);
    let low = quantile_sorted(&sorted, q)?;
    let high = quantile_sorted(&sorted, 1.0 - q)?;
    if low <= high {
        Some((low, high))
    } else {
        Some((high, low))
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let fraction = position - lower as f64;

    match sorted.get(lower + 1) {
        Some(&upper) if fraction > 0.0 => Some(sorted[lower] + fraction * (upper - sorted[lower])),
        _ => Some(sorted[lower]),
    }
}
