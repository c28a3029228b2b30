//! Rounding and missing-aware statistics.

/// Rounds to `digits` decimal places, ties to even.
///
/// Output tables are rounded this way so that `0.125` becomes `0.12`, the
/// same result NumPy rounding gives.
pub fn round_half_even(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round_ties_even() / factor
}

/// Rounds an optional value, keeping `None` as is.
pub fn round_option(value: Option<f64>, digits: u32) -> Option<f64> {
    value.map(|v| round_half_even(v, digits))
}

/// Unweighted mean of the present values.
///
/// Returns `None` when no value is present, never a division by zero.
pub fn mean_of<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
