//! Arithmetic helpers shared by the overhead models and the report formatter

/// Calculate percentage safely for usize values, returning 0.0 if total is zero.
///
/// # Examples
/// ```
/// use rollup_compression_research::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// `value * rate` computed in floating point, truncated toward zero.
///
/// This is the proportional allowance used by the percentage overhead model.
/// The float-to-int cast truncates, so 1000 * 0.03 = 30 and 33 * 0.03 = 0.
/// Runs in `i128` so callers can add the share to any `u64` size. A NaN rate
/// yields 0; configuration rejects such rates before they get here.
///
/// # Examples
/// ```
/// use rollup_compression_research::utils::math::truncated_share;
///
/// assert_eq!(truncated_share(300, 0.03), 9);
/// assert_eq!(truncated_share(500, 0.04), 20);
/// assert_eq!(truncated_share(33, 0.03), 0);
/// ```
#[inline]
pub fn truncated_share(value: i128, rate: f64) -> i128 {
    (value as f64 * rate) as i128
}
