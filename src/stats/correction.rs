//! Multiple-hypothesis-testing corrections
//!
//! Only the two corrections of the analysis pipeline are provided: Holm's
//! step-down procedure, applied across the full p-value family, and the
//! Bonferroni scaling used when memory forces pre-filtering.

/// Holm step-down adjusted p-values, in the input's order
///
/// P-values are ranked ascending; rank `i` (0-based, family size `n`) is
/// scaled by `n - i`, adjusted values are made monotonically
/// non-decreasing along the ranking and clipped at 1. Every adjusted
/// value is therefore at least its raw p-value.
///
/// # Examples
///
/// ```
/// use efa::stats::correction::holm;
///
/// let adjusted = holm(&[0.01, 0.04, 0.03, 0.02]);
/// for (adjusted, expected) in adjusted.iter().zip([0.04, 0.06, 0.06, 0.06]) {
///     assert!((adjusted - expected).abs() < 1e-12);
/// }
/// ```
///
/// # Panics
///
/// If any p-value is NaN.
pub fn holm(pvalues: &[f64]) -> Vec<f64> {
    let n = pvalues.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        pvalues[a]
            .partial_cmp(&pvalues[b])
            .expect("p-values must not be NaN")
    });

    let mut adjusted = vec![0.0; n];
    let mut running_max = 0.0f64;
    for (rank, &index) in order.iter().enumerate() {
        let scaled = (n - rank) as f64 * pvalues[index];
        running_max = running_max.max(scaled);
        adjusted[index] = running_max.min(1.0);
    }
    adjusted
}

/// Bonferroni-scaled q-values: `p * count`, in the input's order
///
/// The scaling is intentionally not clipped to `[0, 1]`; callers must
/// allow `q > 1`. `count` is the full family size, which may exceed
/// `pvalues.len()` when pairs were pre-filtered before testing.
pub fn bonferroni(pvalues: &[f64], count: usize) -> Vec<f64> {
    pvalues.iter().map(|pvalue| pvalue * count as f64).collect()
}
