//! Configuration of a single analysis run

/// Default minimum number of common molecules for a pair to be scored
pub const DEFAULT_MIN_PAIRS: u64 = 4;
/// Default enrichment factor cutoff above which rows are reported
pub const DEFAULT_EF_CUTOFF: f64 = 3.0;
/// Default q-value cutoff below which rows are reported
pub const DEFAULT_QVALUE_CUTOFF: f64 = 1.0e-3;

/// Cutoffs and correction mode for one pipeline invocation
///
/// Every call to [`ef_analysis`](`crate::ef_analysis`) takes its own
/// `AnalysisConfig`; there are no shared mutable defaults.
///
/// # Examples
///
/// ```
/// use efa::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.min_pairs, 4);
/// assert!(!config.bonferroni);
///
/// let relaxed = AnalysisConfig {
///     qvalue_cutoff: 0.05,
///     ..AnalysisConfig::default()
/// };
/// assert_eq!(relaxed.ef_cutoff, 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Pairs with fewer common molecules are not scored
    pub min_pairs: u64,
    /// Rows with `EF <= ef_cutoff` are excluded from the report. With
    /// [`bonferroni`](`AnalysisConfig::bonferroni`) enabled, pairs with
    /// `EF < ef_cutoff` are additionally dropped before testing.
    pub ef_cutoff: f64,
    /// Rows with `q >= qvalue_cutoff` are excluded from the report
    pub qvalue_cutoff: f64,
    /// Use Bonferroni correction instead of Holm step-down. Saves memory
    /// at high EF cutoffs while still yielding stable q-values.
    pub bonferroni: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            min_pairs: DEFAULT_MIN_PAIRS,
            ef_cutoff: DEFAULT_EF_CUTOFF,
            qvalue_cutoff: DEFAULT_QVALUE_CUTOFF,
            bonferroni: false,
        }
    }
}
