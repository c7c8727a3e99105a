//! Chi-squared test of independence for 2x2 contingency tables
//!
//! Expected frequencies are derived from the row and column marginals;
//! the statistic uses Yates' continuity correction, which is the standard
//! handling for a single degree of freedom: each observed count moves
//! toward its expectation by at most 0.5 before squaring.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::stats::contingency::ContingencyTable;
use crate::{f64_from_u64, EfaError, EfaResult};

/// The p-value of the independence test for one 2x2 table
///
/// # Errors
///
/// [`EfaError::DegenerateTable`] if a row or column marginal is zero, in
/// which case the expected frequencies are undefined.
///
/// # Examples
///
/// ```
/// use efa::stats::chi2::contingency_pvalue;
/// use efa::stats::contingency::ContingencyTable;
///
/// // perfectly independent cells give p = 1
/// let table = ContingencyTable::new(10, 10, 10, 10);
/// let pvalue = contingency_pvalue(&table).unwrap();
/// assert!((pvalue - 1.0).abs() < 1e-12);
/// ```
pub fn contingency_pvalue(table: &ContingencyTable) -> EfaResult<f64> {
    let rows = table.row_totals();
    let columns = table.column_totals();
    if rows.contains(&0) || columns.contains(&0) {
        return Err(EfaError::DegenerateTable);
    }

    let total = f64_from_u64(table.total());
    let observed = table.cells();
    let mut statistic = 0.0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &cell) in row.iter().enumerate() {
            let expected = f64_from_u64(rows[i]) * f64_from_u64(columns[j]) / total;
            let shift = (f64_from_u64(cell) - expected).abs() - 0.5;
            statistic += shift.max(0.0).powi(2) / expected;
        }
    }

    let distribution = ChiSquared::new(1.0)?;
    Ok(distribution.sf(statistic))
}
