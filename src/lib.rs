//! Compute enrichment factors and q-values for target-ADR associations
//!
//! `efa` correlates predicted drug targets with observed adverse drug
//! reactions (ADRs). It reads two tables, one mapping molecules to events
//! and one mapping molecules to predicted targets, and scores every
//! (target, event) pair:
//!
//! - an enrichment factor `EF = p * P / (E * T)` measuring how much more
//!   often the pair co-occurs via shared molecules than expected by chance
//! - a chi-squared contingency-test p-value
//! - a q-value corrected for multiple testing (Holm step-down by default,
//!   Bonferroni on request)
//!
//! The pipeline runs strictly forward through six stages: association
//! index, marginal sums, enrichment scoring, contingency tables,
//! significance correction and report filtering. See [`ef_analysis`] for
//! the entry point.
//!
//! # Examples
//!
//! ```
//! use efa::parser::{EventRecord, ResultRecord};
//! use efa::{ef_analysis, AnalysisConfig};
//!
//! let events = vec![
//!     EventRecord::new("m1", "nausea"),
//!     EventRecord::new("m2", "nausea"),
//!     EventRecord::new("m2", "rash"),
//!     EventRecord::new("m3", "rash"),
//! ];
//! let results = vec![
//!     ResultRecord::new("m1", "P08908", "5-HT1A", "serotonin receptor"),
//!     ResultRecord::new("m2", "P08908", "5-HT1A", "serotonin receptor"),
//!     ResultRecord::new("m2", "Q12809", "HERG", "potassium channel"),
//!     ResultRecord::new("m3", "Q12809", "HERG", "potassium channel"),
//! ];
//!
//! let config = AnalysisConfig {
//!     min_pairs: 1,
//!     ef_cutoff: 1.0,
//!     qvalue_cutoff: 1.5,
//!     ..AnalysisConfig::default()
//! };
//!
//! let mut out = Vec::new();
//! let written = ef_analysis(&events, &results, &config, &mut out).unwrap();
//! // two pairs clear EF > 1.0: (P08908, nausea) and (Q12809, rash)
//! assert_eq!(written, 2);
//! ```

use thiserror::Error;

pub mod associations;
pub mod config;
pub mod parser;
mod pipeline;
pub mod report;
pub mod stats;

pub use config::AnalysisConfig;
pub use pipeline::ef_analysis;

/// Error type for all fallible operations of this crate
#[derive(Error, Debug)]
pub enum EfaError {
    /// Input or output file could not be read or written
    #[error("unable to access file: {0}")]
    Io(#[from] std::io::Error),
    /// A table could not be parsed as CSV
    #[error("unable to parse CSV input: {0}")]
    Csv(#[from] csv::Error),
    /// A data row is missing required columns
    #[error("row {row} has {found} fields, expected at least {expected}")]
    MalformedRow {
        /// 1-based row number within the input table
        row: u64,
        /// number of fields the table requires
        expected: usize,
        /// number of fields actually present
        found: usize,
    },
    /// The inverted event and target maps disagree about which molecules
    /// exist. This indicates a pruning bug and aborts the run.
    #[error(
        "inverted event and target maps have different molecule sets \
         ({events} event molecules vs {targets} target molecules)"
    )]
    InconsistentAssociations {
        /// number of molecules with at least one event
        events: usize,
        /// number of molecules with at least one target
        targets: usize,
    },
    /// A contingency table has a zero row or column marginal, so the
    /// expected frequencies are undefined
    #[error("contingency table has a zero marginal, expected frequencies are undefined")]
    DegenerateTable,
    /// An invalid parameter was passed to a statistical distribution
    #[error("invalid distribution parameter: {0}")]
    Stats(#[from] statrs::StatsError),
}

/// Result type alias using [`EfaError`]
pub type EfaResult<T> = Result<T, EfaError>;

/// We frequently divide integer counts and need `f64` results. To ensure
/// some kind of safety this method panics instead of silently losing
/// precision on counts that exceed `u32`.
pub(crate) fn f64_from_u64(n: u64) -> f64 {
    let intermediate: u32 = n
        .try_into()
        .expect("cannot safely create f64 from large u64");
    intermediate.into()
}
