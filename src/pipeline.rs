//! The end-to-end analysis pipeline
//!
//! Data flows strictly forward: association index, marginal sums,
//! enrichment scoring, contingency tables, significance correction,
//! report filter. No stage mutates a predecessor's output after handoff,
//! and the whole run is a single-threaded batch computation.

use std::io::Write;

use tracing::info;

use crate::associations::{EventMap, TargetMap};
use crate::config::AnalysisConfig;
use crate::parser::{EventRecord, ResultRecord};
use crate::report::write_report;
use crate::stats::contingency::build_tables;
use crate::stats::enrichment::EnrichmentTable;
use crate::stats::{MarginalSums, Significance};
use crate::EfaResult;

/// Computes enrichment factors and q-values and writes the report
///
/// Returns the number of data rows written. In Bonferroni mode the
/// enrichment table is pre-filtered with the EF cutoff before the
/// contingency stage, and the correction count is the number of scored
/// pairs *before* that filter.
///
/// # Errors
///
/// Fails on the marginal-sum consistency violation, on degenerate
/// contingency tables and on report I/O errors. Arithmetic degeneracy
/// inside the EF scan is recovered locally and never surfaces here.
pub fn ef_analysis<W: Write>(
    event_records: &[EventRecord],
    result_records: &[ResultRecord],
    config: &AnalysisConfig,
    out: W,
) -> EfaResult<usize> {
    info!("Using min-pairs cutoff = {}", config.min_pairs);
    info!("Using EF cutoff = {:.2}", config.ef_cutoff);
    info!("Using q-value cutoff = {}", config.qvalue_cutoff);

    let mut events = EventMap::from_pairs(
        event_records
            .iter()
            .map(|record| (record.molecule().clone(), record.event().clone())),
    );
    let has_event = events.molecules();
    info!("Mapped {} events to {} molecules", events.len(), has_event.len());

    let (targets, rejects) = TargetMap::from_rows(
        result_records
            .iter()
            .map(|record| (record.molecule().clone(), record.target().clone(), record.info())),
        &has_event,
    );
    info!("Skipped {rejects} target molecules that were not mapped to events");
    info!(
        "Mapped {} targets to {} molecules",
        targets.len(),
        targets.molecules().len()
    );

    let pruned = events.prune(&targets.molecules());
    info!("Pruned {pruned} event molecules that were not mapped to targets");

    let sums = MarginalSums::compute(&events, &targets)?;
    let mut efs = EnrichmentTable::compute(&sums, &events, &targets, config.min_pairs);

    let bonferroni_count = config.bonferroni.then(|| efs.len());
    if config.bonferroni {
        efs.retain_min_ef(config.ef_cutoff);
    }

    let tables = build_tables(&efs, &events, &targets);
    let significance = Significance::compute(&tables, bonferroni_count)?;

    info!("Writing output");
    write_report(out, &efs, &targets, &significance, config)
}
