//! Enrichment factor computation over the full event x target cross
//! product
//!
//! The scan is the dominant cost of the pipeline, `O(|events| * |targets|)`
//! pair evaluations, and is intentionally two-pass: the global triplet
//! count `P` is a property of the entire dataset and only known after the
//! full scan, yet scales every individual enrichment factor. Raw
//! `p / (E * T)` ratios are stored first and rescaled by `P` once the
//! scan ends. Do not fuse the passes.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::associations::{EventId, EventMap, TargetId, TargetMap};
use crate::f64_from_u64;
use crate::stats::MarginalSums;

/// Enrichment factors of all pairs that met the minimum-pairs threshold
///
/// Keyed by `(target, event)` in a [`BTreeMap`], so every iteration over
/// the table, and everything derived from it downstream, is ordered by
/// target then event.
#[derive(Debug, Default, Clone)]
pub struct EnrichmentTable {
    efs: BTreeMap<(TargetId, EventId), f64>,
    triplets: u64,
}

impl EnrichmentTable {
    /// Scores every (event, target) pair
    ///
    /// Events with `E == 0` are skipped entirely. For every remaining
    /// pair the common-molecule count `p` is accumulated into the global
    /// triplet count `P` regardless of the threshold; pairs with
    /// `p < min_pairs` are not stored. A zero `E * T` denominator is not
    /// an error: the pair is logged and skipped.
    ///
    /// The EF cutoff is deliberately *not* applied here; it only gates
    /// reporting (and, in Bonferroni mode, the pre-filter before the
    /// contingency stage).
    pub fn compute(
        sums: &MarginalSums,
        events: &EventMap,
        targets: &TargetMap,
        min_pairs: u64,
    ) -> Self {
        let mut efs = BTreeMap::new();
        // Total count of all (molecule, target, event) triplets
        let mut triplets = 0u64;

        for (event, event_molecules) in events.iter() {
            let e_sum = sums.event(event);
            if e_sum == 0 {
                continue;
            }
            for (target, target_molecules) in targets.iter() {
                let t_sum = sums.target(target);
                let common = event_molecules.intersection(target_molecules).count() as u64;
                triplets += common;
                if common < min_pairs {
                    continue;
                }
                let denominator = f64_from_u64(e_sum) * f64_from_u64(t_sum);
                if denominator == 0.0 {
                    warn!(
                        "EF undefined for {target} / {event}: p={common}, E={e_sum}, T={t_sum}"
                    );
                    continue;
                }
                efs.insert(
                    (target.clone(), event.clone()),
                    f64_from_u64(common) / denominator,
                );
            }
        }

        // P is final only now; rescale every stored EF
        for ef in efs.values_mut() {
            *ef *= f64_from_u64(triplets);
        }
        info!("Computed {} target-event enrichment factors", efs.len());

        EnrichmentTable { efs, triplets }
    }

    /// The enrichment factor of one pair, if it was scored
    pub fn ef(&self, pair: &(TargetId, EventId)) -> Option<f64> {
        self.efs.get(pair).copied()
    }

    /// The global triplet count `P`, summed over *all* pairs including
    /// those below the minimum-pairs threshold
    pub fn triplets(&self) -> u64 {
        self.triplets
    }

    /// Number of scored pairs
    pub fn len(&self) -> usize {
        self.efs.len()
    }

    /// Returns `true` if no pair was scored
    pub fn is_empty(&self) -> bool {
        self.efs.is_empty()
    }

    /// Iterates `(pair, EF)` ordered by target then event
    pub fn iter(&self) -> impl Iterator<Item = (&(TargetId, EventId), f64)> {
        self.efs.iter().map(|(pair, ef)| (pair, *ef))
    }

    /// Drops every pair with `EF < cutoff`
    ///
    /// The Bonferroni pre-filter: trades statistical power for memory by
    /// excluding pairs from testing altogether. The comparison is
    /// non-strict, unlike the strict `>` of the report filter.
    pub fn retain_min_ef(&mut self, cutoff: f64) {
        self.efs.retain(|_, ef| *ef >= cutoff);
    }
}
