//! Statistical stages of the enrichment pipeline
//!
//! This module owns the marginal sums that feed the enrichment factor
//! formula, and the significance stage that turns contingency tables into
//! p-values and multiple-testing-corrected q-values.
//!
//! The enrichment factor of a (target, event) pair is
//!
//! ```text
//! EF = p / (E * T / P)
//! ```
//!
//! where `p` counts the molecules linking the pair, `E` and `T` are the
//! per-event and per-target cross-linkage sums computed here, and `P` is
//! the global count of (molecule, target, event) triplets.

use std::collections::{BTreeMap, HashMap};

use tracing::{error, info};

use crate::associations::{invert, EventId, EventMap, TargetId, TargetMap};
use crate::stats::contingency::ContingencyTable;
use crate::{EfaError, EfaResult};

pub mod chi2;
pub mod contingency;
pub mod correction;
pub mod enrichment;

/// Per-event and per-target cross-linkage sums
///
/// For each event, `E` is the total number of molecule-target pairs its
/// molecules take part in; for each target, `T` is the total number of
/// molecule-event pairs. These are intentionally not set sizes: a
/// promiscuous molecule counts once per cross-mapping.
///
/// Both sums must be computed from the *pruned* event map; computing them
/// earlier changes every downstream value.
#[derive(Debug, Default, Clone)]
pub struct MarginalSums {
    events: HashMap<EventId, u64>,
    targets: HashMap<TargetId, u64>,
}

impl MarginalSums {
    /// Computes `E` and `T` from the pruned association maps
    ///
    /// # Errors
    ///
    /// [`EfaError::InconsistentAssociations`] if the inverted event and
    /// target maps do not cover the same molecules. After pruning, every
    /// molecule with an event must have a target and vice versa; a
    /// mismatch is a bug in the association index and aborts the run.
    pub fn compute(events: &EventMap, targets: &TargetMap) -> EfaResult<Self> {
        let molecules_to_targets = invert(targets.iter());
        let molecules_to_events = invert(events.iter());

        if molecules_to_events.len() != molecules_to_targets.len()
            || molecules_to_events
                .keys()
                .any(|molecule| !molecules_to_targets.contains_key(molecule))
        {
            return Err(EfaError::InconsistentAssociations {
                events: molecules_to_events.len(),
                targets: molecules_to_targets.len(),
            });
        }

        let mut sums = MarginalSums::default();
        for (event, molecules) in events.iter() {
            let total = molecules
                .iter()
                .map(|molecule| {
                    molecules_to_targets
                        .get(molecule)
                        .map_or(0, |targets| targets.len() as u64)
                })
                .sum();
            sums.events.insert(event.clone(), total);
        }
        for (target, molecules) in targets.iter() {
            let total = molecules
                .iter()
                .map(|molecule| {
                    molecules_to_events
                        .get(molecule)
                        .map_or(0, |events| events.len() as u64)
                })
                .sum();
            sums.targets.insert(target.clone(), total);
        }
        Ok(sums)
    }

    /// `E` of one event; `0` for unknown events
    pub fn event(&self, event: &EventId) -> u64 {
        self.events.get(event).copied().unwrap_or(0)
    }

    /// `T` of one target; `0` for unknown targets
    pub fn target(&self, target: &TargetId) -> u64 {
        self.targets.get(target).copied().unwrap_or(0)
    }
}

/// p-values and q-values of all tested pairs, in table order
///
/// The pair list, the p-values and the q-values are parallel vectors
/// indexed identically; iteration order is the (target, event) order of
/// the contingency table map.
#[derive(Debug, Clone)]
pub struct Significance {
    pairs: Vec<(TargetId, EventId)>,
    pvalues: Vec<f64>,
    qvalues: Vec<f64>,
}

impl Significance {
    /// Runs the chi-squared test on every table and corrects the
    /// collected p-values
    ///
    /// With `bonferroni_count` set, every q-value is the p-value scaled
    /// by that count, without clipping. Otherwise Holm's step-down
    /// procedure is applied across all p-values jointly.
    ///
    /// # Errors
    ///
    /// [`EfaError::DegenerateTable`] if any table has a zero marginal.
    pub fn compute(
        tables: &BTreeMap<(TargetId, EventId), ContingencyTable>,
        bonferroni_count: Option<usize>,
    ) -> EfaResult<Self> {
        info!("Computing p and q-values");
        let mut pairs = Vec::with_capacity(tables.len());
        let mut pvalues = Vec::with_capacity(tables.len());
        for ((target, event), table) in tables {
            let pvalue = chi2::contingency_pvalue(table).inspect_err(|_| {
                error!("Degenerate contingency table for {target} / {event}");
            })?;
            pairs.push((target.clone(), event.clone()));
            pvalues.push(pvalue);
        }

        let qvalues = match bonferroni_count {
            Some(count) => {
                info!("Using Bonferroni correction for q-value calculations");
                correction::bonferroni(&pvalues, count)
            }
            None => {
                info!("Using Holm correction for q-value calculations");
                correction::holm(&pvalues)
            }
        };

        Ok(Significance {
            pairs,
            pvalues,
            qvalues,
        })
    }

    /// Number of tested pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pair was tested
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates `(pair, p-value, q-value)` in table order
    pub fn iter(&self) -> impl Iterator<Item = (&(TargetId, EventId), f64, f64)> {
        self.pairs
            .iter()
            .zip(self.pvalues.iter())
            .zip(self.qvalues.iter())
            .map(|((pair, pvalue), qvalue)| (pair, *pvalue, *qvalue))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::associations::TargetInfo;

    fn pruned_fixture() -> (EventMap, TargetMap) {
        let events = EventMap::from_pairs([
            ("m1".into(), "e1".into()),
            ("m2".into(), "e1".into()),
            ("m2".into(), "e2".into()),
            ("m3".into(), "e2".into()),
        ]);
        let has_event = events.molecules();
        let (targets, _) = TargetMap::from_rows(
            [
                ("m1".into(), "t1".into(), TargetInfo::default()),
                ("m2".into(), "t1".into(), TargetInfo::default()),
                ("m2".into(), "t2".into(), TargetInfo::default()),
                ("m3".into(), "t2".into(), TargetInfo::default()),
            ],
            &has_event,
        );
        (events, targets)
    }

    #[test]
    fn sums_count_cross_linkage() {
        let (events, targets) = pruned_fixture();
        let sums = MarginalSums::compute(&events, &targets).unwrap();

        // m1 -> 1 target, m2 -> 2 targets, m3 -> 1 target
        assert_eq!(sums.event(&"e1".into()), 3);
        assert_eq!(sums.event(&"e2".into()), 3);
        // m1 -> 1 event, m2 -> 2 events, m3 -> 1 event
        assert_eq!(sums.target(&"t1".into()), 3);
        assert_eq!(sums.target(&"t2".into()), 3);
    }

    #[test]
    fn unknown_keys_sum_to_zero() {
        let (events, targets) = pruned_fixture();
        let sums = MarginalSums::compute(&events, &targets).unwrap();
        assert_eq!(sums.event(&"e9".into()), 0);
        assert_eq!(sums.target(&"t9".into()), 0);
    }

    #[test]
    fn unpruned_maps_fail_the_consistency_check() {
        // m4 exhibits an event but binds no target: pruning never ran
        let events = EventMap::from_pairs([
            ("m1".into(), "e1".into()),
            ("m4".into(), "e1".into()),
        ]);
        let (targets, _) = TargetMap::from_rows(
            [("m1".into(), "t1".into(), TargetInfo::default())],
            &events.molecules(),
        );

        let err = MarginalSums::compute(&events, &targets).unwrap_err();
        assert!(matches!(
            err,
            EfaError::InconsistentAssociations { events: 2, targets: 1 }
        ));
    }

    #[test]
    fn pruned_maps_pass_the_consistency_check() {
        let events = EventMap::from_pairs([
            ("m1".into(), "e1".into()),
            ("m4".into(), "e1".into()),
        ]);
        let (targets, _) = TargetMap::from_rows(
            [("m1".into(), "t1".into(), TargetInfo::default())],
            &events.molecules(),
        );
        let mut events = events;
        let pruned = events.prune(&targets.molecules());
        assert_eq!(pruned, 1);
        assert!(MarginalSums::compute(&events, &targets).is_ok());
    }

    #[test]
    fn significance_is_ordered_by_pair() {
        let mut tables = BTreeMap::new();
        tables.insert(
            ("t2".into(), "e1".into()),
            ContingencyTable::new(3, 7, 9, 81),
        );
        tables.insert(
            ("t1".into(), "e1".into()),
            ContingencyTable::new(30, 10, 10, 50),
        );

        let significance = Significance::compute(&tables, None).unwrap();
        assert_eq!(significance.len(), 2);
        let pairs: Vec<_> = significance.iter().map(|(pair, _, _)| pair.clone()).collect();
        assert_eq!(pairs[0], ("t1".into(), "e1".into()));
        assert_eq!(pairs[1], ("t2".into(), "e1".into()));
    }

    #[test]
    fn bonferroni_mode_scales_by_count() {
        let mut tables = BTreeMap::new();
        tables.insert(
            ("t1".into(), "e1".into()),
            ContingencyTable::new(30, 10, 10, 50),
        );
        let holm = Significance::compute(&tables, None).unwrap();
        let bonf = Significance::compute(&tables, Some(10)).unwrap();

        let (_, pvalue, _) = holm.iter().next().unwrap();
        let (_, _, qvalue) = bonf.iter().next().unwrap();
        assert!((qvalue - pvalue * 10.0).abs() < 1e-12);
    }

    #[test]
    fn empty_tables_yield_empty_significance() {
        let tables = BTreeMap::new();
        let significance = Significance::compute(&tables, None).unwrap();
        assert!(significance.is_empty());
    }
}
