//! 2x2 contingency tables for surviving target-event pairs
//!
//! Cell counts are weighted by each molecule's target out-degree, not by
//! plain membership: a molecule predicted to bind three targets
//! contributes three molecule-target pairs to every cell it falls into.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::associations::{EventId, EventMap, MoleculeId, TargetId, TargetMap};
use crate::stats::enrichment::EnrichmentTable;

/// A 2x2 contingency matrix `[[both, event-only], [target-only, neither]]`
///
/// Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    both: u64,
    event_only: u64,
    target_only: u64,
    neither: u64,
}

impl ContingencyTable {
    /// Creates a table from its four cells
    pub fn new(both: u64, event_only: u64, target_only: u64, neither: u64) -> Self {
        ContingencyTable {
            both,
            event_only,
            target_only,
            neither,
        }
    }

    /// The cells as a row-major 2x2 matrix
    pub fn cells(&self) -> [[u64; 2]; 2] {
        [[self.both, self.event_only], [self.target_only, self.neither]]
    }

    /// Row sums `(both + event-only, target-only + neither)`
    pub fn row_totals(&self) -> [u64; 2] {
        [self.both + self.event_only, self.target_only + self.neither]
    }

    /// Column sums `(both + target-only, event-only + neither)`
    pub fn column_totals(&self) -> [u64; 2] {
        [self.both + self.target_only, self.event_only + self.neither]
    }

    /// Sum over all four cells
    pub fn total(&self) -> u64 {
        self.both + self.event_only + self.target_only + self.neither
    }
}

/// Builds a contingency table for every scored pair
///
/// `target_counts` weights each molecule by its out-degree in the target
/// map; `num_pairs` is the total number of molecule-target pairs. Per
/// pair: `both` sums the weights of the linking molecules, the two
/// exclusive cells subtract `both` from the event-side and target-side
/// weight sums, and `neither` is the remainder of `num_pairs`.
pub fn build_tables(
    efs: &EnrichmentTable,
    events: &EventMap,
    targets: &TargetMap,
) -> BTreeMap<(TargetId, EventId), ContingencyTable> {
    let mut target_counts: HashMap<&MoleculeId, u64> = HashMap::new();
    for (_, molecules) in targets.iter() {
        for molecule in molecules {
            target_counts
                .entry(molecule)
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }
    let num_pairs: u64 = target_counts.values().sum();

    let weight_of = |molecule: &MoleculeId| target_counts.get(molecule).copied().unwrap_or(0);

    info!("Computing contingency tables");
    let mut tables = BTreeMap::new();
    for ((target, event), _) in efs.iter() {
        let event_molecules = events
            .get(event)
            .expect("every scored event must be present in the event map");
        let target_molecules = targets
            .get(target)
            .expect("every scored target must be present in the target map");

        let both: u64 = event_molecules
            .intersection(target_molecules)
            .map(&weight_of)
            .sum();
        let event_only = event_molecules.iter().map(&weight_of).sum::<u64>() - both;
        let target_only = target_molecules.iter().map(&weight_of).sum::<u64>() - both;
        let neither = num_pairs - both - event_only - target_only;

        tables.insert(
            (target.clone(), event.clone()),
            ContingencyTable::new(both, event_only, target_only, neither),
        );
    }
    tables
}
