use core::fmt::Debug;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use tracing::debug;

use crate::associations::MoleculeId;

/// A unique identifier for a predicted target, usually a UniProt accession
#[derive(Clone, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct TargetId {
    inner: String,
}

impl TargetId {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        TargetId {
            inner: value.to_string(),
        }
    }
}

impl From<String> for TargetId {
    fn from(inner: String) -> Self {
        TargetId { inner }
    }
}

impl Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Debug for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TargetId({})", self.inner)
    }
}

/// Display name and description of a target
///
/// Recorded from the first result row that mentions the target;
/// subsequent rows never overwrite it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    name: String,
    description: String,
}

impl TargetInfo {
    /// Creates the side-metadata of a target
    pub fn new(name: &str, description: &str) -> Self {
        TargetInfo {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// The display name of the target
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The free-text description of the target
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Maps every target to the set of molecules predicted to bind it
///
/// Built from the results table while rejecting rows whose molecule has
/// no event mapping; the rejected molecules are tracked only as a
/// diagnostic count. A side table holds each target's [`TargetInfo`].
#[derive(Debug, Default, Clone)]
pub struct TargetMap {
    targets: HashMap<TargetId, HashSet<MoleculeId>>,
    info: HashMap<TargetId, TargetInfo>,
}

impl TargetMap {
    /// Groups `(molecule, target, info)` rows by target
    ///
    /// Rows whose molecule is not part of `has_event` are skipped; the
    /// second return value is the number of distinct skipped molecules.
    /// Multiple rows for the same molecule-target combination collapse
    /// into one set entry, taking the union over affinity groups.
    pub fn from_rows<I>(rows: I, has_event: &HashSet<MoleculeId>) -> (Self, usize)
    where
        I: IntoIterator<Item = (MoleculeId, TargetId, TargetInfo)>,
    {
        let mut map = TargetMap::default();
        let mut rejects: HashSet<MoleculeId> = HashSet::new();
        for (molecule, target, info) in rows {
            if !has_event.contains(&molecule) {
                debug!("Skipping {molecule}: not mapped to any event");
                rejects.insert(molecule);
                continue;
            }
            map.insert(target.clone(), molecule);
            map.record_info(target, info);
        }
        (map, rejects.len())
    }

    /// Adds one molecule to one target's set
    pub fn insert(&mut self, target: TargetId, molecule: MoleculeId) {
        self.targets.entry(target).or_default().insert(molecule);
    }

    /// Records the side-metadata of a target unless already present
    pub fn record_info(&mut self, target: TargetId, info: TargetInfo) {
        if let Entry::Vacant(entry) = self.info.entry(target) {
            entry.insert(info);
        }
    }

    /// The molecule set of a single target
    pub fn get(&self, target: &TargetId) -> Option<&HashSet<MoleculeId>> {
        self.targets.get(target)
    }

    /// The side-metadata of a single target
    pub fn info(&self, target: &TargetId) -> Option<&TargetInfo> {
        self.info.get(target)
    }

    /// Number of targets in the map
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if the map contains no targets
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates all targets and their molecule sets
    pub fn iter(&self) -> impl Iterator<Item = (&TargetId, &HashSet<MoleculeId>)> {
        self.targets.iter()
    }

    /// The set of all molecules predicted to bind at least one target
    pub fn molecules(&self) -> HashSet<MoleculeId> {
        super::flatten(&self.targets)
    }
}

impl<'a> IntoIterator for &'a TargetMap {
    type Item = (&'a TargetId, &'a HashSet<MoleculeId>);
    type IntoIter = std::collections::hash_map::Iter<'a, TargetId, HashSet<MoleculeId>>;
    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rows() -> Vec<(MoleculeId, TargetId, TargetInfo)> {
        vec![
            ("m1".into(), "t1".into(), TargetInfo::new("COX1", "cyclooxygenase 1")),
            ("m2".into(), "t1".into(), TargetInfo::new("ignored", "later row")),
            ("m2".into(), "t2".into(), TargetInfo::new("HERG", "potassium channel")),
            ("m9".into(), "t2".into(), TargetInfo::new("HERG", "potassium channel")),
        ]
    }

    fn has_event() -> HashSet<MoleculeId> {
        HashSet::from(["m1".into(), "m2".into(), "m3".into()])
    }

    #[test]
    fn groups_rows_by_target() {
        let (map, _) = TargetMap::from_rows(rows(), &has_event());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"t1".into()).unwrap().len(), 2);
        assert_eq!(map.get(&"t2".into()).unwrap().len(), 1);
    }

    #[test]
    fn rejects_molecules_without_events() {
        let (map, rejects) = TargetMap::from_rows(rows(), &has_event());
        assert_eq!(rejects, 1);
        assert!(!map.molecules().contains(&"m9".into()));
    }

    #[test]
    fn first_info_wins() {
        let (map, _) = TargetMap::from_rows(rows(), &has_event());
        let info = map.info(&"t1".into()).unwrap();
        assert_eq!(info.name(), "COX1");
        assert_eq!(info.description(), "cyclooxygenase 1");
    }

    #[test]
    fn molecules_flattens_all_targets() {
        let (map, _) = TargetMap::from_rows(rows(), &has_event());
        assert_eq!(map.molecules(), HashSet::from(["m1".into(), "m2".into()]));
    }
}
