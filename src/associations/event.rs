use core::fmt::Debug;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use crate::associations::MoleculeId;

/// A unique identifier for an adverse event
///
/// Usually a MedDRA preferred-term label or a similar vocabulary entry,
/// treated as an opaque string.
#[derive(Clone, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct EventId {
    inner: String,
}

impl EventId {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId {
            inner: value.to_string(),
        }
    }
}

impl From<String> for EventId {
    fn from(inner: String) -> Self {
        EventId { inner }
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Debug for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventId({})", self.inner)
    }
}

/// Maps every event to the set of molecules that exhibit it
///
/// The map is built once from the events table and later pruned to the
/// molecules that also appear in the [`TargetMap`](`crate::associations::TargetMap`).
/// An event whose molecules are all pruned away stays in the map as an
/// empty set and contributes zero to all downstream sums.
#[derive(Debug, Default, Clone)]
pub struct EventMap {
    events: HashMap<EventId, HashSet<MoleculeId>>,
}

impl EventMap {
    /// Groups `(molecule, event)` pairs by event
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (MoleculeId, EventId)>,
    {
        let mut map = EventMap::default();
        for (molecule, event) in pairs {
            map.insert(event, molecule);
        }
        map
    }

    /// Adds one molecule to one event's set
    pub fn insert(&mut self, event: EventId, molecule: MoleculeId) {
        self.events.entry(event).or_default().insert(molecule);
    }

    /// The molecule set of a single event
    pub fn get(&self, event: &EventId) -> Option<&HashSet<MoleculeId>> {
        self.events.get(event)
    }

    /// Number of events in the map, including empty ones
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the map contains no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates all events and their molecule sets
    pub fn iter(&self) -> impl Iterator<Item = (&EventId, &HashSet<MoleculeId>)> {
        self.events.iter()
    }

    /// The set of all molecules that appear in at least one event
    pub fn molecules(&self) -> HashSet<MoleculeId> {
        super::flatten(&self.events)
    }

    /// Removes every molecule that is not part of `keep` from every
    /// event's set
    ///
    /// Events are never deleted; an event can end up with an empty
    /// molecule set. Returns the number of molecules that no longer
    /// appear in any event.
    pub fn prune(&mut self, keep: &HashSet<MoleculeId>) -> usize {
        let before = self.molecules();
        for molecules in self.events.values_mut() {
            molecules.retain(|molecule| keep.contains(molecule));
        }
        let after = self.molecules();
        before.difference(&after).count()
    }
}

impl<'a> IntoIterator for &'a EventMap {
    type Item = (&'a EventId, &'a HashSet<MoleculeId>);
    type IntoIter = std::collections::hash_map::Iter<'a, EventId, HashSet<MoleculeId>>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
