//! Bidirectional mappings between molecules, events and targets
//!
//! The association index is the first pipeline stage: it groups the two
//! input tables into an [`EventMap`] and a [`TargetMap`], both keyed by
//! opaque string identifiers, and prunes them to the consistent
//! intersection of molecules known on both sides.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

mod event;
mod molecule;
mod target;

pub use event::{EventId, EventMap};
pub use molecule::MoleculeId;
pub use target::{TargetId, TargetInfo, TargetMap};

/// Reverses a mapping of sets
///
/// Every value of every set becomes a key of the result, mapped to the set
/// of keys it appeared under.
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, HashSet};
/// use efa::associations::invert;
///
/// let mut map: HashMap<&str, HashSet<u32>> = HashMap::new();
/// map.insert("a", HashSet::from([1, 2]));
/// map.insert("b", HashSet::from([2]));
///
/// let inverted = invert(&map);
/// assert_eq!(inverted[&1], HashSet::from(["a"]));
/// assert_eq!(inverted[&2], HashSet::from(["a", "b"]));
/// ```
pub fn invert<'a, K, V, I>(map: I) -> HashMap<V, HashSet<K>>
where
    I: IntoIterator<Item = (&'a K, &'a HashSet<V>)>,
    K: Eq + Hash + Clone + 'a,
    V: Eq + Hash + Clone + 'a,
{
    let mut inverted: HashMap<V, HashSet<K>> = HashMap::new();
    for (key, values) in map {
        for value in values {
            inverted
                .entry(value.clone())
                .or_default()
                .insert(key.clone());
        }
    }
    inverted
}

/// Collects the union of all sets of a mapping
pub fn flatten<'a, K, V, I>(map: I) -> HashSet<V>
where
    I: IntoIterator<Item = (&'a K, &'a HashSet<V>)>,
    K: 'a,
    V: Eq + Hash + Clone + 'a,
{
    let mut union = HashSet::new();
    for (_, values) in map {
        union.extend(values.iter().cloned());
    }
    union
}
