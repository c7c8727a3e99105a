use core::fmt::Debug;
use std::fmt::Display;

/// A unique identifier for a molecule
///
/// The molecule identifier is the join key across all mappings. It is an
/// opaque string; depending on the input data it may be a compound
/// registry number, an InChIKey or any other unique label.
#[derive(Clone, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct MoleculeId {
    inner: String,
}

impl MoleculeId {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for MoleculeId {
    fn from(value: &str) -> Self {
        MoleculeId {
            inner: value.to_string(),
        }
    }
}

impl From<String> for MoleculeId {
    fn from(inner: String) -> Self {
        MoleculeId { inner }
    }
}

impl Display for MoleculeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Debug for MoleculeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MoleculeId({})", self.inner)
    }
}

impl PartialEq<str> for MoleculeId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}
