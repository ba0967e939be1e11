//! Which documents were built with which hooks.

use std::collections::{BTreeMap, BTreeSet};

use hookmark_renderer::{Dependencies, HookId};

/// Hook identities per build unit.
///
/// A build unit is usually one document. Recording the same identity for a
/// unit any number of times leaves the set unchanged, so renders can be
/// merged in without deduplicating first. When a hook changes, the units
/// returned by [`units_using`](Self::units_using) are the ones to rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildDependencies {
    units: BTreeMap<String, BTreeSet<HookId>>,
}

impl BuildDependencies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the hooks used by one render into `unit`.
    pub fn record(&mut self, unit: &str, dependencies: &Dependencies) {
        dependencies.merge_into(self.units.entry(unit.to_owned()).or_default());
    }

    /// Merge an already deduplicated identity set into `unit`.
    pub fn extend<'a>(&mut self, unit: &str, ids: impl IntoIterator<Item = &'a HookId>) {
        self.units
            .entry(unit.to_owned())
            .or_default()
            .extend(ids.into_iter().cloned());
    }

    /// Forget a unit, e.g. before rebuilding it from scratch.
    pub fn remove(&mut self, unit: &str) -> Option<BTreeSet<HookId>> {
        self.units.remove(unit)
    }

    #[must_use]
    pub fn get(&self, unit: &str) -> Option<&BTreeSet<HookId>> {
        self.units.get(unit)
    }

    /// Units whose output depends on `id`.
    pub fn units_using<'a>(&'a self, id: &'a HookId) -> impl Iterator<Item = &'a str> + 'a {
        self.units
            .iter()
            .filter(move |(_, ids)| ids.contains(id))
            .map(|(unit, _)| unit.as_str())
    }

    /// Every identity used by any unit.
    #[must_use]
    pub fn identities(&self) -> BTreeSet<&HookId> {
        self.units.values().flatten().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
