//! Hook identities recorded during a render.

use std::collections::BTreeSet;

use crate::hooks::HookId;

/// Identities of the hooks that contributed to one render output.
///
/// Append-only: every successful hook call records one entry, so the same
/// identity may appear many times. Consumers that only care about which
/// hooks were involved use [`unique`](Self::unique) or
/// [`merge_into`](Self::merge_into).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    ids: Vec<HookId>,
}

impl Dependencies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: HookId) {
        self.ids.push(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HookId> {
        self.ids.iter()
    }

    /// Number of recorded hook calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Distinct identities.
    #[must_use]
    pub fn unique(&self) -> BTreeSet<HookId> {
        self.ids.iter().cloned().collect()
    }

    /// Add the identities to a build unit's dependency set.
    pub fn merge_into(&self, target: &mut BTreeSet<HookId>) {
        target.extend(self.ids.iter().cloned());
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a HookId;
    type IntoIter = std::slice::Iter<'a, HookId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_identity_merges_once() {
        let mut deps = Dependencies::new();
        deps.record(HookId::new("heading"));
        deps.record(HookId::new("heading"));
        deps.record(HookId::new("link"));

        assert_eq!(deps.len(), 3);
        assert_eq!(deps.unique().len(), 2);

        let mut unit = BTreeSet::new();
        deps.merge_into(&mut unit);
        deps.merge_into(&mut unit);
        assert_eq!(
            unit.into_iter().collect::<Vec<_>>(),
            vec![HookId::new("heading"), HookId::new("link")]
        );
    }
}
