//! Option/selection reconciliation.
//!
//! This module provides the [`Selector`], which tracks the items currently
//! offered to the user, the items currently selected, and every item seen so
//! far. Hosts push fresh candidate lists with [`Selector::update_options`] and
//! the full desired selection with [`Selector::update_selection`]; the selector
//! keeps the two views disjoint and resolves bare ids back to entities.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::types::{Identifiable, ReconcileStrategy, Reconciliation};

/// Reconciles a changing candidate list against a changing selection-id list.
///
/// Entities are stored by value: the cache and the option/selection maps each
/// hold their own clone, so a host mutating a returned value never affects the
/// selector.
#[derive(Debug, Clone)]
pub struct Selector<T> {
    /// Items offered for selection, keyed by id.
    options_by_id: BTreeMap<String, T>,
    /// Items currently selected, keyed by id.
    selected_by_id: BTreeMap<String, T>,
    /// Every item ever seen, keyed by id. Last write wins.
    cache_by_id: BTreeMap<String, T>,
    /// Selection ids as of the last reconciliation.
    last_selected_ids: BTreeSet<String>,
    strategy: ReconcileStrategy,
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::with_strategy(ReconcileStrategy::default())
    }
}

impl<T> Selector<T> {
    /// Creates an empty selector using the default cardinality strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty selector using the given strategy.
    #[must_use]
    pub const fn with_strategy(strategy: ReconcileStrategy) -> Self {
        Self {
            options_by_id: BTreeMap::new(),
            selected_by_id: BTreeMap::new(),
            cache_by_id: BTreeMap::new(),
            last_selected_ids: BTreeSet::new(),
            strategy,
        }
    }

    /// Returns the reconciliation strategy.
    #[must_use]
    pub const fn strategy(&self) -> ReconcileStrategy {
        self.strategy
    }

    /// Returns `true` if at least one item is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected_by_id.is_empty()
    }

    /// Returns the selection baseline used for the next delta, sorted by id.
    ///
    /// This may contain ids that could not be resolved to an entity.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<&str> {
        self.last_selected_ids.iter().map(String::as_str).collect()
    }

    /// Returns `true` if the id is part of the resolved selection.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_by_id.contains_key(id)
    }

    /// Looks up a previously seen entity by id.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&T> {
        self.cache_by_id.get(id)
    }

    /// Returns the number of distinct entities seen so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache_by_id.len()
    }
}

impl<T: Identifiable + Clone> Selector<T> {
    /// Replaces the offered options with the given candidates.
    ///
    /// Candidates that are currently selected are cached but not offered, so a
    /// search that happens to return a selected item does not list it twice.
    pub fn update_options<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.options_by_id.clear();

        for candidate in candidates {
            let id = candidate.id().to_owned();
            if !self.last_selected_ids.contains(&id) && !self.selected_by_id.contains_key(&id) {
                self.options_by_id.insert(id.clone(), candidate.clone());
            }
            self.cache_by_id.insert(id, candidate);
        }

        trace!(
            options = self.options_by_id.len(),
            cached = self.cache_by_id.len(),
            "updated options"
        );
    }

    /// Reconciles against the full desired selection and calls `on_unselect`
    /// when the host should re-run its search.
    pub fn update_selection<S, F>(&mut self, ids: &[S], on_unselect: F) -> Reconciliation<T>
    where
        S: AsRef<str>,
        F: FnOnce(),
    {
        let outcome = self.reconcile(ids);
        if outcome.rerun_search {
            on_unselect();
        }
        outcome
    }

    /// Reconciles against the full desired selection.
    ///
    /// `ids` is the complete selection, not a delta. Ids with no cached entity
    /// are kept in the baseline but left out of the resolved selection.
    pub fn reconcile<S>(&mut self, ids: &[S]) -> Reconciliation<T>
    where
        S: AsRef<str>,
    {
        let next: BTreeSet<String> = ids.iter().map(|id| id.as_ref().to_owned()).collect();

        let (added, removed, rerun_search) = match self.strategy {
            ReconcileStrategy::Cardinality => {
                if ids.len() > self.last_selected_ids.len() {
                    let added = self.select_ids(ids.iter().map(|id| id.as_ref()));
                    debug!(
                        path = "select",
                        requested = ids.len(),
                        added = added.len(),
                        "reconciled selection"
                    );
                    (added, Vec::new(), false)
                } else {
                    let removed = self.unselect_missing(&next);
                    debug!(
                        path = "shrink",
                        requested = ids.len(),
                        removed = removed.len(),
                        "reconciled selection"
                    );
                    (Vec::new(), removed, true)
                }
            }
            ReconcileStrategy::ExplicitDiff => {
                let removed = self.unselect_missing(&next);
                let added = self.select_ids(next.iter().map(String::as_str));
                let rerun = !removed.is_empty();
                debug!(
                    path = "diff",
                    added = added.len(),
                    removed = removed.len(),
                    "reconciled selection"
                );
                (added, removed, rerun)
            }
        };

        self.last_selected_ids = next;

        Reconciliation {
            selection: self.selection(),
            added: sorted(added),
            removed: sorted(removed),
            rerun_search,
        }
    }

    /// Returns the offered options sorted by name.
    #[must_use]
    pub fn options(&self) -> Vec<T> {
        sorted_by_name(self.options_by_id.values())
    }

    /// Returns the resolved selection sorted by name.
    #[must_use]
    pub fn selection(&self) -> Vec<T> {
        sorted_by_name(self.selected_by_id.values())
    }

    /// Moves every resolvable id into the selection. Returns the ids that were
    /// not selected before.
    fn select_ids<'a, I>(&mut self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = Vec::new();

        for id in ids {
            self.options_by_id.remove(id);
            match self.cache_by_id.get(id) {
                Some(entity) => {
                    if self
                        .selected_by_id
                        .insert(id.to_owned(), entity.clone())
                        .is_none()
                    {
                        added.push(id.to_owned());
                    }
                }
                None => trace!(id, "dropping unresolvable id from selection"),
            }
        }

        added
    }

    /// Moves every previously selected id that is absent from `next` back into
    /// the options. Returns the ids that left the selection.
    fn unselect_missing(&mut self, next: &BTreeSet<String>) -> Vec<String> {
        let unselected: Vec<String> = self
            .last_selected_ids
            .difference(next)
            .cloned()
            .collect();

        let mut removed = Vec::new();
        for id in unselected {
            if self.selected_by_id.remove(&id).is_some() {
                removed.push(id.clone());
            }
            if let Some(entity) = self.cache_by_id.get(&id) {
                self.options_by_id.insert(id, entity.clone());
            }
        }

        removed
    }
}

fn sorted_by_name<'a, T, I>(items: I) -> Vec<T>
where
    T: Identifiable + Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    // Map iteration is by id, so the stable sort breaks name ties by id.
    let mut items: Vec<T> = items.cloned().collect();
    items.sort_by(|a, b| a.name().cmp(b.name()));
    items
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids.dedup();
    ids
}
