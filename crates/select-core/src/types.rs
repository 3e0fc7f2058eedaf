//! Core types shared by the selector and its hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An entity that can be offered and selected.
///
/// Ids must be unique within one [`Selector`](crate::Selector) lifetime. Names are
/// only used for display ordering and may repeat.
pub trait Identifiable {
    /// Stable unique identifier.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// The minimal `{ id, name }` shape returned by search and init sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Identifiable for Entity {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// How a new selection-id list is compared against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Grow/shrink heuristic based on list length.
    ///
    /// A strictly longer id list takes the select path, anything else takes the
    /// shrink path and asks the host to re-run its search, even when nothing was
    /// removed. Swapping one id for another is handled as a shrink, so the newly
    /// added id is not moved into the selection.
    #[default]
    Cardinality,
    /// Set difference of the old and new id lists.
    ///
    /// Additions and removals are both applied on every call and a search re-run
    /// is requested only when something was removed.
    ExplicitDiff,
}

impl fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cardinality => write!(f, "cardinality"),
            Self::ExplicitDiff => write!(f, "explicit_diff"),
        }
    }
}

/// Outcome of one selection update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<T> {
    /// The resolved selection after the update, sorted by name.
    pub selection: Vec<T>,
    /// Ids that entered the selection on this update, sorted.
    pub added: Vec<String>,
    /// Ids that left the selection on this update, sorted.
    pub removed: Vec<String>,
    /// Whether the option list changed in a way that warrants a new search.
    pub rerun_search: bool,
}

impl<T> Reconciliation<T> {
    /// Returns `true` if the selection membership changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}
