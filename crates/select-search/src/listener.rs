//! Host notification for selection changes.

use select_core::Identifiable;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SearchError;

/// Payload delivered to the host whenever the resolved selection is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectEvent<T> {
    /// The resolved selection, sorted by name.
    pub selection: Vec<T>,
}

impl<T: Identifiable> SelectEvent<T> {
    /// Returns the ids of the selected entities.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.selection.iter().map(|item| item.id()).collect()
    }
}

/// Receives selection events from a controller.
///
/// Closures taking `&SelectEvent<T>` implement this trait directly.
pub trait SelectionListener<T>: Send + Sync {
    /// Called after every `select`, whether or not the selection changed.
    fn on_select(&self, event: &SelectEvent<T>);

    /// Called when a background search fails.
    fn on_error(&self, error: &SearchError) {
        warn!(error = %error, "search failed");
    }
}

impl<T, F> SelectionListener<T> for F
where
    F: Fn(&SelectEvent<T>) + Send + Sync,
{
    fn on_select(&self, event: &SelectEvent<T>) {
        self(event);
    }
}

/// A listener that only logs events.
#[derive(Debug, Clone, Default)]
pub struct LogListener {
    /// Label included in each log line.
    pub label: String,
}

impl LogListener {
    /// Creates a log listener with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl<T: Identifiable> SelectionListener<T> for LogListener {
    fn on_select(&self, event: &SelectEvent<T>) {
        info!(
            label = %self.label,
            count = event.selection.len(),
            ids = ?event.ids(),
            "selection updated"
        );
    }

    fn on_error(&self, error: &SearchError) {
        warn!(label = %self.label, error = %error, "search failed");
    }
}
