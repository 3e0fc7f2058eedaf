//! Search sources feeding candidate lists into a controller.
//!
//! A [`SearchSource`] stands in for the host's REST service wrapper: an
//! optional `init` call returning the first candidate page and a `search`
//! call returning candidates for a term.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use select_core::Identifiable;
use serde::{Deserialize, Serialize};

use crate::error::SearchResult;

/// Boxed future returned by [`SearchSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = SearchResult<Vec<T>>> + Send + 'a>>;

/// The argument passed to a search call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    /// The text typed by the user. May be empty.
    pub term: String,
}

impl SearchTerm {
    /// Creates a new search term.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }

    /// Returns `true` if the term is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.term)
    }
}

/// Asynchronous provider of selectable candidates.
///
/// Failures are returned as-is; the controller neither retries nor swallows them.
pub trait SearchSource<T>: Send + Sync {
    /// Loads the initial candidates. `None` means the host has no init binding.
    fn init(&self) -> Option<SourceFuture<'_, T>> {
        None
    }

    /// Returns the candidates matching a term.
    fn search<'a>(&'a self, term: &'a SearchTerm) -> SourceFuture<'a, T>;
}

impl<T, S> SearchSource<T> for Arc<S>
where
    S: SearchSource<T> + ?Sized,
{
    fn init(&self) -> Option<SourceFuture<'_, T>> {
        (**self).init()
    }

    fn search<'a>(&'a self, term: &'a SearchTerm) -> SourceFuture<'a, T> {
        (**self).search(term)
    }
}

/// A source over an already loaded list of items.
///
/// Matches names case-insensitively by substring; an empty term matches all.
#[derive(Debug, Clone)]
pub struct MemorySource<T> {
    items: Vec<T>,
    page_size: Option<usize>,
    serve_init: bool,
}

impl<T> MemorySource<T> {
    /// Creates a source over the given items. Init is disabled by default.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            page_size: None,
            serve_init: false,
        }
    }

    /// Limits every result to at most `size` items.
    #[must_use]
    pub const fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Serves the first page of items from `init`.
    #[must_use]
    pub const fn with_init(mut self, enabled: bool) -> Self {
        self.serve_init = enabled;
        self
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the source holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Identifiable + Clone> MemorySource<T> {
    fn matching(&self, term: &str) -> Vec<T> {
        let needle = term.trim().to_lowercase();
        let limit = self.page_size.unwrap_or(usize::MAX);

        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.name().to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }
}

impl<T> SearchSource<T> for MemorySource<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    fn init(&self) -> Option<SourceFuture<'_, T>> {
        self.serve_init
            .then(|| futures::future::ready(Ok(self.matching(""))).boxed())
    }

    fn search<'a>(&'a self, term: &'a SearchTerm) -> SourceFuture<'a, T> {
        futures::future::ready(Ok(self.matching(&term.term))).boxed()
    }
}
