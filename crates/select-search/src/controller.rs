//! Search-and-select controller.
//!
//! This module provides [`SearchSelect`], which connects a host's search
//! source and its externally owned list of selected ids to a [`Selector`].
//! It exposes the option and selection views to a presentation layer and
//! notifies the host through a [`SelectionListener`] on every `select`.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use select_core::{Identifiable, Reconciliation, Selector};
use tracing::{debug, info, warn};

use crate::config::SearchSelectConfig;
use crate::error::{SearchError, SearchResult};
use crate::listener::{SelectEvent, SelectionListener};
use crate::source::{SearchSource, SearchTerm};

/// Lifecycle state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// `init` has not completed yet.
    Uninitialized,
    /// Normal operation.
    Ready,
}

/// A search issued by the controller but not yet applied.
///
/// The search can run anywhere, including a detached task; its result goes
/// back through [`SearchSelect::apply_search`].
pub struct PendingSearch<T, S> {
    seq: u64,
    term: SearchTerm,
    source: Arc<S>,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> PendingSearch<T, S>
where
    S: SearchSource<T>,
{
    /// Returns the sequence number of this search.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns the term being searched.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term.term
    }

    /// Runs the search against the source.
    pub async fn execute(self) -> CompletedSearch<T> {
        let result = <S as SearchSource<T>>::search(&self.source, &self.term).await;
        CompletedSearch {
            seq: self.seq,
            term: self.term.term,
            result,
        }
    }
}

impl<T, S> fmt::Debug for PendingSearch<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSearch")
            .field("seq", &self.seq)
            .field("term", &self.term)
            .finish_non_exhaustive()
    }
}

/// The outcome of a [`PendingSearch`].
#[derive(Debug)]
pub struct CompletedSearch<T> {
    /// Sequence number of the originating search.
    pub seq: u64,
    /// The term that was searched.
    pub term: String,
    /// Candidates returned by the source, or its error.
    pub result: SearchResult<Vec<T>>,
}

/// Bridges a search source and an external selection-id list to a [`Selector`].
pub struct SearchSelect<T, S> {
    config: SearchSelectConfig,
    selector: Selector<T>,
    source: Arc<S>,
    listener: Box<dyn SelectionListener<T>>,
    /// Externally owned selection ids; the authoritative selection.
    select_model: Vec<String>,
    term: String,
    state: ControllerState,
    next_seq: u64,
    /// Highest sequence number applied so far.
    applied_seq: Option<u64>,
}

impl<T, S> SearchSelect<T, S>
where
    T: Identifiable + Clone + Send + Sync + 'static,
    S: SearchSource<T> + 'static,
{
    /// Creates a controller.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidConfig` if the configuration does not validate.
    pub fn new<L>(
        source: S,
        listener: L,
        config: SearchSelectConfig,
    ) -> SearchResult<Self>
    where
        L: SelectionListener<T> + 'static,
    {
        config.validate()?;

        Ok(Self {
            selector: Selector::with_strategy(config.strategy),
            config,
            source: Arc::new(source),
            listener: Box::new(listener),
            select_model: Vec::new(),
            term: String::new(),
            state: ControllerState::Uninitialized,
            next_seq: 0,
            applied_seq: None,
        })
    }

    /// Sets the initial selection ids.
    #[must_use]
    pub fn with_select_model<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.set_select_model(ids);
        self
    }

    /// Loads the initial options and reconciles the current selection.
    ///
    /// A failing follow-up search does not fail `init`; it is reported to the
    /// listener's `on_error` and the controller is `Ready` regardless.
    ///
    /// # Errors
    ///
    /// Propagates failures of the source's `init`; the controller then stays
    /// uninitialized.
    pub async fn init(&mut self) -> SearchResult<()> {
        let outcome = self.load().await?;
        if outcome.rerun_search {
            if let Err(err) = self.on_search().await {
                warn!(error = %err, "follow-up search after init failed");
                self.report(&err);
            }
        }
        Ok(())
    }

    /// Runs the source's `init`, reconciles and marks the controller ready.
    async fn load(&mut self) -> SearchResult<Reconciliation<T>> {
        let source = Arc::clone(&self.source);
        if let Some(pending) = <S as SearchSource<T>>::init(&source) {
            let items = pending.await?;
            info!(
                context = %self.config.context,
                count = items.len(),
                "loaded initial options"
            );
            self.selector.update_options(items);
        }

        let outcome = self.reconcile();
        self.state = ControllerState::Ready;
        Ok(outcome)
    }

    /// Reconciles the selector against the select model and notifies the host.
    ///
    /// When the selection shrank, the current term is searched again so the
    /// released items show up as options right away.
    ///
    /// # Errors
    ///
    /// Propagates failures of the follow-up search. The host has already been
    /// notified at that point.
    pub async fn select(&mut self) -> SearchResult<Reconciliation<T>> {
        let outcome = self.reconcile();
        if outcome.rerun_search {
            self.on_search().await?;
        }
        Ok(outcome)
    }

    /// Synchronous part of [`select`](Self::select): reconciles and notifies,
    /// leaving any follow-up search to the caller.
    pub fn reconcile(&mut self) -> Reconciliation<T> {
        let outcome = self.selector.reconcile(&self.select_model);
        debug!(
            context = %self.config.context,
            selected = outcome.selection.len(),
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            rerun_search = outcome.rerun_search,
            "selection reconciled"
        );

        let event = SelectEvent {
            selection: outcome.selection.clone(),
        };
        self.listener.on_select(&event);
        outcome
    }

    /// Searches the current term and replaces the options with the result.
    ///
    /// # Errors
    ///
    /// Propagates source failures.
    pub async fn on_search(&mut self) -> SearchResult<()> {
        let completed = self.begin_search().execute().await;
        self.apply_search(completed).map(|_| ())
    }

    /// Sets the term and searches it.
    ///
    /// # Errors
    ///
    /// Propagates source failures.
    pub async fn search(&mut self, term: impl Into<String>) -> SearchResult<()> {
        self.set_term(term);
        self.on_search().await
    }

    /// Issues a search for the current term without awaiting it.
    pub fn begin_search(&mut self) -> PendingSearch<T, S> {
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(seq, term = %self.term, "search issued");

        PendingSearch {
            seq,
            term: SearchTerm::new(self.term.clone()),
            source: Arc::clone(&self.source),
            _item: PhantomData,
        }
    }

    /// Applies a finished search to the options.
    ///
    /// Returns `Ok(false)` if the response was discarded as stale. Without
    /// `discard_stale`, responses are applied in arrival order, so an older
    /// response arriving late overwrites a newer one.
    ///
    /// # Errors
    ///
    /// Returns the source error of a non-stale failed search.
    pub fn apply_search(&mut self, completed: CompletedSearch<T>) -> SearchResult<bool> {
        if self.config.discard_stale && self.applied_seq.is_some_and(|seq| completed.seq < seq) {
            warn!(
                seq = completed.seq,
                term = %completed.term,
                "discarding stale search response"
            );
            return Ok(false);
        }

        self.applied_seq = Some(
            self.applied_seq
                .map_or(completed.seq, |seq| seq.max(completed.seq)),
        );

        let items = completed.result?;
        debug!(
            seq = completed.seq,
            term = %completed.term,
            count = items.len(),
            "search applied"
        );
        self.selector.update_options(items);
        Ok(true)
    }

    pub(crate) fn report(&self, error: &SearchError) {
        self.listener.on_error(error);
    }
}

impl<T, S> SearchSelect<T, S>
where
    T: Identifiable + Clone,
{
    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SearchSelectConfig {
        &self.config
    }

    /// Returns the underlying selector.
    #[must_use]
    pub const fn selector(&self) -> &Selector<T> {
        &self.selector
    }

    /// Returns the current select model.
    #[must_use]
    pub fn select_model(&self) -> &[String] {
        &self.select_model
    }

    /// Replaces the select model. Takes effect on the next `select`.
    pub fn set_select_model<I, V>(&mut self, ids: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.select_model = ids.into_iter().map(Into::into).collect();
    }

    /// Returns the current search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Replaces the search term. Takes effect on the next search.
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Returns the offered options sorted by name.
    #[must_use]
    pub fn options(&self) -> Vec<T> {
        self.selector.options()
    }

    /// Returns the resolved selection sorted by name.
    #[must_use]
    pub fn selection(&self) -> Vec<T> {
        self.selector.selection()
    }

    /// Returns `true` if at least one item is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selector.has_selection()
    }

    /// Returns the number of searches issued so far.
    #[must_use]
    pub const fn search_count(&self) -> u64 {
        self.next_seq
    }

    /// Returns the search input placeholder.
    #[must_use]
    pub fn placeholder(&self) -> String {
        self.config.placeholder()
    }
}

impl<T, S> fmt::Debug for SearchSelect<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSelect")
            .field("config", &self.config)
            .field("select_model", &self.select_model)
            .field("term", &self.term)
            .field("state", &self.state)
            .field("next_seq", &self.next_seq)
            .field("applied_seq", &self.applied_seq)
            .finish_non_exhaustive()
    }
}
