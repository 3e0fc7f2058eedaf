//! Background driver for a search-and-select controller.
//!
//! [`SearchSession`] moves a [`SearchSelect`] onto its own task, the single
//! owner of the selection state. Raw keystrokes go through a [`Debouncer`]
//! before a search is issued; searches run as detached tasks and their
//! results are applied in arrival order, subject to `discard_stale`.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use select_core::Identifiable;

use crate::controller::{CompletedSearch, ControllerState, SearchSelect};
use crate::debounce::Debouncer;
use crate::error::{SearchError, SearchResult};
use crate::source::SearchSource;

/// Point-in-time view of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot<T> {
    /// Controller lifecycle state.
    pub state: ControllerState,
    /// Last settled search term.
    pub term: String,
    /// Offered options, sorted by name.
    pub options: Vec<T>,
    /// Resolved selection, sorted by name.
    pub selection: Vec<T>,
}

enum Command<T> {
    Select(Vec<String>),
    Snapshot(oneshot::Sender<SessionSnapshot<T>>),
    Shutdown,
}

/// Handle to a controller running on a background task.
pub struct SearchSession<T, S> {
    terms: mpsc::Sender<String>,
    commands: mpsc::Sender<Command<T>>,
    task: JoinHandle<SearchResult<SearchSelect<T, S>>>,
}

impl<T, S> SearchSession<T, S>
where
    T: Identifiable + Clone + Send + Sync + 'static,
    S: SearchSource<T> + 'static,
{
    /// Spawns the session. The controller is initialised on the task.
    pub fn spawn(controller: SearchSelect<T, S>) -> Self {
        let capacity = controller.config().command_buffer;
        let (terms, raw_terms) = mpsc::channel(capacity);
        let (commands, command_rx) = mpsc::channel(capacity);
        let settled = Debouncer::new(raw_terms, controller.config().debounce()).spawn(capacity);

        info!(context = %controller.config().context, "starting search session");
        let task = tokio::spawn(run(controller, settled, command_rx));

        Self {
            terms,
            commands,
            task,
        }
    }

    /// Feeds raw search input. A search is issued once input settles.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::SessionClosed` if the session has stopped.
    pub async fn input(&self, term: impl Into<String>) -> SearchResult<()> {
        self.terms
            .send(term.into())
            .await
            .map_err(|_| SearchError::SessionClosed)
    }

    /// Replaces the select model and reconciles.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::SessionClosed` if the session has stopped.
    pub async fn select<I, V>(&self, ids: I) -> SearchResult<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let ids = ids.into_iter().map(Into::into).collect();
        self.send(Command::Select(ids)).await
    }

    /// Returns the current options and selection.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::SessionClosed` if the session has stopped.
    pub async fn snapshot(&self) -> SearchResult<SessionSnapshot<T>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        response.await.map_err(|_| SearchError::SessionClosed)
    }

    /// Returns `true` if the session task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the session and returns the controller.
    ///
    /// # Errors
    ///
    /// Returns the `init` error if initialisation failed, or
    /// `SearchError::SessionClosed` if the task panicked.
    pub async fn shutdown(self) -> SearchResult<SearchSelect<T, S>> {
        let Self {
            terms,
            commands,
            task,
        } = self;
        drop(terms);
        // The task may already be gone after a failed init.
        let _ = commands.send(Command::Shutdown).await;

        match task.await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "search session task failed");
                Err(SearchError::SessionClosed)
            }
        }
    }

    async fn send(&self, command: Command<T>) -> SearchResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SearchError::SessionClosed)
    }
}

async fn run<T, S>(
    mut controller: SearchSelect<T, S>,
    mut settled: mpsc::Receiver<String>,
    mut commands: mpsc::Receiver<Command<T>>,
) -> SearchResult<SearchSelect<T, S>>
where
    T: Identifiable + Clone + Send + Sync + 'static,
    S: SearchSource<T> + 'static,
{
    // A failed follow-up search is reported inside `init`; only the
    // source's own init failure ends the session.
    if let Err(err) = controller.init().await {
        controller.report(&err);
        return Err(err);
    }

    let (results, mut completed) = mpsc::unbounded_channel();

    loop {
        tokio::select! {
            Some(term) = settled.recv() => {
                controller.set_term(term);
                dispatch(&mut controller, &results);
            }
            Some(search) = completed.recv() => {
                if let Err(err) = controller.apply_search(search) {
                    controller.report(&err);
                }
            }
            command = commands.recv() => match command {
                Some(Command::Select(ids)) => {
                    controller.set_select_model(ids);
                    if controller.reconcile().rerun_search {
                        dispatch(&mut controller, &results);
                    }
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(SessionSnapshot {
                        state: controller.state(),
                        term: controller.term().to_string(),
                        options: controller.options(),
                        selection: controller.selection(),
                    });
                }
                Some(Command::Shutdown) | None => break,
            },
        }
    }

    debug!(context = %controller.config().context, "search session stopped");
    Ok(controller)
}

fn dispatch<T, S>(
    controller: &mut SearchSelect<T, S>,
    results: &mpsc::UnboundedSender<CompletedSearch<T>>,
) where
    T: Identifiable + Clone + Send + Sync + 'static,
    S: SearchSource<T> + 'static,
{
    let pending = controller.begin_search();
    let results = results.clone();
    tokio::spawn(async move {
        // The receiver only goes away when the session stops.
        let _ = results.send(pending.execute().await);
    });
}
