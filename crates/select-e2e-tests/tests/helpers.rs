//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use select_core::Identifiable;
use select_search::{
    SearchError, SearchSource, SearchTerm, SelectEvent, SelectionListener, SourceFuture,
};
use serde::{Deserialize, Serialize};

/// Long enough for any debounce period used in tests to elapse.
pub const SETTLE: Duration = Duration::from_secs(2);

/// Install a test subscriber once. Respects `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// An application as returned by the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
}

impl Application {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            owner: None,
        }
    }
}

impl Identifiable for Application {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A fixture list of applications parsed from a REST payload.
pub fn applications() -> Vec<Application> {
    serde_json::from_str(
        r#"[
            {"id": "app-1", "name": "Mobile", "owner": "alice"},
            {"id": "app-2", "name": "Web"},
            {"id": "app-3", "name": "Billing"},
            {"id": "app-4", "name": "analytics"}
        ]"#,
    )
    .expect("fixture parses")
}

/// Records every event and error delivered to the host.
#[derive(Clone)]
pub struct Recorder<T> {
    pub events: Arc<Mutex<Vec<SelectEvent<T>>>>,
    pub errors: Arc<Mutex<Vec<SearchError>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last(&self) -> Option<SelectEvent<T>> {
        self.events.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }
}

impl<T: Clone + Send + Sync> SelectionListener<T> for Recorder<T> {
    fn on_select(&self, event: &SelectEvent<T>) {
        self.events.lock().push(event.clone());
    }

    fn on_error(&self, error: &SearchError) {
        self.errors.lock().push(error.clone());
    }
}

/// A backend that answers each term after a configurable delay and logs calls.
pub struct DelayedBackend {
    items: Vec<Application>,
    delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl DelayedBackend {
    pub fn new(items: Vec<Application>) -> Self {
        Self {
            items,
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, term: &str, delay: Duration) -> Self {
        self.delays.insert(term.to_string(), delay);
        self
    }
}

impl SearchSource<Application> for DelayedBackend {
    fn search<'a>(&'a self, term: &'a SearchTerm) -> SourceFuture<'a, Application> {
        self.calls.lock().push(term.term.clone());
        let delay = self.delays.get(&term.term).copied().unwrap_or_default();
        let needle = term.term.to_lowercase();
        let items: Vec<Application> = self
            .items
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        async move {
            tokio::time::sleep(delay).await;
            Ok(items)
        }
        .boxed()
    }
}

pub fn ids<T: Identifiable>(items: &[T]) -> Vec<&str> {
    items.iter().map(|item| item.id()).collect()
}
