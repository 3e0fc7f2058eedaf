//! Search-and-select controller configuration.

use std::time::Duration;

use select_core::ReconcileStrategy;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

/// Configuration for a [`SearchSelect`](crate::SearchSelect) controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSelectConfig {
    /// What is being searched, used to build the input placeholder.
    pub context: String,
    /// Quiet period before a typed term triggers a search (in milliseconds).
    pub debounce_ms: u64,
    /// How selection-id lists are compared.
    pub strategy: ReconcileStrategy,
    /// Drop search responses older than the newest applied one.
    pub discard_stale: bool,
    /// Channel capacity of a background session.
    pub command_buffer: usize,
}

impl Default for SearchSelectConfig {
    fn default() -> Self {
        Self {
            context: "items".to_string(),
            debounce_ms: 300,
            strategy: ReconcileStrategy::Cardinality,
            discard_stale: false,
            command_buffer: 32,
        }
    }
}

impl SearchSelectConfig {
    /// Creates a configuration for the given context.
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }

    /// Loads and validates a configuration from JSON. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> SearchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the debounce period.
    #[must_use]
    pub fn with_debounce(mut self, period: Duration) -> Self {
        self.debounce_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the reconciliation strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ReconcileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable or disable stale response discarding.
    #[must_use]
    pub const fn with_discard_stale(mut self, enabled: bool) -> Self {
        self.discard_stale = enabled;
        self
    }

    /// Set the session channel capacity.
    #[must_use]
    pub const fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity;
        self
    }

    /// Returns the debounce period.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checks the configuration for values the controller cannot work with.
    pub fn validate(&self) -> SearchResult<()> {
        if self.context.trim().is_empty() {
            return Err(SearchError::InvalidConfig {
                reason: "context must not be empty".to_string(),
            });
        }
        if self.command_buffer == 0 {
            return Err(SearchError::InvalidConfig {
                reason: "command_buffer must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the search input placeholder.
    ///
    /// An all-uppercase context is treated as an acronym and kept as is,
    /// anything else is lowercased: `"API"` gives `"Search API"`, `"Groups"`
    /// gives `"Search groups"`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        let context = &self.context;
        if *context == context.to_uppercase() {
            format!("Search {context}")
        } else {
            format!("Search {}", context.to_lowercase())
        }
    }
}
