//! Option/selection reconciliation for search-and-select widgets.
//!
//! `select-core` tracks three views over a universe of identifiable items:
//! the options currently offered, the items currently selected, and a cache of
//! every item seen so far. Hosts push fresh search results and the full desired
//! selection; the [`Selector`] keeps offered and selected items disjoint and
//! resolves bare ids (for example ids restored from a URL) back to entities.
//!
//! # Example
//!
//! ```rust
//! use select_core::{Entity, Selector};
//!
//! let mut selector = Selector::new();
//! selector.update_options(vec![Entity::new("a", "Alpha"), Entity::new("b", "Beta")]);
//!
//! // Growing the selection moves "a" out of the options.
//! let outcome = selector.update_selection(&["a"], || unreachable!());
//! assert_eq!(outcome.selection, vec![Entity::new("a", "Alpha")]);
//! assert_eq!(selector.options(), vec![Entity::new("b", "Beta")]);
//!
//! // Shrinking restores it and asks the host to refresh its search.
//! let mut rerun = false;
//! let empty: [&str; 0] = [];
//! selector.update_selection(&empty, || rerun = true);
//! assert!(rerun);
//! assert_eq!(selector.options().len(), 2);
//! ```
//!
//! # Persisted selections
//!
//! ```rust
//! use select_core::FilterQuery;
//!
//! let query = FilterQuery::new().with("api", ["api-1", "api-2"]);
//! assert_eq!(query.build(), "api:(api-1 OR api-2)");
//!
//! let restored = FilterQuery::parse("api:api-1 OR api:api-2").unwrap();
//! assert_eq!(restored.selection_ids("api"), vec!["api-1", "api-2"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod query;
pub mod selector;
pub mod types;

// Re-export main types at crate root
pub use error::{Result, SelectError};
pub use query::FilterQuery;
pub use selector::Selector;
pub use types::{Entity, Identifiable, ReconcileStrategy, Reconciliation};
