//! Search-and-select controller for identifiable entities.
//!
//! `select-search` wires a host's asynchronous search source and its
//! externally owned list of selected ids to a [`select_core::Selector`].
//!
//! # Features
//!
//! - **Controller**: [`SearchSelect`] runs `init`, `select` and `search` and
//!   notifies a [`SelectionListener`] with resolved entities on every `select`
//! - **Sources**: the [`SearchSource`] trait plus an in-memory [`MemorySource`]
//! - **Debouncing**: [`Debouncer`] collapses keystroke bursts into one search
//! - **Sessions**: [`SearchSession`] drives a controller on a tokio task with
//!   optional discarding of stale search responses
//!
//! # Example
//!
//! ```rust
//! use select_core::Entity;
//! use select_search::{MemorySource, SearchSelect, SearchSelectConfig, SelectEvent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> select_search::SearchResult<()> {
//! let source = MemorySource::new(vec![
//!     Entity::new("api-1", "Petstore"),
//!     Entity::new("api-2", "Payments"),
//! ])
//! .with_init(true);
//!
//! let mut controller = SearchSelect::new(
//!     source,
//!     |event: &SelectEvent<Entity>| println!("selected: {:?}", event.selection),
//!     SearchSelectConfig::new("API"),
//! )?
//! .with_select_model(["api-2"]);
//!
//! controller.init().await?;
//! assert_eq!(controller.placeholder(), "Search API");
//! assert_eq!(controller.selection(), vec![Entity::new("api-2", "Payments")]);
//!
//! controller.search("pet").await?;
//! assert_eq!(controller.options(), vec![Entity::new("api-1", "Petstore")]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod listener;
pub mod session;
pub mod source;

// Re-export main types
pub use config::SearchSelectConfig;
pub use controller::{CompletedSearch, ControllerState, PendingSearch, SearchSelect};
pub use debounce::Debouncer;
pub use error::{SearchError, SearchResult};
pub use listener::{LogListener, SelectEvent, SelectionListener};
pub use session::{SearchSession, SessionSnapshot};
pub use source::{MemorySource, SearchSource, SearchTerm, SourceFuture};
