//! End-to-end integration tests for the selection crates.
//!
//! These tests exercise the full stack:
//! - Selector reconciliation driven through the controller
//! - Host notification with resolved entities
//! - Debounced background sessions
//! - Selections persisted as filter queries

#![cfg(test)]
