//! Infrastructure layer for Confab.
//!
//! Contains implementations of the traits defined in `confab-core`:
//! SQLite-backed conversation storage and the store-backed agent
//! collaborator that persists the user/assistant exchange around a
//! pluggable reply generator.

pub mod agent;
pub mod sqlite;
