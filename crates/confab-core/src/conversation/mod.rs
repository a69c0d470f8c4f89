//! Conversation persistence, authorization, and orchestration.
//!
//! `repository` defines the storage port, `guard` the ownership check that
//! precedes every conversation-scoped operation, and `service` the
//! orchestration layer combining the two with the agent collaborator.

pub mod guard;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
