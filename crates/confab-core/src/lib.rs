//! Business logic and repository trait definitions for Confab.
//!
//! This crate defines the "ports" (the repository and agent collaborator
//! traits) that the infrastructure layer implements. It depends only on
//! `confab-types` -- never on `confab-infra` or any database/IO crate.

pub mod agent;
pub mod conversation;
