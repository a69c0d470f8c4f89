//! Shared domain types for Confab.
//!
//! This crate contains the conversation and message records, the message
//! role enum, and the error taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod conversation;
pub mod error;
pub mod message;
