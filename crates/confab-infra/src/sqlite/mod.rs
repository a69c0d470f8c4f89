//! SQLite storage: split read/write pool and the conversation repository.

pub mod conversation;
pub mod pool;
