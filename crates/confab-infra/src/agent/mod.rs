//! Agent collaborator implementations.

pub mod echo;
pub mod store_backed;

pub use echo::EchoReplyGenerator;
pub use store_backed::StoreBackedCollaborator;
