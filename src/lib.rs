pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LedgerError;
pub use crate::core::services::{GroupService, UserService};
pub use infrastructure::storage::{in_memory::InMemoryStorage, mongo::MongoStorage};

#[cfg(test)]
mod tests;
