//! Storage backends for the agent.

pub mod interface;
pub mod sqlite_storage;

pub use interface::Store;
pub use sqlite_storage::SQLiteStore;
