//! Persistence layer — durable flags and settings.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use memory::MemoryFlagStore;
pub use traits::{FlagStore, settings_keys};
