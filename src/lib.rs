// tasklist - local task list with pluggable key-value persistence

pub mod codec;
pub mod config;
pub mod error;
pub mod file_kv;
pub mod filter;
pub mod kv;
pub mod render;
pub mod sqlite_kv;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::{Backend, Config};
pub use error::PersistenceError;
pub use file_kv::FileKv;
pub use filter::FilterMode;
pub use kv::{KvStore, MemoryKv};
pub use render::Renderer;
pub use sqlite_kv::SqliteKv;
pub use store::{DEFAULT_KEY, TaskStore};
pub use task::{Task, TaskCollection};
