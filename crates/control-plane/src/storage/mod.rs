// Storage layer for NightCtrl control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// One table of immutable events; the only access pattern is
// "all events of one owner, optionally time-bounded, newest first".

pub mod backend;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;
