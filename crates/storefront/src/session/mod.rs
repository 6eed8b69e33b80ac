//! Session persistence and the process-wide session owner.

mod context;
mod store;

pub use context::{LoginError, SessionContext, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore, StoreError, keys};
