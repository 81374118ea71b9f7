//! Local storage layer for CampusDesk.
//!
//! Provides the durable store used in local-only mode, where no remote
//! backend is configured and every collection lives on this machine.
//!
//! # Architecture
//!
//! - [`LocalStore`] is a string key-value contract (`get`/`set`), the
//!   shape of browser-profile storage.
//! - [`MemoryStore`] keeps values in process memory (tests, ephemeral
//!   sessions).
//! - [`SqliteStore`] keeps values in a single-table SQLite file so they
//!   survive restarts.
//! - [`SnapshotStore`] serializes whole entity collections into a
//!   `LocalStore`, one key per collection, last write wins.

mod error;
mod memory;
mod snapshot;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;

/// Durable string key-value storage.
///
/// Implementations are synchronous. A failed `set` is reported to the
/// caller, which may choose to ignore it (quota exhaustion is not fatal).
pub trait LocalStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
