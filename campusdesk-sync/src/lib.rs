//! Client-side data layer for CampusDesk.
//!
//! Owns the in-memory collections (students, payments, hostel rooms,
//! exams), decides once at startup whether they are backed by the remote
//! backend or by local durable storage, and keeps both in sync.
//!
//! # Components
//!
//! - **Store**: [`EntityStore`] holds the collections, the [`DataMode`]
//!   and the `loading` flag; it performs no I/O
//! - **Controller**: [`SyncController`] fetches and reconciles the
//!   remote-backed collections
//! - **Mutations**: [`MutationFacade`] is the only write path; it tries
//!   the remote first and falls back to applying the change locally
//! - **Notifications**: [`NotificationLog`] collects session notices
//! - **Composition**: [`CampusData`] wires the above together and is what
//!   consumers hold
//!
//! # Example
//!
//! ```
//! use campusdesk_storage::MemoryStore;
//! use campusdesk_sync::{CampusData, DataConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let data = CampusData::local_only(Arc::new(MemoryStore::new()), DataConfig::default());
//! data.initialize().await;
//! assert!(!data.students().await.is_empty());
//! # }
//! ```

mod controller;
mod data;
pub mod demo;
mod mutation;
mod notifications;
mod outcome;
mod persistence;
mod store;

pub use controller::{CollectionSource, RefreshReport, SyncController};
pub use data::{CampusData, DataConfig};
pub use mutation::MutationFacade;
pub use notifications::NotificationLog;
pub use outcome::{FallbackPolicy, MutationOutcome, RemoteWrite};
pub use persistence::LocalPersistence;
pub use store::{Collections, DataMode, EntityStore};
