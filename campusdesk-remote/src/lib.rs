//! Remote data gateway for CampusDesk.
//!
//! The hosted backend is reached through one service façade per entity
//! type (students, payments, hostel rooms). Each façade offers the same
//! three calls: list everything, create one record, patch one record.
//!
//! # Components
//!
//! - **Config**: [`RemoteConfig`] holds the backend URL and API key and
//!   decides whether a backend is configured at all
//! - **Service**: [`EntityService`] is the per-entity contract the data
//!   layer depends on; [`RemoteGateway`] bundles one service per entity
//! - **REST**: [`RestClient`] and [`RestTable`] implement the contract
//!   against a PostgREST-style HTTP API
//!
//! Callers treat every error as "remote unavailable for this call"; the
//! [`RemoteError`] variants exist for diagnostics only.

mod config;
mod error;
mod rest;
mod rows;
mod service;

pub use config::{RemoteConfig, ENV_REMOTE_KEY, ENV_REMOTE_TIMEOUT, ENV_REMOTE_URL};
pub use error::{RemoteError, RemoteResult};
pub use rest::{RestClient, RestTable};
pub use rows::{HostelRoomRow, PaymentRow, StudentRow, TableRow};
pub use service::{
    EntityService, HostelRoomService, PaymentPatch, PaymentService, RemoteGateway,
    StudentPatch, StudentService,
};
