//! Remote persistence for the tracker.
//!
//! The remote is a hosted table behind a thin HTTP proxy exposing two
//! operations on `/api/entries`:
//! - `GET` returns every row, newest first, with backend column names
//! - `POST` upserts a batch of rows keyed by `id`, guarded by a shared secret
//!
//! [`RemoteGateway`] is the seam the entry store talks to; [`HttpGateway`]
//! is the reqwest implementation.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod rows;

pub use config::RemoteConfig;
pub use error::{CloudError, CloudResult};
pub use gateway::RemoteGateway;
pub use http::HttpGateway;
pub use rows::{OutgoingRow, RemoteRow};
