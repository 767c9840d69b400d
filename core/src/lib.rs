//! REST persistence adapter for a data-model layer.
//!
//! # Overview
//! Turns create/read/update/delete requests from a model layer into HTTP
//! requests against a REST endpoint and reports every dispatched request back
//! as one normalized `TransportOutcome`.
//!
//! # Design
//! - `SyncClient` is the translator: `build_request` is pure, `sync` adds one
//!   dispatch through the `RequestExecutor`.
//! - The executor owns connectivity precheck, the transport call and outcome
//!   normalization. It runs the call off the caller's thread and resolves a
//!   `PendingRequest` (or a callback) exactly once.
//! - `ModelRegistry` is an explicit, insertion-only table of model
//!   configurations and handles, shared by `Arc` instead of a global.
//! - Network I/O sits behind the `Transport` trait; `UreqTransport` is the
//!   default implementation.

pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod executor;
pub mod http;
pub mod model;
pub mod outcome;
pub mod registry;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::SyncClient;
pub use config::{AdapterConfig, DEFAULT_TIMEOUT};
pub use error::{SyncError, SyncResult};
pub use executor::{PendingRequest, RequestExecutor};
pub use http::{BodyEncoding, Headers, HttpMethod, PreparedRequest, RequestDescription, TransportResponse};
pub use model::{Model, ModelHandle};
pub use outcome::{OutcomeStatus, TransportOutcome};
pub use registry::ModelRegistry;
pub use transport::{AlwaysOnline, Connectivity, OnlineState, Transport, TransportFailure, UreqTransport};
pub use types::{AdapterSettings, ModelConfiguration, Operation, SyncOptions};
