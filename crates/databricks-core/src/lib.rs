//! # databricks-core
//!
//! Core types and utilities shared by the Databricks REST API client.
//!
//! This crate provides the pluggable HTTP transport, authentication decorators,
//! error handling and the generic request/response invocation used by every
//! endpoint group.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy for local, transport, remote and decode failures
//! - [`transport`] - The `Transport` capability and the default reqwest implementation
//! - [`auth`] - Bearer token and netrc transport decorators
//! - [`client`] - HTTP configuration and the shared invocation helper
//! - [`config`] - Account configuration and base URL derivation
//! - [`ids`] - Strongly-typed identifiers for Databricks resources
//! - [`types`] - Open string types and encoding helpers
//! - [`query`] - Query string builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod query;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use auth::{BearerTransport, Netrc, NetrcTransport};
pub use client::{ApiClient, HttpConfig};
pub use config::{base_url_for_account, validate_account, DatabricksConfig};
pub use error::{ApiErrorBody, Error, Result, TransportError};
pub use ids::{ClusterId, DbfsHandle, JobId, RunId, TokenId};
pub use query::QueryParams;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, SharedTransport, Transport};
