//! Typed async client for the Databricks REST API 2.0.
//!
//! A [`Client`] is bound to one account and one transport. Each endpoint
//! group is reached through an accessor returning a lightweight handle:
//!
//! ```no_run
//! # async fn run() -> databricks::Result<()> {
//! let client = databricks::Client::builder("dbc-1234")
//!     .with_token("dapi-example")
//!     .build()?;
//!
//! for cluster in client.cluster().list().await? {
//!     println!("{} {:?}", cluster.cluster_id, cluster.state);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`cluster`] - Cluster lifecycle, sizing, events and metadata
//! - [`dbfs`] - Databricks File System reads, writes and streaming uploads
//! - [`groups`] - Group membership management
//! - [`jobs`] - Jobs and job runs
//! - [`libraries`] - Cluster library installation
//! - [`profiles`] - IAM instance profiles
//! - [`secrets`] - Secret scopes, secrets and ACLs
//! - [`token`] - Personal access tokens
//! - [`workspace`] - Notebooks and workspace directories

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod cluster;
pub mod dbfs;
pub mod groups;
pub mod jobs;
pub mod libraries;
pub mod profiles;
pub mod secrets;
pub mod token;
pub mod workspace;

pub use client::{Client, ClientBuilder, ClientSettings, NetrcLookup};
pub use databricks_core::{
    ClusterId, DatabricksConfig, DbfsHandle, Error, HttpConfig, JobId, RunId, TokenId,
    Transport, TransportError,
};

/// Convenient result alias that reuses the shared Databricks error type.
pub type Result<T> = databricks_core::Result<T>;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::Client;
    use wiremock::MockServer;

    pub fn test_client(server: &MockServer) -> Client {
        Client::builder("test-account")
            .with_base_url(format!("{}/api/", server.uri()))
            .build()
            .unwrap()
    }
}
