//! Databricks File System endpoints.

pub mod client;
pub mod models;

pub use client::DbfsClient;
pub use models::{FileInfo, ReadResult, MAX_BLOCK_SIZE, MAX_READ_LENGTH};
