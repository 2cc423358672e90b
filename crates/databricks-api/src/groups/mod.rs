//! Group membership endpoints.

pub mod client;
pub mod models;

pub use client::GroupsClient;
pub use models::{ListParentsRequest, Principal, PrincipalName};
