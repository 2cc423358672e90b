//! Secret scope, secret and ACL endpoints.

pub mod client;
pub mod models;

pub use client::SecretsClient;
pub use models::{AclItem, AclPermission, ScopeBackendType, SecretMetadata, SecretScope};
