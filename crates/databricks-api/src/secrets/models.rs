//! Secret models. Secret values are write-only and never appear here.

use chrono::{DateTime, Utc};
use databricks_core::open_string;
use serde::{Deserialize, Serialize};

open_string! {
    /// Permission granted by a secret ACL. Each level includes the ones below.
    AclPermission {
        MANAGE = "MANAGE",
        WRITE = "WRITE",
        READ = "READ",
    }
}

open_string! {
    /// Storage backing a secret scope.
    ScopeBackendType {
        DATABRICKS = "DATABRICKS",
    }
}

/// A secret scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretScope {
    /// Scope name.
    pub name: String,
    /// Backing store.
    pub backend_type: ScopeBackendType,
}

/// Key and modification time of a secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretMetadata {
    /// Secret key.
    pub key: String,
    /// Time of the last update.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated_timestamp: Option<DateTime<Utc>>,
}

/// Permission of a principal on a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclItem {
    /// User or group name.
    pub principal: String,
    /// Granted permission.
    pub permission: AclPermission,
}
