//! Token models.

use chrono::{DateTime, Utc};
use databricks_core::TokenId;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Public metadata of a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicTokenInfo {
    /// Token identifier.
    pub token_id: TokenId,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub creation_time: Option<DateTime<Utc>>,
    /// `None` for tokens that never expire; the server sends `-1`.
    #[serde(
        serialize_with = "chrono::serde::ts_milliseconds_option::serialize",
        deserialize_with = "expiry_millis"
    )]
    pub expiry_time: Option<DateTime<Utc>>,
    /// Comment given at creation.
    pub comment: String,
}

impl PublicTokenInfo {
    /// Returns true if the token expired at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time.is_some_and(|expiry| expiry <= now)
    }
}

fn expiry_millis<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = Option::<i64>::deserialize(deserializer)?;
    Ok(millis
        .filter(|millis| *millis > 0)
        .and_then(DateTime::from_timestamp_millis))
}

/// A freshly created token. The value is only returned once.
#[derive(Debug, Clone)]
pub struct CreatedToken {
    /// Value to send as a bearer token.
    pub token_value: SecretString,
    /// Metadata of the token.
    pub token_info: PublicTokenInfo,
}
