//! Account configuration for Databricks clients.
//!
//! A [`DatabricksConfig`] names the account (the first label of
//! `<account>.cloud.databricks.com`) and carries the optional credentials and
//! timeouts used when a client is built from configuration rather than code.

use crate::error::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the account name
pub const ENV_ACCOUNT: &str = "DATABRICKS_ACCOUNT";

/// Environment variable holding a personal access token
pub const ENV_TOKEN: &str = "DATABRICKS_TOKEN";

/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "DATABRICKS_BASE_URL";

/// Environment variable overriding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "DATABRICKS_TIMEOUT_SECS";

/// Configuration for a Databricks client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabricksConfig {
    /// Account name, the first label of the deployment hostname
    #[validate(length(min = 1, max = 63))]
    pub account: String,

    /// Optional override of the derived API base URL
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Optional personal access token sent as a bearer credential. Never
    /// read from or written to serialized configuration.
    #[serde(skip)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to resolve credentials from a netrc file
    #[serde(default)]
    pub use_netrc: bool,
}

const fn default_request_timeout_secs() -> u64 {
    60
}

/// Check that `account` can serve as the first label of a hostname.
///
/// # Errors
///
/// Returns [`Error::Config`] if the account contains characters other than
/// ASCII letters, digits and inner hyphens.
pub fn validate_account(account: &str) -> Result<()> {
    let valid = !account.is_empty()
        && !account.starts_with('-')
        && !account.ends_with('-')
        && account
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid configuration: account `{account}` is not a hostname label"
        )))
    }
}

impl DatabricksConfig {
    /// Create a configuration for the named account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not a valid hostname label.
    pub fn new(account: impl Into<String>) -> Result<Self> {
        let config = Self {
            account: account.into(),
            base_url: None,
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
            use_netrc: false,
        };

        config
            .validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;
        validate_account(&config.account)?;

        Ok(config)
    }

    /// Build a configuration from `DATABRICKS_*` environment variables.
    ///
    /// `DATABRICKS_ACCOUNT` is required; the token, base URL and timeout are
    /// optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, the timeout is not a number,
    /// or the resulting configuration does not validate.
    pub fn from_env() -> Result<Self> {
        let account = env::var(ENV_ACCOUNT)
            .map_err(|_| Error::Config(format!("{ENV_ACCOUNT} is not set")))?;

        let mut config = Self::new(account)?;

        if let Ok(token) = env::var(ENV_TOKEN) {
            config = config.with_token(token);
        }
        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            let seconds = raw
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {raw}")))?;
            config = config.with_timeout(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Enable or disable netrc credential lookup.
    #[must_use]
    pub const fn with_netrc(mut self, enabled: bool) -> Self {
        self.use_netrc = enabled;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the API base URL, preferring the override.
    ///
    /// # Errors
    ///
    /// Returns an error if the override or the derived URL cannot be parsed.
    pub fn resolve_base_url(&self) -> Result<Url> {
        validate_account(&self.account)?;
        match &self.base_url {
            Some(base_url) => normalize_base_url(base_url),
            None => base_url_for_account(&self.account),
        }
    }
}

/// Derive the API base URL of an account:
/// `https://<account>.cloud.databricks.com/api/`.
///
/// # Errors
///
/// Returns an error if the account does not form a valid hostname.
pub fn base_url_for_account(account: &str) -> Result<Url> {
    Url::parse(&format!("https://{account}.cloud.databricks.com/api/"))
        .map_err(|e| Error::Config(format!("Invalid account `{account}`: {e}")))
}

/// Parse a base URL, ensuring a trailing slash so relative paths join under it.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or cannot be a base.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| Error::Config(format!("Invalid base URL `{raw}`: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("Base URL `{raw}` cannot be a base")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_config_new_valid() {
        let config = DatabricksConfig::new("dbc-1234").unwrap();
        assert_eq!(config.account, "dbc-1234");
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.token.is_none());
        assert!(!config.use_netrc);
    }

    #[test]
    fn test_config_rejects_bad_accounts() {
        for account in ["", "has.dot", "white space", "-leading", "trailing-"] {
            let result = DatabricksConfig::new(account);
            assert!(
                matches!(result, Err(Error::Config(_))),
                "account {account:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_config_builder() {
        let config = DatabricksConfig::new("acme")
            .unwrap()
            .with_token("dapi-secret")
            .with_timeout(5)
            .with_netrc(true);

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.use_netrc);
        assert_eq!(
            config.token.as_ref().map(ExposeSecret::expose_secret),
            Some("dapi-secret")
        );
    }

    #[test]
    fn test_config_timeout_validation() {
        let config = DatabricksConfig::new("acme").unwrap().with_timeout(0);
        assert!(config.validate().is_err());

        let config = DatabricksConfig::new("acme").unwrap().with_timeout(301);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_skips_token() {
        let config = DatabricksConfig::new("acme")
            .unwrap()
            .with_token("dapi-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("dapi-secret"));
        assert!(!json.contains("token"));
        assert!(!json.contains("base_url"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: DatabricksConfig = serde_json::from_str(r#"{"account":"acme"}"#).unwrap();
        assert_eq!(config.request_timeout_secs, 60);
        assert!(!config.use_netrc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_for_account() {
        let url = base_url_for_account("dbc-1234").unwrap();
        assert_eq!(url.as_str(), "https://dbc-1234.cloud.databricks.com/api/");
        assert_eq!(
            url.join("2.0/clusters/list").unwrap().as_str(),
            "https://dbc-1234.cloud.databricks.com/api/2.0/clusters/list"
        );
    }

    #[test]
    fn test_resolve_base_url_prefers_override() {
        let config = DatabricksConfig::new("acme")
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/api");
        let url = config.resolve_base_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/");

        let config = DatabricksConfig::new("acme").unwrap();
        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "https://acme.cloud.databricks.com/api/"
        );
    }

    #[test]
    fn test_normalize_base_url_errors() {
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("mailto:someone@example.com").is_err());
        assert_eq!(
            normalize_base_url("http://localhost:9000/").unwrap().as_str(),
            "http://localhost:9000/"
        );
    }
}
