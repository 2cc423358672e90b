//! Asynchronous token client implementation.

use super::models::{CreatedToken, PublicTokenInfo};
use crate::Result;
use databricks_core::{ApiClient, TokenId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct CreateToken<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    lifetime_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Serialize)]
struct TokenRef<'a> {
    token_id: &'a TokenId,
}

#[derive(Default, Deserialize)]
struct Created {
    #[serde(default)]
    token_value: String,
    #[serde(default)]
    token_info: PublicTokenInfo,
}

#[derive(Default, Deserialize)]
struct TokenList {
    #[serde(default)]
    token_infos: Vec<PublicTokenInfo>,
}

/// Handle for the `token` endpoints.
#[derive(Debug, Clone)]
pub struct TokenClient {
    api: ApiClient,
}

impl TokenClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Create a token for the calling user.
    ///
    /// Without `lifetime_seconds` the token never expires.
    pub async fn create(
        &self,
        lifetime_seconds: Option<i64>,
        comment: Option<&str>,
    ) -> Result<CreatedToken> {
        let body = CreateToken {
            lifetime_seconds,
            comment,
        };
        let created: Created = self.api.post_json("2.0/token/create", &body).await?;
        Ok(CreatedToken {
            token_value: SecretString::from(created.token_value),
            token_info: created.token_info,
        })
    }

    /// List the tokens of the calling user.
    pub async fn list(&self) -> Result<Vec<PublicTokenInfo>> {
        let list: TokenList = self.api.get_json("2.0/token/list", &[]).await?;
        Ok(list.token_infos)
    }

    /// Revoke a token.
    pub async fn revoke(&self, token_id: &TokenId) -> Result<()> {
        self.api
            .post_unit("2.0/token/delete", &TokenRef { token_id })
            .await
    }
}
