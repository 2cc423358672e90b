//! Asynchronous secrets client implementation.

use super::models::{AclItem, AclPermission, SecretMetadata, SecretScope};
use crate::Result;
use databricks_core::query::QueryParams;
use databricks_core::types::base64_bytes;
use databricks_core::ApiClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct CreateScope<'a> {
    scope: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_manage_principal: Option<&'a str>,
}

#[derive(Serialize)]
struct ScopeRef<'a> {
    scope: &'a str,
}

#[derive(Serialize)]
struct PutString<'a> {
    scope: &'a str,
    key: &'a str,
    string_value: &'a str,
}

#[derive(Serialize)]
struct PutBytes<'a> {
    scope: &'a str,
    key: &'a str,
    #[serde(with = "base64_bytes")]
    bytes_value: &'a [u8],
}

#[derive(Serialize)]
struct SecretRef<'a> {
    scope: &'a str,
    key: &'a str,
}

#[derive(Serialize)]
struct PutAcl<'a> {
    scope: &'a str,
    principal: &'a str,
    permission: &'a AclPermission,
}

#[derive(Serialize)]
struct AclRef<'a> {
    scope: &'a str,
    principal: &'a str,
}

#[derive(Default, Deserialize)]
struct ScopeList {
    #[serde(default)]
    scopes: Vec<SecretScope>,
}

#[derive(Default, Deserialize)]
struct SecretList {
    #[serde(default)]
    secrets: Vec<SecretMetadata>,
}

#[derive(Default, Deserialize)]
struct AclList {
    #[serde(default)]
    items: Vec<AclItem>,
}

/// Handle for the `secrets` endpoints.
#[derive(Debug, Clone)]
pub struct SecretsClient {
    api: ApiClient,
}

impl SecretsClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Create a scope. Without `initial_manage_principal` the creator gets
    /// `MANAGE`; pass `users` to grant it to everyone.
    pub async fn create_scope(
        &self,
        scope: &str,
        initial_manage_principal: Option<&str>,
    ) -> Result<()> {
        let body = CreateScope {
            scope,
            initial_manage_principal,
        };
        self.api
            .post_unit("2.0/secrets/scopes/create", &body)
            .await
    }

    /// Delete a scope with all its secrets and ACLs.
    pub async fn delete_scope(&self, scope: &str) -> Result<()> {
        self.api
            .post_unit("2.0/secrets/scopes/delete", &ScopeRef { scope })
            .await
    }

    /// List all scopes.
    pub async fn list_scopes(&self) -> Result<Vec<SecretScope>> {
        let list: ScopeList = self.api.get_json("2.0/secrets/scopes/list", &[]).await?;
        Ok(list.scopes)
    }

    /// Store a UTF-8 secret, replacing any value under the same key.
    pub async fn put_secret(&self, scope: &str, key: &str, value: &SecretString) -> Result<()> {
        let body = PutString {
            scope,
            key,
            string_value: value.expose_secret(),
        };
        self.api.post_unit("2.0/secrets/put", &body).await
    }

    /// Store a binary secret, replacing any value under the same key.
    pub async fn put_secret_bytes(&self, scope: &str, key: &str, value: &[u8]) -> Result<()> {
        let body = PutBytes {
            scope,
            key,
            bytes_value: value,
        };
        self.api.post_unit("2.0/secrets/put", &body).await
    }

    /// Delete a secret.
    pub async fn delete_secret(&self, scope: &str, key: &str) -> Result<()> {
        self.api
            .post_unit("2.0/secrets/delete", &SecretRef { scope, key })
            .await
    }

    /// List the secret keys of a scope.
    pub async fn list_secrets(&self, scope: &str) -> Result<Vec<SecretMetadata>> {
        let query = QueryParams::new().with("scope", scope);
        let list: SecretList = self
            .api
            .get_json("2.0/secrets/list", query.as_pairs())
            .await?;
        Ok(list.secrets)
    }

    /// Grant or replace the permission of a principal on a scope.
    pub async fn put_acl(
        &self,
        scope: &str,
        principal: &str,
        permission: &AclPermission,
    ) -> Result<()> {
        let body = PutAcl {
            scope,
            principal,
            permission,
        };
        self.api.post_unit("2.0/secrets/acls/put", &body).await
    }

    /// Remove the permission of a principal on a scope.
    pub async fn delete_acl(&self, scope: &str, principal: &str) -> Result<()> {
        self.api
            .post_unit("2.0/secrets/acls/delete", &AclRef { scope, principal })
            .await
    }

    /// Fetch the permission of a principal on a scope.
    pub async fn get_acl(&self, scope: &str, principal: &str) -> Result<AclItem> {
        let query = QueryParams::new()
            .with("scope", scope)
            .with("principal", principal);
        self.api
            .get_json("2.0/secrets/acls/get", query.as_pairs())
            .await
    }

    /// List all ACLs of a scope.
    pub async fn list_acls(&self, scope: &str) -> Result<Vec<AclItem>> {
        let query = QueryParams::new().with("scope", scope);
        let list: AclList = self
            .api
            .get_json("2.0/secrets/acls/list", query.as_pairs())
            .await?;
        Ok(list.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn expect_post(server: &MockServer, endpoint: &str, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/api/2.0/secrets/{endpoint}").as_str()))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn scope_lifecycle() {
        let server = MockServer::start().await;
        expect_post(
            &server,
            "scopes/create",
            json!({"scope": "etl", "initial_manage_principal": "users"}),
        )
        .await;
        expect_post(&server, "scopes/delete", json!({"scope": "etl"})).await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/secrets/scopes/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scopes": [{"name": "etl", "backend_type": "DATABRICKS"}]
            })))
            .mount(&server)
            .await;

        let secrets = test_client(&server).secrets();
        secrets.create_scope("etl", Some("users")).await.unwrap();
        let scopes = secrets.list_scopes().await.unwrap();
        assert_eq!(scopes[0].name, "etl");
        assert_eq!(
            scopes[0].backend_type,
            crate::secrets::ScopeBackendType::DATABRICKS
        );
        secrets.delete_scope("etl").await.unwrap();
    }

    #[tokio::test]
    async fn create_scope_omits_missing_principal() {
        let server = MockServer::start().await;
        expect_post(&server, "scopes/create", json!({"scope": "solo"})).await;

        test_client(&server)
            .secrets()
            .create_scope("solo", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn put_secret_variants() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/secrets/put"))
            .and(body_json(json!({"scope": "etl", "key": "pw", "string_value": "hunter2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/secrets/put"))
            .and(body_json(json!({"scope": "etl", "key": "blob", "bytes_value": "AAEC"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        expect_post(&server, "delete", json!({"scope": "etl", "key": "pw"})).await;

        let secrets = test_client(&server).secrets();
        let value = SecretString::from("hunter2".to_string());
        secrets.put_secret("etl", "pw", &value).await.unwrap();
        secrets
            .put_secret_bytes("etl", "blob", &[0, 1, 2])
            .await
            .unwrap();
        secrets.delete_secret("etl", "pw").await.unwrap();
    }

    #[tokio::test]
    async fn list_secrets_queries_scope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/secrets/list"))
            .and(query_param("scope", "etl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secrets": [{"key": "pw", "last_updated_timestamp": 1_515_035_460_000_i64}]
            })))
            .mount(&server)
            .await;

        let secrets = test_client(&server).secrets().list_secrets("etl").await.unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets[0].key, "pw");
        assert!(secrets[0].last_updated_timestamp.is_some());
    }

    #[tokio::test]
    async fn acl_operations() {
        let server = MockServer::start().await;
        expect_post(
            &server,
            "acls/put",
            json!({"scope": "etl", "principal": "data-eng", "permission": "READ"}),
        )
        .await;
        expect_post(
            &server,
            "acls/delete",
            json!({"scope": "etl", "principal": "data-eng"}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/secrets/acls/get"))
            .and(query_param("scope", "etl"))
            .and(query_param("principal", "data-eng"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"principal": "data-eng", "permission": "READ"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/secrets/acls/list"))
            .and(query_param("scope", "etl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"principal": "admins", "permission": "MANAGE"},
                    {"principal": "data-eng", "permission": "READ"}
                ]
            })))
            .mount(&server)
            .await;

        let secrets = test_client(&server).secrets();
        secrets
            .put_acl("etl", "data-eng", &AclPermission::READ)
            .await
            .unwrap();
        let acl = secrets.get_acl("etl", "data-eng").await.unwrap();
        assert_eq!(acl.permission, AclPermission::READ);
        let acls = secrets.list_acls("etl").await.unwrap();
        assert_eq!(acls.len(), 2);
        assert_eq!(acls[0].permission, AclPermission::MANAGE);
        secrets.delete_acl("etl", "data-eng").await.unwrap();
    }
}
