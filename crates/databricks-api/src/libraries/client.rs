//! Asynchronous libraries client implementation.

use super::models::{ClusterLibraryStatuses, Library, LibraryFullStatus};
use crate::Result;
use databricks_core::query::QueryParams;
use databricks_core::{ApiClient, ClusterId, Error};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct LibraryChange<'a> {
    cluster_id: &'a ClusterId,
    libraries: &'a [Library],
}

#[derive(Default, Deserialize)]
struct AllStatuses {
    #[serde(default)]
    statuses: Vec<ClusterLibraryStatuses>,
}

#[derive(Default, Deserialize)]
struct ClusterStatus {
    #[serde(default)]
    library_statuses: Vec<LibraryFullStatus>,
}

/// Handle for the `libraries` endpoints.
#[derive(Debug, Clone)]
pub struct LibrariesClient {
    api: ApiClient,
}

impl LibrariesClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Library statuses of every cluster.
    pub async fn all_cluster_statuses(&self) -> Result<Vec<ClusterLibraryStatuses>> {
        let all: AllStatuses = self
            .api
            .get_json("2.0/libraries/all-cluster-statuses", &[])
            .await?;
        Ok(all.statuses)
    }

    /// Library statuses of a single cluster.
    pub async fn cluster_status(&self, cluster_id: &ClusterId) -> Result<Vec<LibraryFullStatus>> {
        let query = QueryParams::new().with("cluster_id", cluster_id);
        let status: ClusterStatus = self
            .api
            .get_json("2.0/libraries/cluster-status", query.as_pairs())
            .await?;
        Ok(status.library_statuses)
    }

    /// Install libraries on a cluster. Installation is asynchronous.
    pub async fn install(&self, cluster_id: &ClusterId, libraries: &[Library]) -> Result<()> {
        self.change("2.0/libraries/install", cluster_id, libraries)
            .await
    }

    /// Mark libraries for removal at the next cluster restart.
    pub async fn uninstall(&self, cluster_id: &ClusterId, libraries: &[Library]) -> Result<()> {
        self.change("2.0/libraries/uninstall", cluster_id, libraries)
            .await
    }

    async fn change(&self, path: &str, cluster_id: &ClusterId, libraries: &[Library]) -> Result<()> {
        if libraries.is_empty() {
            return Err(Error::Validation(
                "at least one library is required".to_string(),
            ));
        }
        let body = LibraryChange {
            cluster_id,
            libraries,
        };
        self.api.post_unit(path, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::models::LibraryInstallStatus;
    use crate::test_support::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn all_cluster_statuses_unwraps_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/libraries/all-cluster-statuses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statuses": [{
                    "cluster_id": "c-1",
                    "library_statuses": [{
                        "library": {"jar": "dbfs:/a.jar"},
                        "status": "INSTALLED",
                        "is_library_for_all_clusters": false
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let statuses = test_client(&server)
            .libraries()
            .all_cluster_statuses()
            .await
            .unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].cluster_id.as_str(), "c-1");
        assert_eq!(
            statuses[0].library_statuses[0].status,
            LibraryInstallStatus::INSTALLED
        );
    }

    #[tokio::test]
    async fn cluster_status_queries_cluster_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/libraries/cluster-status"))
            .and(query_param("cluster_id", "c-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster_id": "c-1",
                "library_statuses": [{"library": {"pypi": {"package": "nltk"}}, "status": "FAILED", "messages": ["boom"]}]
            })))
            .mount(&server)
            .await;

        let statuses = test_client(&server)
            .libraries()
            .cluster_status(&ClusterId::new("c-1"))
            .await
            .unwrap();
        assert_eq!(statuses[0].status, LibraryInstallStatus::FAILED);
        assert_eq!(statuses[0].messages, vec!["boom".to_string()]);
    }

    #[tokio::test]
    async fn install_and_uninstall_post_libraries() {
        let server = MockServer::start().await;
        for action in ["install", "uninstall"] {
            Mock::given(method("POST"))
                .and(path(format!("/api/2.0/libraries/{action}").as_str()))
                .and(body_json(json!({
                    "cluster_id": "c-1",
                    "libraries": [{"whl": "dbfs:/a.whl"}, {"maven": {"coordinates": "a:b:1"}}]
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let libraries = test_client(&server).libraries();
        let id = ClusterId::new("c-1");
        let libs = [Library::whl("dbfs:/a.whl"), Library::maven("a:b:1")];
        libraries.install(&id, &libs).await.unwrap();
        libraries.uninstall(&id, &libs).await.unwrap();
    }

    #[tokio::test]
    async fn empty_library_list_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let libraries = test_client(&server).libraries();
        let id = ClusterId::new("c-1");
        assert!(matches!(
            libraries.install(&id, &[]).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            libraries.uninstall(&id, &[]).await,
            Err(Error::Validation(_))
        ));
    }
}
