//! Asynchronous cluster client implementation.

use super::models::{
    Autoscale, ClusterCreateRequest, ClusterEditRequest, ClusterEventsRequest,
    ClusterEventsResponse, ClusterInfo, ClusterZones, NodeType, SparkVersion,
};
use crate::Result;
use databricks_core::query::QueryParams;
use databricks_core::{ApiClient, ClusterId, Error};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

#[derive(Serialize)]
struct ClusterRef<'a> {
    cluster_id: &'a ClusterId,
}

#[derive(Serialize)]
struct ResizeWorkers<'a> {
    cluster_id: &'a ClusterId,
    num_workers: i32,
}

#[derive(Serialize)]
struct ResizeAutoscale<'a> {
    cluster_id: &'a ClusterId,
    autoscale: Autoscale,
}

#[derive(Default, Deserialize)]
struct CreatedCluster {
    #[serde(default)]
    cluster_id: ClusterId,
}

#[derive(Default, Deserialize)]
struct ClusterList {
    #[serde(default)]
    clusters: Vec<ClusterInfo>,
}

#[derive(Default, Deserialize)]
struct NodeTypeList {
    #[serde(default)]
    node_types: Vec<NodeType>,
}

#[derive(Default, Deserialize)]
struct SparkVersionList {
    #[serde(default)]
    versions: Vec<SparkVersion>,
}

/// Handle for the `clusters` endpoints.
#[derive(Debug, Clone)]
pub struct ClustersClient {
    api: ApiClient,
}

impl ClustersClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Create a cluster and return its identifier.
    ///
    /// The call returns once the cluster is `PENDING`; it does not wait for
    /// the cluster to start.
    pub async fn create(&self, request: &ClusterCreateRequest) -> Result<ClusterId> {
        let created: CreatedCluster = self.api.post_json("2.0/clusters/create", request).await?;
        Ok(created.cluster_id)
    }

    /// Replace the configuration of a cluster. A running cluster is restarted.
    pub async fn edit(&self, request: &ClusterEditRequest) -> Result<()> {
        self.api.post_unit("2.0/clusters/edit", request).await
    }

    /// Start a terminated cluster.
    pub async fn start(&self, cluster_id: &ClusterId) -> Result<()> {
        self.post_cluster("2.0/clusters/start", cluster_id).await
    }

    /// Restart a running cluster.
    pub async fn restart(&self, cluster_id: &ClusterId) -> Result<()> {
        self.post_cluster("2.0/clusters/restart", cluster_id).await
    }

    /// Resize a cluster to a fixed number of workers.
    pub async fn resize_workers(&self, cluster_id: &ClusterId, num_workers: i32) -> Result<()> {
        if num_workers < 0 {
            return Err(Error::Validation(format!(
                "num_workers must not be negative, got {num_workers}"
            )));
        }
        let body = ResizeWorkers {
            cluster_id,
            num_workers,
        };
        self.api.post_unit("2.0/clusters/resize", &body).await
    }

    /// Switch a cluster to autoscaling within the given bounds.
    pub async fn resize_autoscale(&self, cluster_id: &ClusterId, autoscale: Autoscale) -> Result<()> {
        if autoscale.min_workers < 0 || autoscale.min_workers > autoscale.max_workers {
            return Err(Error::Validation(format!(
                "invalid autoscale bounds {}..{}",
                autoscale.min_workers, autoscale.max_workers
            )));
        }
        let body = ResizeAutoscale {
            cluster_id,
            autoscale,
        };
        self.api.post_unit("2.0/clusters/resize", &body).await
    }

    /// Terminate a cluster. Its configuration is kept for 30 days.
    pub async fn terminate(&self, cluster_id: &ClusterId) -> Result<()> {
        self.post_cluster("2.0/clusters/delete", cluster_id).await
    }

    /// Permanently delete a cluster.
    pub async fn delete(&self, cluster_id: &ClusterId) -> Result<()> {
        self.post_cluster("2.0/clusters/permanent-delete", cluster_id)
            .await
    }

    /// Fetch a single cluster.
    pub async fn get(&self, cluster_id: &ClusterId) -> Result<ClusterInfo> {
        let query = QueryParams::new().with("cluster_id", cluster_id);
        self.api
            .get_json("2.0/clusters/get", query.as_pairs())
            .await
    }

    /// Keep a cluster's configuration after termination.
    pub async fn pin(&self, cluster_id: &ClusterId) -> Result<()> {
        self.post_cluster("2.0/clusters/pin", cluster_id).await
    }

    /// Allow a cluster's configuration to be removed after termination.
    pub async fn unpin(&self, cluster_id: &ClusterId) -> Result<()> {
        self.post_cluster("2.0/clusters/unpin", cluster_id).await
    }

    /// List pinned clusters, active clusters and clusters terminated in the
    /// last 30 days.
    pub async fn list(&self) -> Result<Vec<ClusterInfo>> {
        let list: ClusterList = self.api.get_json("2.0/clusters/list", &[]).await?;
        Ok(list.clusters)
    }

    /// List availability zones clusters can be created in.
    pub async fn list_zones(&self) -> Result<ClusterZones> {
        self.api.get_json("2.0/clusters/list-zones", &[]).await
    }

    /// List supported node types.
    pub async fn list_node_types(&self) -> Result<Vec<NodeType>> {
        let list: NodeTypeList = self
            .api
            .get_json("2.0/clusters/list-node-types", &[])
            .await?;
        Ok(list.node_types)
    }

    /// List available runtime versions.
    pub async fn spark_versions(&self) -> Result<Vec<SparkVersion>> {
        let list: SparkVersionList = self
            .api
            .get_json("2.0/clusters/spark-versions", &[])
            .await?;
        Ok(list.versions)
    }

    /// Fetch one page of cluster events.
    pub async fn events(&self, request: &ClusterEventsRequest) -> Result<ClusterEventsResponse> {
        request
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;
        self.api.post_json("2.0/clusters/events", request).await
    }

    async fn post_cluster(&self, path: &str, cluster_id: &ClusterId) -> Result<()> {
        self.api.post_unit(path, &ClusterRef { cluster_id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::models::{ClusterState, NewCluster};
    use crate::test_support::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_returns_cluster_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/create"))
            .and(body_json(json!({
                "num_workers": 2,
                "cluster_name": "etl",
                "spark_version": "7.3.x-scala2.12",
                "node_type_id": "i3.xlarge"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"cluster_id": "expected-123"})),
            )
            .mount(&server)
            .await;

        let request = NewCluster::new("7.3.x-scala2.12", "i3.xlarge")
            .with_name("etl")
            .with_num_workers(2);
        let cluster_id = test_client(&server).cluster().create(&request).await.unwrap();
        assert_eq!(cluster_id.as_str(), "expected-123");
    }

    #[tokio::test]
    async fn lifecycle_actions_post_cluster_id() {
        let server = MockServer::start().await;
        for action in ["start", "restart", "delete", "permanent-delete", "pin", "unpin"] {
            Mock::given(method("POST"))
                .and(path(format!("/api/2.0/clusters/{action}").as_str()))
                .and(body_json(json!({"cluster_id": "abc"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let clusters = test_client(&server).cluster();
        let id = ClusterId::new("abc");
        clusters.start(&id).await.unwrap();
        clusters.restart(&id).await.unwrap();
        clusters.terminate(&id).await.unwrap();
        clusters.delete(&id).await.unwrap();
        clusters.pin(&id).await.unwrap();
        clusters.unpin(&id).await.unwrap();
    }

    #[tokio::test]
    async fn start_failure_embeds_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/start"))
            .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .cluster()
            .start(&ClusterId::new("abc"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(418));
        assert!(err.to_string().contains("teapot"));
    }

    #[tokio::test]
    async fn resize_variants() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/resize"))
            .and(body_json(json!({"cluster_id": "abc", "num_workers": 5})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/resize"))
            .and(body_json(json!({
                "cluster_id": "abc",
                "autoscale": {"min_workers": 1, "max_workers": 3}
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let clusters = test_client(&server).cluster();
        let id = ClusterId::new("abc");
        clusters.resize_workers(&id, 5).await.unwrap();
        clusters
            .resize_autoscale(&id, Autoscale::new(1, 3))
            .await
            .unwrap();

        assert!(matches!(
            clusters.resize_workers(&id, -1).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            clusters.resize_autoscale(&id, Autoscale::new(4, 2)).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn get_uses_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/get"))
            .and(query_param("cluster_id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster_id": "abc",
                "cluster_name": "etl",
                "state": "RUNNING",
                "num_workers": 2
            })))
            .mount(&server)
            .await;

        let info = test_client(&server)
            .cluster()
            .get(&ClusterId::new("abc"))
            .await
            .unwrap();
        assert_eq!(info.cluster_name.as_deref(), Some("etl"));
        assert_eq!(info.state, Some(ClusterState::RUNNING));
        assert_eq!(info.num_workers, Some(2));
    }

    #[tokio::test]
    async fn list_endpoints_unwrap_envelopes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "clusters": [{"cluster_id": "a"}, {"cluster_id": "b"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/list-node-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "node_types": [{"node_type_id": "r3.xlarge", "memory_mb": 31232, "num_cores": 4.0}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/spark-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "versions": [{"key": "7.3.x-scala2.12", "name": "7.3 LTS"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/list-zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "zones": ["us-west-2a", "us-west-2b"],
                "default_zone": "us-west-2a"
            })))
            .mount(&server)
            .await;

        let clusters = test_client(&server).cluster();
        let list = clusters.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].cluster_id.as_str(), "b");

        let node_types = clusters.list_node_types().await.unwrap();
        assert_eq!(node_types[0].memory_mb, 31232);

        let versions = clusters.spark_versions().await.unwrap();
        assert_eq!(versions[0].name, "7.3 LTS");

        let zones = clusters.list_zones().await.unwrap();
        assert_eq!(zones.zones.len(), 2);
        assert_eq!(zones.default_zone, "us-west-2a");
    }

    #[tokio::test]
    async fn empty_list_body_is_empty_vec() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/list"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let list = test_client(&server).cluster().list().await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn events_posts_request_and_validates_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/events"))
            .and(body_json(json!({"cluster_id": "abc", "limit": 50})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [{"cluster_id": "abc", "timestamp": 1_535_834_470_000_i64, "type": "RUNNING"}],
                "next_page": {"cluster_id": "abc", "offset": 50, "limit": 50},
                "total_count": 120
            })))
            .expect(1)
            .mount(&server)
            .await;

        let clusters = test_client(&server).cluster();
        let page = clusters
            .events(&ClusterEventsRequest::new("abc").with_limit(50))
            .await
            .unwrap();
        assert_eq!(page.events.len(), 1);
        assert_eq!(page.total_count, 120);
        assert_eq!(page.next_page.and_then(|next| next.offset), Some(50));

        let err = clusters
            .events(&ClusterEventsRequest::new("abc").with_limit(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
