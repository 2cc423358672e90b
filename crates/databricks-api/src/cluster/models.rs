//! Cluster request and response models.

use chrono::{DateTime, Utc};
use databricks_core::open_string;
use databricks_core::ClusterId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

open_string! {
    /// Lifecycle state of a cluster.
    ///
    /// `PENDING` moves to `RUNNING` or `TERMINATING`; `RUNNING` moves to
    /// `RESIZING`, `RESTARTING` or `TERMINATING`; `TERMINATING` ends in
    /// `TERMINATED`.
    ClusterState {
        PENDING = "PENDING",
        RUNNING = "RUNNING",
        RESTARTING = "RESTARTING",
        RESIZING = "RESIZING",
        TERMINATING = "TERMINATING",
        TERMINATED = "TERMINATED",
        ERROR = "ERROR",
        UNKNOWN = "UNKNOWN",
    }
}

open_string! {
    /// How AWS instances are acquired.
    AwsAvailability {
        SPOT = "SPOT",
        ON_DEMAND = "ON_DEMAND",
        SPOT_WITH_FALLBACK = "SPOT_WITH_FALLBACK",
    }
}

open_string! {
    /// EBS volume types supported for cluster nodes.
    EbsVolumeType {
        GENERAL_PURPOSE_SSD = "GENERAL_PURPOSE_SSD",
        THROUGHPUT_OPTIMIZED_HDD = "THROUGHPUT_OPTIMIZED_HDD",
    }
}

open_string! {
    /// Service that created a cluster.
    ClusterSource {
        UI = "UI",
        JOB = "JOB",
        API = "API",
    }
}

open_string! {
    /// Sort order of listed events.
    ListOrder {
        DESC = "DESC",
        ASC = "ASC",
    }
}

open_string! {
    /// Kind of a cluster event.
    ClusterEventType {
        CREATING = "CREATING",
        DID_NOT_EXPAND_DISK = "DID_NOT_EXPAND_DISK",
        EXPANDED_DISK = "EXPANDED_DISK",
        FAILED_TO_EXPAND_DISK = "FAILED_TO_EXPAND_DISK",
        INIT_SCRIPTS_STARTING = "INIT_SCRIPTS_STARTING",
        INIT_SCRIPTS_FINISHED = "INIT_SCRIPTS_FINISHED",
        STARTING = "STARTING",
        RESTARTING = "RESTARTING",
        TERMINATING = "TERMINATING",
        EDITED = "EDITED",
        RUNNING = "RUNNING",
        RESIZING = "RESIZING",
        UPSIZE_COMPLETED = "UPSIZE_COMPLETED",
        NODES_LOST = "NODES_LOST",
        DRIVER_HEALTHY = "DRIVER_HEALTHY",
        DRIVER_UNAVAILABLE = "DRIVER_UNAVAILABLE",
        SPARK_EXCEPTION = "SPARK_EXCEPTION",
        DRIVER_NOT_RESPONDING = "DRIVER_NOT_RESPONDING",
        DBFS_DOWN = "DBFS_DOWN",
        METASTORE_DOWN = "METASTORE_DOWN",
        AUTOSCALING_STATS_REPORT = "AUTOSCALING_STATS_REPORT",
        NODE_BLACKLISTED = "NODE_BLACKLISTED",
        PINNED = "PINNED",
        UNPINNED = "UNPINNED",
    }
}

/// Autoscaling bounds of a cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoscale {
    /// Minimum number of workers
    pub min_workers: i32,
    /// Maximum number of workers
    pub max_workers: i32,
}

impl Autoscale {
    /// Create autoscaling bounds.
    #[must_use]
    pub const fn new(min_workers: i32, max_workers: i32) -> Self {
        Self {
            min_workers,
            max_workers,
        }
    }
}

/// AWS specific attributes of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsAttributes {
    /// Number of nodes, starting with the driver, placed on on-demand instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_on_demand: Option<i32>,
    /// Availability type for nodes after `first_on_demand`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<AwsAvailability>,
    /// Availability zone, e.g. `us-west-2a`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    /// Instance profile ARN for the cluster nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_profile_arn: Option<String>,
    /// Max spot price as a percentage of the on-demand price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_bid_price_percent: Option<i32>,
    /// Type of the attached EBS volumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_type: Option<EbsVolumeType>,
    /// Number of EBS volumes per instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_count: Option<i32>,
    /// Size of each EBS volume in GiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_size: Option<i32>,
}

/// S3 destination for logs or init scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3StorageInfo {
    /// S3 destination, e.g. `s3://bucket/prefix`.
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// S3 region.
    pub region: Option<String>,
    /// S3 endpoint; either region or endpoint must be set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Enable server side encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_encryption: Option<bool>,
    /// Encryption type, `sse-s3` or `sse-kms`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<String>,
    /// KMS key used with `sse-kms`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key: Option<String>,
    /// Canned access control list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canned_acl: Option<String>,
}

/// DBFS destination for logs or init scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbfsStorageInfo {
    /// DBFS destination, e.g. `dbfs:/cluster-logs`.
    #[serde(default)]
    pub destination: String,
}

/// Where cluster logs are delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterLogConf {
    /// DBFS location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbfs: Option<DbfsStorageInfo>,
    /// S3 location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3StorageInfo>,
}

/// Location of an init script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitScriptInfo {
    /// DBFS location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbfs: Option<DbfsStorageInfo>,
    /// S3 location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3StorageInfo>,
}

/// Specification of a new cluster.
///
/// Used to create clusters, as the `new_cluster` of jobs and runs, and as the
/// attributes reported in cluster events. `num_workers` and `autoscale` are
/// mutually exclusive; the `with_*` setters clear the other one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCluster {
    /// Fixed number of workers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<i32>,
    /// Autoscaling bounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<Autoscale>,
    /// Cluster name; need not be unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Runtime version key, see [`SparkVersion`].
    pub spark_version: String,
    /// Spark configuration key/value pairs.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub spark_conf: BTreeMap<String, String>,
    /// AWS attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_attributes: Option<AwsAttributes>,
    /// Node type of the workers, see [`NodeType`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type_id: Option<String>,
    /// Node type of the driver; defaults to `node_type_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_node_type_id: Option<String>,
    /// SSH public keys added to every node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_public_keys: Vec<String>,
    /// Tags applied to the cluster resources.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_tags: BTreeMap<String, String>,
    /// Log delivery configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_log_conf: Option<ClusterLogConf>,
    /// Init scripts run on every node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub init_scripts: Vec<InitScriptInfo>,
    /// Environment variables.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub spark_env_vars: BTreeMap<String, String>,
    /// Minutes of inactivity before automatic termination; 0 disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autotermination_minutes: Option<i32>,
    /// Autoscale local storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_elastic_disk: Option<bool>,
    /// Instance pool to draw nodes from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_pool_id: Option<String>,
}

impl NewCluster {
    /// Create a specification with the required runtime and node type.
    #[must_use]
    pub fn new(spark_version: impl Into<String>, node_type_id: impl Into<String>) -> Self {
        Self {
            spark_version: spark_version.into(),
            node_type_id: Some(node_type_id.into()),
            ..Self::default()
        }
    }

    /// Set the cluster name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = Some(name.into());
        self
    }

    /// Use a fixed number of workers.
    #[must_use]
    pub const fn with_num_workers(mut self, num_workers: i32) -> Self {
        self.num_workers = Some(num_workers);
        self.autoscale = None;
        self
    }

    /// Use autoscaling.
    #[must_use]
    pub const fn with_autoscale(mut self, autoscale: Autoscale) -> Self {
        self.autoscale = Some(autoscale);
        self.num_workers = None;
        self
    }

    /// Set the inactivity timeout.
    #[must_use]
    pub const fn with_autotermination_minutes(mut self, minutes: i32) -> Self {
        self.autotermination_minutes = Some(minutes);
        self
    }

    /// Add a Spark configuration entry.
    #[must_use]
    pub fn with_spark_conf(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.spark_conf.insert(key.into(), value.into());
        self
    }

    /// Add a custom tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_tags.insert(key.into(), value.into());
        self
    }
}

/// Body of `clusters/create`.
pub type ClusterCreateRequest = NewCluster;

/// Body of `clusters/edit`: the full new specification of an existing cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterEditRequest {
    /// Cluster to edit.
    pub cluster_id: ClusterId,
    /// New specification.
    #[serde(flatten)]
    pub cluster: NewCluster,
}

/// Size of a cluster, as reported by events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSize {
    /// Fixed number of workers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<i32>,
    /// Autoscaling bounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<Autoscale>,
}

/// AWS attributes of a Spark node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkNodeAwsAttributes {
    /// Whether the node is a spot instance.
    pub is_spot: bool,
}

/// A driver or executor node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkNode {
    /// Private IP address.
    pub private_ip: Option<String>,
    /// Public DNS name.
    pub public_dns: Option<String>,
    /// Node identifier.
    pub node_id: Option<String>,
    /// Cloud instance identifier.
    pub instance_id: Option<String>,
    /// When the node was started.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start_timestamp: Option<DateTime<Utc>>,
    /// AWS attributes.
    pub node_aws_attributes: Option<SparkNodeAwsAttributes>,
    /// Private IP of the host instance.
    pub host_private_ip: Option<String>,
}

/// Status of log delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSyncStatus {
    /// Last delivery attempt.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_attempted: Option<DateTime<Utc>>,
    /// Exception of the last attempt, if it failed.
    pub last_exception: Option<String>,
}

/// Why a cluster terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationReason {
    /// Termination code, e.g. `USER_REQUEST`.
    pub code: Option<String>,
    /// Additional context.
    pub parameters: BTreeMap<String, String>,
}

/// Metadata of a single cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterInfo {
    /// Cluster identifier.
    pub cluster_id: ClusterId,
    /// Fixed number of workers.
    pub num_workers: Option<i32>,
    /// Autoscaling bounds.
    pub autoscale: Option<Autoscale>,
    /// Creator user name.
    pub creator_user_name: Option<String>,
    /// Driver node.
    pub driver: Option<SparkNode>,
    /// Executor nodes.
    pub executors: Vec<SparkNode>,
    /// Canonical Spark context identifier.
    pub spark_context_id: Option<i64>,
    /// JDBC port of the driver.
    pub jdbc_port: Option<i32>,
    /// Cluster name.
    pub cluster_name: Option<String>,
    /// Runtime version key.
    pub spark_version: Option<String>,
    /// Spark configuration.
    pub spark_conf: BTreeMap<String, String>,
    /// AWS attributes.
    pub aws_attributes: Option<AwsAttributes>,
    /// Worker node type.
    pub node_type_id: Option<String>,
    /// Driver node type.
    pub driver_node_type_id: Option<String>,
    /// SSH public keys.
    pub ssh_public_keys: Vec<String>,
    /// Custom tags.
    pub custom_tags: BTreeMap<String, String>,
    /// Log delivery configuration.
    pub cluster_log_conf: Option<ClusterLogConf>,
    /// Init scripts.
    pub init_scripts: Vec<InitScriptInfo>,
    /// Environment variables.
    pub spark_env_vars: BTreeMap<String, String>,
    /// Inactivity timeout in minutes.
    pub autotermination_minutes: Option<i32>,
    /// Autoscale local storage.
    pub enable_elastic_disk: Option<bool>,
    /// Instance pool identifier.
    pub instance_pool_id: Option<String>,
    /// Service that created the cluster.
    pub cluster_source: Option<ClusterSource>,
    /// Current state.
    pub state: Option<ClusterState>,
    /// Message associated with the current state.
    pub state_message: Option<String>,
    /// When the cluster was started.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the cluster terminated.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub terminated_time: Option<DateTime<Utc>>,
    /// When the driver was last lost.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_state_loss_time: Option<DateTime<Utc>>,
    /// Last recorded activity.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_activity_time: Option<DateTime<Utc>>,
    /// Total memory in MiB.
    pub cluster_memory_mb: Option<i64>,
    /// Total cores.
    pub cluster_cores: Option<f32>,
    /// Tags added by Databricks.
    pub default_tags: BTreeMap<String, String>,
    /// Status of log delivery.
    pub cluster_log_status: Option<LogSyncStatus>,
    /// Why the cluster terminated.
    pub termination_reason: Option<TerminationReason>,
}

/// A node type available for clusters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeType {
    /// Identifier used as `node_type_id`.
    pub node_type_id: String,
    /// Memory in MiB.
    pub memory_mb: i32,
    /// Number of cores; may be fractional.
    pub num_cores: f32,
    /// Human readable description.
    pub description: String,
    /// Cloud instance type.
    pub instance_type_id: String,
    /// Whether the node type is deprecated.
    pub is_deprecated: bool,
}

/// A runtime version available for clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkVersion {
    /// Key used as `spark_version`.
    pub key: String,
    /// Display name.
    pub name: String,
}

/// Availability zones usable by clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterZones {
    /// Zone identifiers.
    pub zones: Vec<String>,
    /// Zone used when none is requested.
    pub default_zone: String,
}

/// Body of `clusters/events`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClusterEventsRequest {
    /// Cluster whose events are returned.
    pub cluster_id: ClusterId,
    /// Earliest event time.
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    /// Latest event time.
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Sort order; the server defaults to `DESC`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ListOrder>,
    /// Event types to include; all types when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_types: Vec<ClusterEventType>,
    /// Offset into the result set.
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Page size, at most 500.
    #[validate(range(min = 1, max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ClusterEventsRequest {
    /// Request the events of a cluster.
    #[must_use]
    pub fn new(cluster_id: impl Into<ClusterId>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            ..Self::default()
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the sort order.
    #[must_use]
    pub fn with_order(mut self, order: ListOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Restrict to the given event types.
    #[must_use]
    pub fn with_event_types(mut self, event_types: Vec<ClusterEventType>) -> Self {
        self.event_types = event_types;
        self
    }
}

/// Details of a cluster event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDetails {
    /// Workers at the time of the event.
    pub current_num_workers: Option<i32>,
    /// Target number of workers.
    pub target_num_workers: Option<i32>,
    /// Attributes before an edit.
    pub previous_attributes: Option<NewCluster>,
    /// Attributes after an edit or at creation.
    pub attributes: Option<NewCluster>,
    /// Size before a resize.
    pub previous_cluster_size: Option<ClusterSize>,
    /// Size after a resize or at creation.
    pub cluster_size: Option<ClusterSize>,
    /// Cause of a size change.
    pub cause: Option<String>,
    /// Termination reason.
    pub reason: Option<TerminationReason>,
    /// User that caused the event.
    pub user: Option<String>,
}

/// An event in the history of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterEvent {
    /// Cluster the event belongs to.
    pub cluster_id: ClusterId,
    /// When the event occurred.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: Option<ClusterEventType>,
    /// Event details.
    pub details: EventDetails,
}

/// Response of `clusters/events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterEventsResponse {
    /// Events in the requested order.
    pub events: Vec<ClusterEvent>,
    /// Request for the next page; absent on the last page.
    pub next_page: Option<ClusterEventsRequest>,
    /// Total number of matching events.
    pub total_count: i64,
}
