//! Cluster endpoints: lifecycle, sizing, metadata and events.

pub mod client;
pub mod models;

pub use client::ClustersClient;
pub use models::{
    Autoscale, AwsAttributes, AwsAvailability, ClusterCreateRequest, ClusterEditRequest,
    ClusterEvent, ClusterEventType, ClusterEventsRequest, ClusterEventsResponse, ClusterInfo,
    ClusterLogConf, ClusterSize, ClusterSource, ClusterState, ClusterZones, DbfsStorageInfo,
    EbsVolumeType, EventDetails, InitScriptInfo, ListOrder, LogSyncStatus, NewCluster, NodeType,
    S3StorageInfo, SparkNode, SparkNodeAwsAttributes, SparkVersion, TerminationReason,
};
