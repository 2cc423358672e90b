//! Job and job run endpoints.

pub mod client;
pub mod models;

pub use client::JobsClient;
pub use models::{
    ClusterInstance, ClusterSpec, CronSchedule, Job, JobCreateRequest, JobEmailNotifications,
    JobSettings, JobTask, NotebookOutput, NotebookTask, Run, RunLifeCycleState, RunNowRequest,
    RunNowResponse, RunOutput, RunParameters, RunResultState, RunState, RunSubmitRequest,
    RunsListRequest, RunsPage, SparkJarTask, SparkPythonTask, SparkSubmitTask, TriggerType,
    ViewItem, ViewType, ViewsToExport,
};
