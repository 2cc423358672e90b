//! Job and run models.

use crate::cluster::NewCluster;
use crate::libraries::Library;
use chrono::{DateTime, Utc};
use databricks_core::open_string;
use databricks_core::{ClusterId, JobId, RunId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

open_string! {
    /// Life cycle state of a run.
    ///
    /// `PENDING` moves to `RUNNING`, then `TERMINATING` and `TERMINATED`.
    /// `SKIPPED` and `INTERNAL_ERROR` are terminal.
    RunLifeCycleState {
        PENDING = "PENDING",
        RUNNING = "RUNNING",
        TERMINATING = "TERMINATING",
        TERMINATED = "TERMINATED",
        SKIPPED = "SKIPPED",
        INTERNAL_ERROR = "INTERNAL_ERROR",
    }
}

impl RunLifeCycleState {
    /// Returns true once the run can no longer change state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        *self == Self::TERMINATED || *self == Self::SKIPPED || *self == Self::INTERNAL_ERROR
    }
}

open_string! {
    /// Outcome of a terminated run.
    RunResultState {
        SUCCESS = "SUCCESS",
        FAILED = "FAILED",
        TIMEDOUT = "TIMEDOUT",
        CANCELED = "CANCELED",
    }
}

open_string! {
    /// What started a run.
    TriggerType {
        PERIODIC = "PERIODIC",
        ONE_TIME = "ONE_TIME",
        RETRY = "RETRY",
    }
}

open_string! {
    /// Views included by `jobs/runs/export`.
    ViewsToExport {
        CODE = "CODE",
        DASHBOARDS = "DASHBOARDS",
        ALL = "ALL",
    }
}

open_string! {
    /// Kind of an exported view.
    ViewType {
        NOTEBOOK = "NOTEBOOK",
        DASHBOARD = "DASHBOARD",
    }
}

/// Runs a notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookTask {
    /// Absolute workspace path of the notebook.
    pub notebook_path: String,
    /// Widget values, overridden by `notebook_params` in `run-now`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub base_parameters: BTreeMap<String, String>,
}

/// Runs the main class of a JAR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkJarTask {
    /// Deprecated; list the JAR in `libraries` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_uri: Option<String>,
    /// Class containing `main`; the JAR must be listed in `libraries`.
    pub main_class_name: String,
    /// Command line parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

/// Runs a Python file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkPythonTask {
    /// DBFS URI of the file.
    pub python_file: String,
    /// Command line parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

/// Runs `spark-submit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkSubmitTask {
    /// Command line parameters.
    pub parameters: Vec<String>,
}

/// Quartz cron schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronSchedule {
    /// Quartz expression, e.g. `0 15 22 ? * *`.
    pub quartz_cron_expression: String,
    /// Java time zone id, e.g. `Europe/Berlin`.
    pub timezone_id: String,
}

/// Addresses notified about run events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEmailNotifications {
    /// Notified when a run starts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_start: Vec<String>,
    /// Notified when a run succeeds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_success: Vec<String>,
    /// Notified when a run fails.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_failure: Vec<String>,
}

/// Settings of a job.
///
/// Set exactly one of `existing_cluster_id` and `new_cluster`, and exactly
/// one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Run on this existing cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_cluster_id: Option<ClusterId>,
    /// Run on a cluster created for each run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cluster: Option<NewCluster>,
    /// Notebook task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notebook_task: Option<NotebookTask>,
    /// JAR task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_jar_task: Option<SparkJarTask>,
    /// Python file task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_python_task: Option<SparkPythonTask>,
    /// `spark-submit` task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_submit_task: Option<SparkSubmitTask>,
    /// Display name; the server defaults to `Untitled`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Libraries installed on the cluster.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<Library>,
    /// Email notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<JobEmailNotifications>,
    /// Timeout of each run; no timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
    /// Retries of a failed run; `-1` retries indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i32>,
    /// Delay between a failed run and its retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_retry_interval_millis: Option<i32>,
    /// Retry runs that timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_on_timeout: Option<bool>,
    /// Cron schedule; runs only on demand when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<CronSchedule>,
    /// Concurrent run limit, 1 by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_runs: Option<i32>,
}

impl JobSettings {
    /// A named job running a notebook on an existing cluster.
    pub fn notebook(
        name: impl Into<String>,
        cluster_id: impl Into<ClusterId>,
        notebook_path: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            existing_cluster_id: Some(cluster_id.into()),
            notebook_task: Some(NotebookTask {
                notebook_path: notebook_path.into(),
                base_parameters: BTreeMap::new(),
            }),
            ..Self::default()
        }
    }

    /// Run on a new cluster instead of an existing one.
    #[must_use]
    pub fn with_new_cluster(mut self, cluster: NewCluster) -> Self {
        self.existing_cluster_id = None;
        self.new_cluster = Some(cluster);
        self
    }

    /// Run on an existing cluster instead of a new one.
    #[must_use]
    pub fn with_existing_cluster(mut self, cluster_id: impl Into<ClusterId>) -> Self {
        self.new_cluster = None;
        self.existing_cluster_id = Some(cluster_id.into());
        self
    }

    /// Set the schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: CronSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Add a library.
    #[must_use]
    pub fn with_library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }
}

/// Body of `jobs/create`.
pub type JobCreateRequest = JobSettings;

/// A job and its settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    /// Job identifier.
    pub job_id: JobId,
    /// Empty when the creator was deleted.
    pub creator_user_name: String,
    /// Current settings.
    pub settings: JobSettings,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub created_time: Option<DateTime<Utc>>,
}

/// Body of `jobs/run-now`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunNowRequest {
    /// Job identifier.
    pub job_id: JobId,
    /// Parameters of a JAR task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jar_params: Vec<String>,
    /// Widget values of a notebook task.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub notebook_params: BTreeMap<String, String>,
    /// Parameters of a Python task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub python_params: Vec<String>,
    /// Parameters of a `spark-submit` task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spark_submit_params: Vec<String>,
}

impl RunNowRequest {
    /// Run a job with its configured parameters.
    #[must_use]
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            ..Self::default()
        }
    }

    /// Override a notebook widget value.
    #[must_use]
    pub fn with_notebook_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.notebook_params.insert(key.into(), value.into());
        self
    }

    /// Set the JAR task parameters.
    #[must_use]
    pub fn with_jar_params(mut self, params: Vec<String>) -> Self {
        self.jar_params = params;
        self
    }

    /// Set the Python task parameters.
    #[must_use]
    pub fn with_python_params(mut self, params: Vec<String>) -> Self {
        self.python_params = params;
        self
    }
}

/// Response of `jobs/run-now`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunNowResponse {
    /// Globally unique run id.
    pub run_id: RunId,
    /// Sequence number of the run among the runs of its job.
    pub number_in_job: i64,
}

/// Body of `jobs/runs/submit`: a one-time run that does not create a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSubmitRequest {
    /// Run on this existing cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_cluster_id: Option<ClusterId>,
    /// Run on a cluster created for each run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cluster: Option<NewCluster>,
    /// Notebook task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notebook_task: Option<NotebookTask>,
    /// JAR task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_jar_task: Option<SparkJarTask>,
    /// Python file task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_python_task: Option<SparkPythonTask>,
    /// `spark-submit` task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_submit_task: Option<SparkSubmitTask>,
    /// Display name of the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,
    /// Libraries installed on the cluster.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<Library>,
    /// Timeout of each run; no timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
}

/// Query of `jobs/runs/list`.
///
/// `active_only` and `complete_only` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RunsListRequest {
    /// Restrict to the runs of one job.
    pub job_id: Option<JobId>,
    /// Only pending and running runs.
    pub active_only: Option<bool>,
    /// Only terminated runs.
    pub complete_only: Option<bool>,
    /// Offset of the first run, relative to the most recent.
    pub offset: Option<u32>,
    /// Page size, 1 to 1000; the server defaults to 20.
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u32>,
}

impl RunsListRequest {
    /// List runs of all jobs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one job.
    #[must_use]
    pub const fn for_job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Only active runs.
    #[must_use]
    pub const fn active_only(mut self) -> Self {
        self.active_only = Some(true);
        self
    }

    /// Only completed runs.
    #[must_use]
    pub const fn complete_only(mut self) -> Self {
        self.complete_only = Some(true);
        self
    }

    /// Set the offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One page of runs, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunsPage {
    /// Runs of this page.
    pub runs: Vec<Run>,
    /// True if more runs match the query.
    pub has_more: bool,
}

/// State of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    /// Where the run is in its life cycle.
    pub life_cycle_state: RunLifeCycleState,
    /// Set once the run is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_state: Option<RunResultState>,
    /// Human readable detail of the state.
    pub state_message: String,
}

/// The task a run executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTask {
    /// Notebook task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notebook_task: Option<NotebookTask>,
    /// JAR task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_jar_task: Option<SparkJarTask>,
    /// Python file task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_python_task: Option<SparkPythonTask>,
    /// `spark-submit` task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_submit_task: Option<SparkSubmitTask>,
}

/// Cluster a run was configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSpec {
    /// Run on this existing cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_cluster_id: Option<ClusterId>,
    /// Run on a cluster created for each run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cluster: Option<NewCluster>,
    /// Libraries installed on the cluster.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<Library>,
}

/// Cluster a run actually used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterInstance {
    /// Cluster identifier.
    pub cluster_id: ClusterId,
    /// Spark context the run used.
    pub spark_context_id: String,
}

/// Parameters a run was started with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    /// Parameters of a JAR task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jar_params: Vec<String>,
    /// Widget values of a notebook task.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub notebook_params: BTreeMap<String, String>,
    /// Parameters of a Python task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub python_params: Vec<String>,
    /// Parameters of a `spark-submit` task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spark_submit_params: Vec<String>,
}

/// Metadata of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Run {
    /// Job identifier.
    pub job_id: JobId,
    /// Run identifier.
    pub run_id: RunId,
    /// Sequence number of the run among the runs of its job.
    pub number_in_job: i64,
    /// First attempt of a retried run; equal to `run_id` otherwise.
    pub original_attempt_run_id: RunId,
    /// Current state.
    pub state: RunState,
    /// Cron schedule; runs only on demand when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<CronSchedule>,
    /// Task executed by the run.
    pub task: JobTask,
    /// Cluster the run was configured with.
    pub cluster_spec: ClusterSpec,
    /// Cluster the run used.
    pub cluster_instance: ClusterInstance,
    /// Parameters passed to `run-now`.
    pub overriding_parameters: RunParameters,
    /// When the run started.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    /// Milliseconds spent creating the cluster.
    pub setup_duration: i64,
    /// Milliseconds spent running the task.
    pub execution_duration: i64,
    /// Milliseconds spent cleaning up.
    pub cleanup_duration: i64,
    /// What started the run.
    pub trigger: TriggerType,
    /// Creator; empty when the user was deleted.
    pub creator_user_name: String,
    /// URL of the run page in the web UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_page_url: Option<String>,
}

/// An exported view of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewItem {
    /// HTML of the view.
    pub content: String,
    /// Name of the notebook or dashboard.
    pub name: String,
    /// Kind of view.
    #[serde(rename = "type")]
    pub view_type: ViewType,
}

/// Value passed to `dbutils.notebook.exit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookOutput {
    /// First 5 MB of the exit value.
    pub result: String,
    /// True if the result was cut at 5 MB.
    pub truncated: bool,
}

/// Output of a notebook run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutput {
    /// Exit value of the notebook.
    pub result: String,
    /// True if `result` was cut at 5 MB.
    pub truncated: bool,
    /// Metadata of the run.
    pub metadata: Run,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_settings_omit_unset_fields() {
        let settings = JobSettings::notebook("nightly", "c-1", "/Users/a/etl");
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "existing_cluster_id": "c-1",
                "notebook_task": {"notebook_path": "/Users/a/etl"},
                "name": "nightly"
            })
        );
    }

    #[test]
    fn cluster_choice_is_exclusive() {
        let settings = JobSettings::notebook("n", "c-1", "/a")
            .with_new_cluster(NewCluster::new("7.3.x-scala2.12", "i3.xlarge"));
        assert!(settings.existing_cluster_id.is_none());
        let settings = settings.with_existing_cluster("c-2");
        assert!(settings.new_cluster.is_none());
    }

    #[test]
    fn run_decodes_state_and_times() {
        let run: Run = serde_json::from_value(json!({
            "job_id": 1,
            "run_id": 2,
            "number_in_job": 1,
            "state": {"life_cycle_state": "TERMINATED", "result_state": "SUCCESS", "state_message": ""},
            "start_time": 1_457_570_074_236_i64,
            "trigger": "PERIODIC"
        }))
        .unwrap();
        assert_eq!(run.run_id, RunId::new(2));
        assert!(run.state.life_cycle_state.is_terminal());
        assert_eq!(run.state.result_state, Some(RunResultState::SUCCESS));
        assert_eq!(run.start_time.map(|t| t.timestamp_millis()), Some(1_457_570_074_236));
        assert_eq!(run.trigger, TriggerType::PERIODIC);
    }

    #[test]
    fn run_now_request_serializes_params() {
        let request = RunNowRequest::new(JobId::new(5)).with_notebook_param("date", "2020-01-01");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"job_id": 5, "notebook_params": {"date": "2020-01-01"}})
        );
    }
}
