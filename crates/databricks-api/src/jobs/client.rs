//! Asynchronous jobs client implementation.

use super::models::{
    Job, JobCreateRequest, JobSettings, NotebookOutput, Run, RunNowRequest, RunNowResponse,
    RunOutput, RunSubmitRequest, RunsListRequest, RunsPage, ViewItem, ViewsToExport,
};
use crate::Result;
use databricks_core::query::QueryParams;
use databricks_core::{ApiClient, Error, JobId, RunId};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;
use validator::Validate;

#[derive(Serialize)]
struct JobRef {
    job_id: JobId,
}

#[derive(Serialize)]
struct RunRef {
    run_id: RunId,
}

#[derive(Serialize)]
struct Reset<'a> {
    job_id: JobId,
    new_settings: &'a JobSettings,
}

#[derive(Default, Deserialize)]
struct CreatedJob {
    #[serde(default)]
    job_id: JobId,
}

#[derive(Default, Deserialize)]
struct SubmittedRun {
    #[serde(default)]
    run_id: RunId,
}

#[derive(Default, Deserialize)]
struct JobList {
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Default, Deserialize)]
struct ViewList {
    #[serde(default)]
    views: Vec<ViewItem>,
}

#[derive(Default, Deserialize)]
struct OutputEnvelope {
    #[serde(default)]
    notebook_output: Option<NotebookOutput>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    metadata: Run,
}

/// Handle for the `jobs` endpoints.
#[derive(Debug, Clone)]
pub struct JobsClient {
    api: ApiClient,
}

impl JobsClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Create a job and return its identifier.
    pub async fn create(&self, request: &JobCreateRequest) -> Result<JobId> {
        let created: CreatedJob = self.api.post_json("2.0/jobs/create", request).await?;
        Ok(created.job_id)
    }

    /// List all jobs.
    pub async fn list(&self) -> Result<Vec<Job>> {
        let list: JobList = self.api.get_json("2.0/jobs/list", &[]).await?;
        Ok(list.jobs)
    }

    /// Delete a job. Active runs are cancelled.
    pub async fn delete(&self, job_id: JobId) -> Result<()> {
        self.api
            .post_unit("2.0/jobs/delete", &JobRef { job_id })
            .await
    }

    /// Fetch a job.
    pub async fn get(&self, job_id: JobId) -> Result<Job> {
        let query = QueryParams::new().with("job_id", job_id);
        self.api.get_json("2.0/jobs/get", query.as_pairs()).await
    }

    /// Replace all settings of a job.
    pub async fn reset(&self, job_id: JobId, new_settings: &JobSettings) -> Result<()> {
        let body = Reset {
            job_id,
            new_settings,
        };
        self.api.post_unit("2.0/jobs/reset", &body).await
    }

    /// Trigger a run of a job.
    pub async fn run_now(&self, request: &RunNowRequest) -> Result<RunNowResponse> {
        self.api.post_json("2.0/jobs/run-now", request).await
    }

    /// Submit a one-time run without creating a job.
    pub async fn runs_submit(&self, request: &RunSubmitRequest) -> Result<RunId> {
        let submitted: SubmittedRun = self.api.post_json("2.0/jobs/runs/submit", request).await?;
        Ok(submitted.run_id)
    }

    /// List runs, most recent first.
    pub async fn runs_list(&self, request: &RunsListRequest) -> Result<RunsPage> {
        if request.active_only.is_some() && request.complete_only.is_some() {
            return Err(Error::Validation(
                "active_only and complete_only are mutually exclusive".to_string(),
            ));
        }
        request
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;

        let mut query = QueryParams::new();
        query.push_opt("job_id", request.job_id);
        query.push_opt("active_only", request.active_only);
        query.push_opt("complete_only", request.complete_only);
        query.push_opt("offset", request.offset);
        query.push_opt("limit", request.limit);
        self.api
            .get_json("2.0/jobs/runs/list", query.as_pairs())
            .await
    }

    /// Fetch the metadata of a run.
    pub async fn runs_get(&self, run_id: RunId) -> Result<Run> {
        let query = QueryParams::new().with("run_id", run_id);
        self.api
            .get_json("2.0/jobs/runs/get", query.as_pairs())
            .await
    }

    /// Export the views of a notebook run as HTML.
    pub async fn runs_export(
        &self,
        run_id: RunId,
        views_to_export: &ViewsToExport,
    ) -> Result<Vec<ViewItem>> {
        let query = QueryParams::new()
            .with("run_id", run_id)
            .with("views_to_export", views_to_export);
        let list: ViewList = self
            .api
            .get_json("2.0/jobs/runs/export", query.as_pairs())
            .await?;
        Ok(list.views)
    }

    /// Cancel a run. Cancellation is asynchronous; cancelling a terminal run
    /// does nothing.
    pub async fn runs_cancel(&self, run_id: RunId) -> Result<()> {
        self.api
            .post_unit("2.0/jobs/runs/cancel", &RunRef { run_id })
            .await
    }

    /// Fetch the exit value of a notebook run.
    ///
    /// Fails with [`Error::RunOutput`] when the run reports an error or has
    /// no notebook output.
    pub async fn runs_get_output(&self, run_id: RunId) -> Result<RunOutput> {
        let query = QueryParams::new().with("run_id", run_id);
        let envelope: OutputEnvelope = self
            .api
            .get_json("2.0/jobs/runs/get-output", query.as_pairs())
            .await?;
        if let Some(error) = envelope.error {
            warn!(%run_id, error = %error, "run reported an error");
            return Err(Error::RunOutput(error));
        }
        let output = envelope
            .notebook_output
            .ok_or_else(|| Error::RunOutput(format!("run {run_id} has no notebook output")))?;
        Ok(RunOutput {
            result: output.result,
            truncated: output.truncated,
            metadata: envelope.metadata,
        })
    }

    /// Delete a non-active run.
    pub async fn runs_delete(&self, run_id: RunId) -> Result<()> {
        self.api
            .post_unit("2.0/jobs/runs/delete", &RunRef { run_id })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::{RunLifeCycleState, ViewType};
    use crate::test_support::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_returns_job_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/create"))
            .and(body_json(json!({
                "existing_cluster_id": "c-1",
                "notebook_task": {"notebook_path": "/etl"},
                "name": "nightly"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": 17})))
            .mount(&server)
            .await;

        let job_id = test_client(&server)
            .jobs()
            .create(&JobSettings::notebook("nightly", "c-1", "/etl"))
            .await
            .unwrap();
        assert_eq!(job_id, JobId::new(17));
    }

    #[tokio::test]
    async fn list_and_get_decode_jobs() {
        let server = MockServer::start().await;
        let job = json!({
            "job_id": 3,
            "creator_user_name": "a@b.com",
            "settings": {"name": "nightly", "max_retries": 1},
            "created_time": 1_457_570_074_236_i64
        });
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": [job.clone()]})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/get"))
            .and(query_param("job_id", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(job))
            .mount(&server)
            .await;

        let jobs = test_client(&server).jobs();
        let listed = jobs.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        let fetched = jobs.get(JobId::new(3)).await.unwrap();
        assert_eq!(listed[0], fetched);
        assert_eq!(fetched.settings.name.as_deref(), Some("nightly"));
        assert_eq!(fetched.settings.max_retries, Some(1));
    }

    #[tokio::test]
    async fn reset_wraps_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/reset"))
            .and(body_json(json!({
                "job_id": 3,
                "new_settings": {"existing_cluster_id": "c-1", "notebook_task": {"notebook_path": "/b"}, "name": "n"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .jobs()
            .reset(JobId::new(3), &JobSettings::notebook("n", "c-1", "/b"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_now_returns_run_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/run-now"))
            .and(body_json(json!({"job_id": 3, "jar_params": ["a", "b"]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"run_id": 99, "number_in_job": 4})),
            )
            .mount(&server)
            .await;

        let request = RunNowRequest::new(JobId::new(3)).with_jar_params(vec!["a".into(), "b".into()]);
        let response = test_client(&server).jobs().run_now(&request).await.unwrap();
        assert_eq!(response.run_id, RunId::new(99));
        assert_eq!(response.number_in_job, 4);
    }

    #[tokio::test]
    async fn runs_submit_returns_run_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/runs/submit"))
            .and(body_json(json!({"existing_cluster_id": "c-1", "run_name": "adhoc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"run_id": 5})))
            .mount(&server)
            .await;

        let request = RunSubmitRequest {
            existing_cluster_id: Some("c-1".into()),
            run_name: Some("adhoc".into()),
            ..RunSubmitRequest::default()
        };
        let run_id = test_client(&server).jobs().runs_submit(&request).await.unwrap();
        assert_eq!(run_id, RunId::new(5));
    }

    #[tokio::test]
    async fn runs_list_sends_only_set_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/list"))
            .and(query_param("job_id", "3"))
            .and(query_param("active_only", "true"))
            .and(query_param("limit", "25"))
            .and(query_param_is_missing("complete_only"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "runs": [{"run_id": 1, "state": {"life_cycle_state": "RUNNING"}}],
                "has_more": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RunsListRequest::new()
            .for_job(JobId::new(3))
            .active_only()
            .with_limit(25);
        let page = test_client(&server).jobs().runs_list(&request).await.unwrap();
        assert!(page.has_more);
        assert_eq!(page.runs[0].state.life_cycle_state, RunLifeCycleState::RUNNING);
    }

    #[tokio::test]
    async fn runs_list_rejects_invalid_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let jobs = test_client(&server).jobs();
        let both = RunsListRequest::new().active_only().complete_only();
        assert!(matches!(
            jobs.runs_list(&both).await,
            Err(Error::Validation(_))
        ));
        for limit in [0, 1001] {
            let request = RunsListRequest::new().with_limit(limit);
            assert!(matches!(
                jobs.runs_list(&request).await,
                Err(Error::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn runs_export_unwraps_views() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/export"))
            .and(query_param("run_id", "7"))
            .and(query_param("views_to_export", "CODE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "views": [{"content": "<html/>", "name": "etl", "type": "NOTEBOOK"}]
            })))
            .mount(&server)
            .await;

        let views = test_client(&server)
            .jobs()
            .runs_export(RunId::new(7), &ViewsToExport::CODE)
            .await
            .unwrap();
        assert_eq!(views[0].view_type, ViewType::NOTEBOOK);
        assert_eq!(views[0].name, "etl");
    }

    #[tokio::test]
    async fn run_mutations_post_run_id() {
        let server = MockServer::start().await;
        for action in ["runs/cancel", "runs/delete"] {
            Mock::given(method("POST"))
                .and(path(format!("/api/2.0/jobs/{action}").as_str()))
                .and(body_json(json!({"run_id": 7})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/delete"))
            .and(body_json(json!({"job_id": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let jobs = test_client(&server).jobs();
        jobs.runs_cancel(RunId::new(7)).await.unwrap();
        jobs.runs_delete(RunId::new(7)).await.unwrap();
        jobs.delete(JobId::new(3)).await.unwrap();
    }

    #[tokio::test]
    async fn runs_get_output_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get-output"))
            .and(query_param("run_id", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notebook_output": {"result": "42", "truncated": false},
                "metadata": {"run_id": 7, "job_id": 3}
            })))
            .mount(&server)
            .await;

        let output = test_client(&server)
            .jobs()
            .runs_get_output(RunId::new(7))
            .await
            .unwrap();
        assert_eq!(output.result, "42");
        assert!(!output.truncated);
        assert_eq!(output.metadata.job_id, JobId::new(3));
    }

    #[tokio::test]
    async fn runs_get_output_surfaces_run_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get-output"))
            .and(query_param("run_id", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "ZeroDivisionError",
                "notebook_output": {"result": "ignored"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get-output"))
            .and(query_param("run_id", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"metadata": {}})))
            .mount(&server)
            .await;

        let jobs = test_client(&server).jobs();
        match jobs.runs_get_output(RunId::new(1)).await {
            Err(Error::RunOutput(message)) => assert_eq!(message, "ZeroDivisionError"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            jobs.runs_get_output(RunId::new(2)).await,
            Err(Error::RunOutput(_))
        ));
    }
}
