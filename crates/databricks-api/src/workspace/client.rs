//! Asynchronous workspace client implementation.

use super::models::{ExportFormat, ImportRequest, ObjectInfo};
use crate::Result;
use bytes::Bytes;
use databricks_core::query::QueryParams;
use databricks_core::types::base64_bytes;
use databricks_core::{ApiClient, Error};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct Delete<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Serialize)]
struct PathRef<'a> {
    path: &'a str,
}

#[derive(Default, Deserialize)]
struct Exported {
    #[serde(default, with = "base64_bytes")]
    content: Vec<u8>,
}

#[derive(Default, Deserialize)]
struct ObjectList {
    #[serde(default)]
    objects: Vec<ObjectInfo>,
}

/// Handle for the `workspace` endpoints.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    api: ApiClient,
}

impl WorkspaceClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Delete an object, or a directory when `recursive` is set. Recursive
    /// deletion is not atomic.
    pub async fn delete(&self, path: &str, recursive: bool) -> Result<()> {
        self.api
            .post_unit("2.0/workspace/delete", &Delete { path, recursive })
            .await
    }

    /// Export a notebook, or a directory in `DBC` format, as decoded bytes.
    pub async fn export(&self, path: &str, format: &ExportFormat) -> Result<Vec<u8>> {
        let query = QueryParams::new().with("path", path).with("format", format);
        let exported: Exported = self
            .api
            .get_json("2.0/workspace/export", query.as_pairs())
            .await?;
        Ok(exported.content)
    }

    /// Export with `direct_download`, returning the raw response body.
    pub async fn export_direct(&self, path: &str, format: &ExportFormat) -> Result<Bytes> {
        let query = QueryParams::new()
            .with("path", path)
            .with("format", format)
            .with("direct_download", true);
        self.api
            .get_bytes("2.0/workspace/export", query.as_pairs())
            .await
    }

    /// Fetch the status of an object or directory.
    pub async fn get_status(&self, path: &str) -> Result<ObjectInfo> {
        let query = QueryParams::new().with("path", path);
        self.api
            .get_json("2.0/workspace/get-status", query.as_pairs())
            .await
    }

    /// Import a notebook or, in `DBC` format, a directory.
    pub async fn import(&self, request: &ImportRequest) -> Result<()> {
        if request.format == ExportFormat::SOURCE && request.language.is_none() {
            return Err(Error::Validation(format!(
                "importing {} in SOURCE format requires a language",
                request.path
            )));
        }
        self.api.post_unit("2.0/workspace/import", request).await
    }

    /// List a directory, or the object itself when `path` is not one.
    pub async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>> {
        let query = QueryParams::new().with("path", path);
        let list: ObjectList = self
            .api
            .get_json("2.0/workspace/list", query.as_pairs())
            .await?;
        Ok(list.objects)
    }

    /// Create a directory and any missing parents.
    pub async fn mkdirs(&self, path: &str) -> Result<()> {
        self.api
            .post_unit("2.0/workspace/mkdirs", &PathRef { path })
            .await
    }
}
