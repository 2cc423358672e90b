//! Asynchronous DBFS client implementation.

use super::models::{AddBlock, FileInfo, Put, ReadResult, MAX_BLOCK_SIZE, MAX_READ_LENGTH};
use crate::Result;
use databricks_core::query::QueryParams;
use databricks_core::{ApiClient, DbfsHandle, Error};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

#[derive(Serialize)]
struct HandleRef {
    handle: DbfsHandle,
}

#[derive(Serialize)]
struct Create<'a> {
    path: &'a str,
    overwrite: bool,
}

#[derive(Serialize)]
struct Delete<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Serialize)]
struct PathRef<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct Move<'a> {
    source_path: &'a str,
    destination_path: &'a str,
}

#[derive(Default, Deserialize)]
struct Created {
    #[serde(default)]
    handle: DbfsHandle,
}

#[derive(Default, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileInfo>,
}

/// Handle for the `dbfs` endpoints.
#[derive(Debug, Clone)]
pub struct DbfsClient {
    api: ApiClient,
}

impl DbfsClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Append a block of at most 1 MiB to an open stream.
    pub async fn add_block(&self, handle: DbfsHandle, data: &[u8]) -> Result<()> {
        if data.len() > MAX_BLOCK_SIZE {
            return Err(Error::Validation(format!(
                "block of {} bytes exceeds the {MAX_BLOCK_SIZE} byte limit",
                data.len()
            )));
        }
        self.api
            .post_unit("2.0/dbfs/add-block", &AddBlock { handle, data })
            .await
    }

    /// Close an open stream.
    pub async fn close(&self, handle: DbfsHandle) -> Result<()> {
        self.api
            .post_unit("2.0/dbfs/close", &HandleRef { handle })
            .await
    }

    /// Open a stream to write a file. Streams idle for 10 minutes are closed.
    pub async fn create(&self, path: &str, overwrite: bool) -> Result<DbfsHandle> {
        let created: Created = self
            .api
            .post_json("2.0/dbfs/create", &Create { path, overwrite })
            .await?;
        Ok(created.handle)
    }

    /// Delete a file, or a directory when `recursive` is set.
    pub async fn delete(&self, path: &str, recursive: bool) -> Result<()> {
        self.api
            .post_unit("2.0/dbfs/delete", &Delete { path, recursive })
            .await
    }

    /// Fetch the status of a file or directory.
    pub async fn get_status(&self, path: &str) -> Result<FileInfo> {
        let query = QueryParams::new().with("path", path);
        self.api
            .get_json("2.0/dbfs/get-status", query.as_pairs())
            .await
    }

    /// List a directory, or the file itself when `path` is a file.
    pub async fn list(&self, path: &str) -> Result<Vec<FileInfo>> {
        let query = QueryParams::new().with("path", path);
        let list: FileList = self.api.get_json("2.0/dbfs/list", query.as_pairs()).await?;
        Ok(list.files)
    }

    /// Create a directory and any missing parents.
    pub async fn mkdirs(&self, path: &str) -> Result<()> {
        self.api
            .post_unit("2.0/dbfs/mkdirs", &PathRef { path })
            .await
    }

    /// Move a file or directory.
    pub async fn move_path(&self, source_path: &str, destination_path: &str) -> Result<()> {
        let body = Move {
            source_path,
            destination_path,
        };
        self.api.post_unit("2.0/dbfs/move", &body).await
    }

    /// Upload a file in a single request. The server limits inline contents
    /// to 1 MiB; use [`upload`](Self::upload) for larger files.
    pub async fn put(&self, path: &str, contents: &[u8], overwrite: bool) -> Result<()> {
        let body = Put {
            path,
            contents,
            overwrite,
        };
        self.api.post_unit("2.0/dbfs/put", &body).await
    }

    /// Read up to `length` bytes, at most 1 MiB, starting at `offset`.
    pub async fn read(&self, path: &str, offset: i64, length: i64) -> Result<ReadResult> {
        if offset < 0 || length < 0 {
            return Err(Error::Validation(format!(
                "offset and length must not be negative, got offset {offset} length {length}"
            )));
        }
        if length > MAX_READ_LENGTH {
            return Err(Error::Validation(format!(
                "length {length} exceeds the {MAX_READ_LENGTH} byte limit"
            )));
        }
        let query = QueryParams::new()
            .with("path", path)
            .with("offset", offset)
            .with("length", length);
        self.api.get_json("2.0/dbfs/read", query.as_pairs()).await
    }

    /// Upload a file of any size through a stream of 1 MiB blocks.
    ///
    /// The stream is closed on success. If a block fails the stream is left
    /// open and expires on the server.
    pub async fn upload(&self, path: &str, contents: &[u8], overwrite: bool) -> Result<()> {
        let handle = self.create(path, overwrite).await?;
        for block in contents.chunks(MAX_BLOCK_SIZE) {
            self.add_block(handle, block).await?;
        }
        debug!(path, bytes = contents.len(), "uploaded DBFS file");
        self.close(handle).await
    }
}
