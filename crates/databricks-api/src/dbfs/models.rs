//! DBFS models.

use databricks_core::types::base64_bytes;
use serde::{Deserialize, Serialize};

/// Largest block accepted by `dbfs/add-block`.
pub const MAX_BLOCK_SIZE: usize = 1024 * 1024;

/// Largest range returned by a single `dbfs/read`.
pub const MAX_READ_LENGTH: i64 = 1024 * 1024;

/// Status of a file or directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    /// Absolute path.
    pub path: String,
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// File length in bytes; zero for directories.
    pub file_size: i64,
}

/// Result of a ranged read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadResult {
    /// Number of bytes read; less than requested at end of file.
    pub bytes_read: i64,
    /// Decoded bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Serialize)]
pub(crate) struct AddBlock<'a> {
    pub handle: databricks_core::DbfsHandle,
    #[serde(with = "base64_bytes")]
    pub data: &'a [u8],
}

#[derive(Serialize)]
pub(crate) struct Put<'a> {
    pub path: &'a str,
    #[serde(with = "base64_bytes")]
    pub contents: &'a [u8],
    pub overwrite: bool,
}
