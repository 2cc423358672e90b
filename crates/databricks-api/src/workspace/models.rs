//! Workspace models.

use databricks_core::open_string;
use databricks_core::types::base64_bytes;
use serde::{Deserialize, Serialize};

open_string! {
    /// Kind of a workspace object.
    ObjectType {
        NOTEBOOK = "NOTEBOOK",
        DIRECTORY = "DIRECTORY",
        LIBRARY = "LIBRARY",
    }
}

open_string! {
    /// Notebook language.
    Language {
        SCALA = "SCALA",
        PYTHON = "PYTHON",
        SQL = "SQL",
        R = "R",
    }
}

open_string! {
    /// Notebook serialization format.
    ExportFormat {
        SOURCE = "SOURCE",
        HTML = "HTML",
        JUPYTER = "JUPYTER",
        DBC = "DBC",
    }
}

/// A notebook, directory or library in the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectInfo {
    /// Kind of object.
    pub object_type: ObjectType,
    /// Absolute workspace path.
    pub path: String,
    /// Set for notebooks only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ObjectInfo {
    /// Returns true for directories.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.object_type == ObjectType::DIRECTORY
    }
}

/// Body of `workspace/import`.
///
/// `SOURCE` imports need a `language`; a `DBC` import may target a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportRequest {
    /// Absolute workspace path.
    pub path: String,
    /// Raw content; encoded as base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    /// Format of `content`.
    pub format: ExportFormat,
    /// Notebook language; required for `SOURCE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    /// Replace an existing notebook.
    pub overwrite: bool,
}

impl ImportRequest {
    /// Import `content` in the given format.
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>, format: ExportFormat) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            format,
            language: None,
            overwrite: false,
        }
    }

    /// Import a source file as a notebook.
    pub fn source(path: impl Into<String>, content: impl Into<Vec<u8>>, language: Language) -> Self {
        Self::new(path, content, ExportFormat::SOURCE).with_language(language)
    }

    /// Set the notebook language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Replace an existing notebook. Not supported for `DBC`.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
