//! Workspace object endpoints: notebooks, directories and libraries.

pub mod client;
pub mod models;

pub use client::WorkspaceClient;
pub use models::{ExportFormat, ImportRequest, Language, ObjectInfo, ObjectType};
