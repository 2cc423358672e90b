//! Cluster library endpoints.

pub mod client;
pub mod models;

pub use client::LibrariesClient;
pub use models::{
    ClusterLibraryStatuses, Library, LibraryFullStatus, LibraryInstallStatus, MavenLibrary,
    PythonPyPiLibrary, RCranLibrary,
};
