//! Library models, shared with job settings.

use databricks_core::open_string;
use databricks_core::ClusterId;
use serde::{Deserialize, Serialize};

open_string! {
    /// Installation state of a library on a cluster.
    LibraryInstallStatus {
        PENDING = "PENDING",
        RESOLVING = "RESOLVING",
        INSTALLING = "INSTALLING",
        INSTALLED = "INSTALLED",
        FAILED = "FAILED",
        UNINSTALL_ON_RESTART = "UNINSTALL_ON_RESTART",
    }
}

/// A Maven artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MavenLibrary {
    /// `groupId:artifactId:version`.
    pub coordinates: String,
    /// Repository; the default index when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Dependencies to exclude, as `groupId:artifactId`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,
}

/// A PyPI package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonPyPiLibrary {
    /// Package name, optionally with a version.
    pub package: String,
    /// Repository; the default index when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

/// A CRAN package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RCranLibrary {
    /// Package name, optionally with a version.
    pub package: String,
    /// Repository; the default index when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

/// A library to install. Exactly one source should be set; use the
/// constructors to build one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Library {
    /// URI of a JAR.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar: Option<String>,
    /// URI of an egg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg: Option<String>,
    /// URI of a wheel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whl: Option<String>,
    /// PyPI package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pypi: Option<PythonPyPiLibrary>,
    /// Maven artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maven: Option<MavenLibrary>,
    /// CRAN package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cran: Option<RCranLibrary>,
}

impl Library {
    /// A JAR at a DBFS or S3 URI.
    pub fn jar(uri: impl Into<String>) -> Self {
        Self {
            jar: Some(uri.into()),
            ..Self::default()
        }
    }

    /// An egg at a DBFS or S3 URI.
    pub fn egg(uri: impl Into<String>) -> Self {
        Self {
            egg: Some(uri.into()),
            ..Self::default()
        }
    }

    /// A wheel at a DBFS or S3 URI.
    pub fn whl(uri: impl Into<String>) -> Self {
        Self {
            whl: Some(uri.into()),
            ..Self::default()
        }
    }

    /// A PyPI package from the default index.
    pub fn pypi(package: impl Into<String>) -> Self {
        Self {
            pypi: Some(PythonPyPiLibrary {
                package: package.into(),
                repo: None,
            }),
            ..Self::default()
        }
    }

    /// A Maven artifact from Maven Central.
    pub fn maven(coordinates: impl Into<String>) -> Self {
        Self {
            maven: Some(MavenLibrary {
                coordinates: coordinates.into(),
                ..MavenLibrary::default()
            }),
            ..Self::default()
        }
    }

    /// A CRAN package from the default mirror.
    pub fn cran(package: impl Into<String>) -> Self {
        Self {
            cran: Some(RCranLibrary {
                package: package.into(),
                repo: None,
            }),
            ..Self::default()
        }
    }
}

/// Status of one library on one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryFullStatus {
    /// The library.
    pub library: Library,
    /// Installation state.
    pub status: LibraryInstallStatus,
    /// Installation messages, mostly failure details.
    pub messages: Vec<String>,
    /// True if installed on all clusters.
    pub is_library_for_all_clusters: bool,
}

/// Library statuses of one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterLibraryStatuses {
    /// Cluster identifier.
    pub cluster_id: ClusterId,
    /// Status of each library.
    pub library_statuses: Vec<LibraryFullStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn library_serializes_only_its_source() {
        assert_eq!(
            serde_json::to_value(Library::pypi("simplejson")).unwrap(),
            json!({"pypi": {"package": "simplejson"}})
        );
        assert_eq!(
            serde_json::to_value(Library::jar("dbfs:/libs/a.jar")).unwrap(),
            json!({"jar": "dbfs:/libs/a.jar"})
        );
    }

    #[test]
    fn unknown_install_status_is_kept() {
        let status: LibraryFullStatus = serde_json::from_value(json!({
            "library": {"maven": {"coordinates": "org.jsoup:jsoup:1.7.2"}},
            "status": "SKIPPED"
        }))
        .unwrap();
        assert_eq!(status.status.as_str(), "SKIPPED");
        assert!(!status.status.is_known());
        assert_eq!(
            status.library.maven.map(|m| m.coordinates),
            Some("org.jsoup:jsoup:1.7.2".to_string())
        );
    }
}
