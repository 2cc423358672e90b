//! Asynchronous instance profiles client implementation.

use super::models::InstanceProfile;
use crate::Result;
use databricks_core::ApiClient;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct AddProfile<'a> {
    instance_profile_arn: &'a str,
    skip_validation: bool,
}

#[derive(Serialize)]
struct ProfileRef<'a> {
    instance_profile_arn: &'a str,
}

#[derive(Default, Deserialize)]
struct ProfileList {
    #[serde(default)]
    instance_profiles: Vec<InstanceProfile>,
}

/// Handle for the `instance-profiles` endpoints.
#[derive(Debug, Clone)]
pub struct ProfilesClient {
    api: ApiClient,
}

impl ProfilesClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Register an instance profile.
    ///
    /// The server checks that the profile can launch instances unless
    /// `skip_validation` is set.
    pub async fn add(&self, instance_profile_arn: &str, skip_validation: bool) -> Result<()> {
        let body = AddProfile {
            instance_profile_arn,
            skip_validation,
        };
        self.api.post_unit("2.0/instance-profiles/add", &body).await
    }

    /// List registered instance profiles.
    pub async fn list(&self) -> Result<Vec<InstanceProfile>> {
        let list: ProfileList = self
            .api
            .get_json("2.0/instance-profiles/list", &[])
            .await?;
        Ok(list.instance_profiles)
    }

    /// Unregister an instance profile. Running clusters keep it.
    pub async fn remove(&self, instance_profile_arn: &str) -> Result<()> {
        self.api
            .post_unit(
                "2.0/instance-profiles/remove",
                &ProfileRef {
                    instance_profile_arn,
                },
            )
            .await
    }
}
