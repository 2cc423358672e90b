//! Asynchronous groups client implementation.

use super::models::{ListParentsRequest, Principal, PrincipalName};
use crate::Result;
use databricks_core::query::QueryParams;
use databricks_core::{ApiClient, Error};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct Membership<'a> {
    #[serde(flatten)]
    principal: &'a Principal,
    parent_name: &'a str,
}

#[derive(Serialize)]
struct GroupRef<'a> {
    group_name: &'a str,
}

#[derive(Default, Deserialize)]
struct CreatedGroup {
    #[serde(default)]
    group_name: String,
}

#[derive(Default, Deserialize)]
struct MemberList {
    #[serde(default)]
    members: Vec<PrincipalName>,
}

#[derive(Default, Deserialize)]
struct GroupNames {
    #[serde(default)]
    group_names: Vec<String>,
}

/// Handle for the `groups` endpoints.
#[derive(Debug, Clone)]
pub struct GroupsClient {
    api: ApiClient,
}

impl GroupsClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Add a user or group to `parent_name`.
    pub async fn add_member(&self, principal: &Principal, parent_name: &str) -> Result<()> {
        let body = Membership {
            principal,
            parent_name,
        };
        self.api.post_unit("2.0/groups/add-member", &body).await
    }

    /// Create a group and return the name the server assigned.
    pub async fn create(&self, group_name: &str) -> Result<String> {
        let created: CreatedGroup = self
            .api
            .post_json("2.0/groups/create", &GroupRef { group_name })
            .await?;
        Ok(created.group_name)
    }

    /// List the direct members of a group.
    pub async fn list_members(&self, group_name: &str) -> Result<Vec<PrincipalName>> {
        let query = QueryParams::new().with("group_name", group_name);
        let list: MemberList = self
            .api
            .get_json("2.0/groups/list-members", query.as_pairs())
            .await?;
        Ok(list.members)
    }

    /// List all groups in the workspace.
    pub async fn list(&self) -> Result<Vec<String>> {
        let list: GroupNames = self.api.get_json("2.0/groups/list", &[]).await?;
        Ok(list.group_names)
    }

    /// List the groups a user or group directly belongs to.
    pub async fn list_parents(&self, request: &ListParentsRequest) -> Result<Vec<String>> {
        let mut query = QueryParams::new();
        match (&request.user_name, &request.group_name) {
            (Some(user), None) => query.push("user_name", user),
            (None, Some(group)) => query.push("group_name", group),
            _ => {
                return Err(Error::Validation(
                    "exactly one of user_name and group_name must be set".to_string(),
                ))
            }
        }
        let list: GroupNames = self
            .api
            .get_json("2.0/groups/list-parents", query.as_pairs())
            .await?;
        Ok(list.group_names)
    }

    /// List the groups a user directly belongs to.
    pub async fn user_parents(&self, user_name: &str) -> Result<Vec<String>> {
        self.list_parents(&ListParentsRequest::for_user(user_name))
            .await
    }

    /// List the groups a group directly belongs to.
    pub async fn group_parents(&self, group_name: &str) -> Result<Vec<String>> {
        self.list_parents(&ListParentsRequest::for_group(group_name))
            .await
    }

    /// Remove a user or group from `parent_name`.
    pub async fn remove_member(&self, principal: &Principal, parent_name: &str) -> Result<()> {
        let body = Membership {
            principal,
            parent_name,
        };
        self.api.post_unit("2.0/groups/remove-member", &body).await
    }

    /// Delete a group.
    pub async fn delete(&self, group_name: &str) -> Result<()> {
        self.api
            .post_unit("2.0/groups/delete", &GroupRef { group_name })
            .await
    }
}
