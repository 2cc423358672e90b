//! Group models.

use serde::{Deserialize, Serialize};

/// A user or a group, named in a membership request.
///
/// Serializes as a single `user_name` or `group_name` field, so exactly one
/// of the two is always sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Principal {
    /// A user, by user name.
    #[serde(rename = "user_name")]
    User(String),
    /// A group, by group name.
    #[serde(rename = "group_name")]
    Group(String),
}

impl Principal {
    /// Create a user principal.
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    /// Create a group principal.
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    /// Return the principal name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(name) | Self::Group(name) => name,
        }
    }
}

/// Member of a group as returned by `groups/list-members`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalName {
    /// User name, for user members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Group name, for group members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl PrincipalName {
    /// Convert to a [`Principal`]. Users win if the server sends both.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        match (&self.user_name, &self.group_name) {
            (Some(user), _) => Some(Principal::User(user.clone())),
            (None, Some(group)) => Some(Principal::Group(group.clone())),
            (None, None) => None,
        }
    }
}

/// Query for `groups/list-parents`. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParentsRequest {
    /// User name, for user members.
    pub user_name: Option<String>,
    /// Group name, for group members.
    pub group_name: Option<String>,
}

impl ListParentsRequest {
    /// Parents of a user.
    pub fn for_user(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            group_name: None,
        }
    }

    /// Parents of a group.
    pub fn for_group(group_name: impl Into<String>) -> Self {
        Self {
            user_name: None,
            group_name: Some(group_name.into()),
        }
    }
}

impl From<Principal> for ListParentsRequest {
    fn from(principal: Principal) -> Self {
        match principal {
            Principal::User(name) => Self::for_user(name),
            Principal::Group(name) => Self::for_group(name),
        }
    }
}
