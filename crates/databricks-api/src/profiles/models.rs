//! Instance profile models.

use serde::{Deserialize, Serialize};

/// An IAM instance profile that clusters can be launched with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceProfile {
    /// ARN of the instance profile.
    pub instance_profile_arn: String,
}
