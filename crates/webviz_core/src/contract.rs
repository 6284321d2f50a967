use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const PHYSICAL_RESOURCE_ID_PREFIX: &str = "webviz-cors-";
pub const ALLOWED_ORIGIN_ATTRIBUTE: &str = "AllowedOrigin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleOperation {
    Create,
    Update,
    Delete,
}

impl LifecycleOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

/// Resource properties of the CORS custom resource.
///
/// Both fields are optional on the wire: Delete events for a resource whose
/// Create never succeeded may arrive with nothing in them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsSyncProperties {
    #[serde(default, alias = "BucketName")]
    pub bucket_name: Option<String>,
    #[serde(default, alias = "AllowedOrigin")]
    pub allowed_origin: Option<String>,
}

/// One lifecycle invocation, in either the plain shape or the CloudFormation
/// custom resource shape (`RequestType`, `ResourceProperties`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningEvent {
    #[serde(alias = "RequestType")]
    pub operation: LifecycleOperation,
    #[serde(default, alias = "ResourceProperties")]
    pub properties: CorsSyncProperties,
    #[serde(default, alias = "RequestId")]
    pub request_token: String,
    #[serde(default, alias = "ResponseURL", skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
    #[serde(default, alias = "StackId", skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(
        default,
        alias = "LogicalResourceId",
        skip_serializing_if = "Option::is_none"
    )]
    pub logical_resource_id: Option<String>,
    #[serde(
        default,
        alias = "PhysicalResourceId",
        skip_serializing_if = "Option::is_none"
    )]
    pub physical_resource_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProvisioningStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningOutcome {
    pub status: ProvisioningStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ProvisioningOutcome {
    pub fn success(physical_resource_id: impl Into<String>) -> Self {
        Self {
            status: ProvisioningStatus::Success,
            reason: None,
            physical_resource_id: physical_resource_id.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn failed(physical_resource_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: ProvisioningStatus::Failed,
            reason: Some(reason.into()),
            physical_resource_id: physical_resource_id.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ProvisioningStatus::Success
    }
}

/// Response document uploaded to a CloudFormation `ResponseURL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudFormationResponse {
    pub status: ProvisioningStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub data: BTreeMap<String, String>,
}

impl CloudFormationResponse {
    pub fn from_outcome(event: &ProvisioningEvent, outcome: &ProvisioningOutcome) -> Self {
        Self {
            status: outcome.status,
            reason: outcome.reason.clone(),
            physical_resource_id: outcome.physical_resource_id.clone(),
            stack_id: event.stack_id.clone().unwrap_or_default(),
            request_id: event.request_token.clone(),
            logical_resource_id: event.logical_resource_id.clone().unwrap_or_default(),
            data: outcome.data.clone(),
        }
    }
}

/// Stable id for the CORS resource attached to `bucket_name`.
///
/// Re-delivered Create/Update events for the same bucket report the same id,
/// so the orchestrator never treats a retry as a replacement.
pub fn physical_resource_id_for_bucket(bucket_name: &str) -> String {
    format!("{PHYSICAL_RESOURCE_ID_PREFIX}{bucket_name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRequest {
    pub scene_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

/// Location of a scene's metadata item, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub partition_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    pub region: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScene {
    pub resource_url: String,
}
