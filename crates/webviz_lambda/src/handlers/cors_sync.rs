use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::cors_policy::CorsPolicyApplier;
use crate::adapters::response_upload::ResponseUploader;
use crate::runtime::contract::{
    physical_resource_id_for_bucket, CloudFormationResponse, LifecycleOperation,
    ProvisioningEvent, ProvisioningOutcome, ALLOWED_ORIGIN_ATTRIBUTE,
};
use crate::runtime::cors::rule_set_for_origin;
use crate::runtime::error::ConfigurationError;

const UNKNOWN_RESOURCE_ID: &str = "webviz-cors-unknown";

/// Result of one lifecycle invocation, plus the document to upload when the
/// orchestrator asked for a callback.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleInvocation {
    pub outcome: ProvisioningOutcome,
    pub callback: Option<OrchestratorCallback>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorCallback {
    pub response_url: String,
    pub response: CloudFormationResponse,
}

/// Dispatches a lifecycle event to its handler.
///
/// Create and Update converge the bucket onto the rule set derived from the
/// event; re-delivering either is harmless because the apply is a full
/// replace. Delete never touches the bucket.
pub fn handle_provisioning_event(
    event: &ProvisioningEvent,
    applier: &dyn CorsPolicyApplier,
) -> ProvisioningOutcome {
    info!(
        component = "cors_sync",
        event = "lifecycle_received",
        operation = event.operation.as_str(),
        request_token = %event.request_token,
        bucket = event.properties.bucket_name.as_deref().unwrap_or_default(),
    );

    match event.operation {
        LifecycleOperation::Create => handle_create(event, applier),
        LifecycleOperation::Update => handle_update(event, applier),
        LifecycleOperation::Delete => handle_delete(event),
    }
}

pub fn handle_create(
    event: &ProvisioningEvent,
    applier: &dyn CorsPolicyApplier,
) -> ProvisioningOutcome {
    apply_origin_policy(event, applier)
}

pub fn handle_update(
    event: &ProvisioningEvent,
    applier: &dyn CorsPolicyApplier,
) -> ProvisioningOutcome {
    apply_origin_policy(event, applier)
}

/// Leaves the bucket as it is. The bucket is usually being deleted along
/// with the stack, and failing here would block teardown.
pub fn handle_delete(event: &ProvisioningEvent) -> ProvisioningOutcome {
    let physical_resource_id = event
        .physical_resource_id
        .clone()
        .unwrap_or_else(|| fallback_physical_resource_id(event));
    info!(
        component = "cors_sync",
        event = "delete_skipped",
        physical_resource_id = %physical_resource_id,
    );
    ProvisioningOutcome::success(physical_resource_id)
}

/// Decodes a raw Lambda payload, runs the lifecycle, and prepares the
/// orchestrator callback. A payload that cannot be decoded still produces a
/// `FAILED` callback when it carries a `ResponseURL`, so the stack does not
/// wait for a timeout.
pub fn handle_lifecycle_payload(
    payload: Value,
    applier: &dyn CorsPolicyApplier,
) -> LifecycleInvocation {
    match serde_json::from_value::<ProvisioningEvent>(payload.clone()) {
        Ok(event) => {
            let outcome = handle_provisioning_event(&event, applier);
            let callback = event.response_url.clone().map(|response_url| OrchestratorCallback {
                response: CloudFormationResponse::from_outcome(&event, &outcome),
                response_url,
            });
            LifecycleInvocation { outcome, callback }
        }
        Err(decode_error) => {
            let reason = format!("Malformed provisioning event: {decode_error}");
            warn!(
                component = "cors_sync",
                event = "malformed_event",
                error = %reason,
            );
            malformed_event_invocation(&payload, reason)
        }
    }
}

/// Uploads the callback, if any. Upload failures are returned so the
/// invocation fails and the orchestrator's own timeout applies.
pub fn deliver_callback(
    callback: &OrchestratorCallback,
    uploader: &dyn ResponseUploader,
) -> Result<(), String> {
    let body = serde_json::to_vec(&callback.response)
        .map_err(|error| format!("failed to serialize provisioning response: {error}"))?;

    uploader
        .upload(&callback.response_url, &body)
        .inspect_err(|upload_error| {
            error!(
                component = "cors_sync",
                event = "callback_failed",
                request_token = %callback.response.request_id,
                error = %upload_error,
            );
        })
}

fn apply_origin_policy(
    event: &ProvisioningEvent,
    applier: &dyn CorsPolicyApplier,
) -> ProvisioningOutcome {
    let Some(bucket) = event
        .properties
        .bucket_name
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return configuration_failure(
            fallback_physical_resource_id(event),
            ConfigurationError::missing("bucket_name"),
        );
    };
    let physical_resource_id = physical_resource_id_for_bucket(bucket);

    let rule_set = match rule_set_for_origin(
        event.properties.allowed_origin.as_deref().unwrap_or_default(),
    ) {
        Ok(value) => value,
        Err(config_error) => return configuration_failure(physical_resource_id, config_error),
    };
    let origin = rule_set.allowed_origins().collect::<Vec<_>>().join(",");

    match applier.apply(bucket, &rule_set) {
        Ok(()) => {
            info!(
                component = "cors_sync",
                event = "cors_applied",
                operation = event.operation.as_str(),
                bucket,
                origin = %origin,
            );
            ProvisioningOutcome::success(physical_resource_id)
                .with_data(ALLOWED_ORIGIN_ATTRIBUTE, origin)
        }
        Err(backend_error) => {
            error!(
                component = "cors_sync",
                event = "cors_apply_failed",
                operation = event.operation.as_str(),
                bucket,
                unavailable = backend_error.is_unavailable(),
                error = %backend_error,
            );
            ProvisioningOutcome::failed(physical_resource_id, backend_error.message)
        }
    }
}

fn configuration_failure(
    physical_resource_id: String,
    config_error: ConfigurationError,
) -> ProvisioningOutcome {
    warn!(
        component = "cors_sync",
        event = "invalid_properties",
        error = %config_error,
    );
    ProvisioningOutcome::failed(physical_resource_id, config_error.to_string())
}

fn fallback_physical_resource_id(event: &ProvisioningEvent) -> String {
    if let Some(bucket) = event
        .properties
        .bucket_name
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return physical_resource_id_for_bucket(bucket);
    }
    event
        .physical_resource_id
        .clone()
        .or_else(|| event.logical_resource_id.clone())
        .unwrap_or_else(|| UNKNOWN_RESOURCE_ID.to_string())
}

fn malformed_event_invocation(payload: &Value, reason: String) -> LifecycleInvocation {
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let physical_resource_id = field("PhysicalResourceId")
        .or_else(|| field("LogicalResourceId"))
        .unwrap_or_else(|| UNKNOWN_RESOURCE_ID.to_string());
    let outcome = ProvisioningOutcome::failed(physical_resource_id, reason);

    let callback = field("ResponseURL").map(|response_url| OrchestratorCallback {
        response_url,
        response: CloudFormationResponse {
            status: outcome.status,
            reason: outcome.reason.clone(),
            physical_resource_id: outcome.physical_resource_id.clone(),
            stack_id: field("StackId").unwrap_or_default(),
            request_id: field("RequestId").unwrap_or_default(),
            logical_resource_id: field("LogicalResourceId").unwrap_or_default(),
            data: Default::default(),
        },
    });

    LifecycleInvocation { outcome, callback }
}
