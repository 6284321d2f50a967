// Shared smithy types; `aws_sdk_dynamodb::error` re-exports the same items.
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::runtime::error::{BackendError, BackendErrorKind};

/// Service error codes that signal a transient condition rather than a refusal.
const TRANSIENT_ERROR_CODES: &[&str] = &[
    "InternalError",
    "InternalServerError",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "RequestTimeout",
    "ServiceUnavailable",
    "SlowDown",
    "ThrottlingException",
];

/// Maps an AWS SDK failure onto the backend error taxonomy.
///
/// Service errors keep the backend's `code: message` text unchanged. Requests
/// that never got an answer (timeouts, connection failures, unreadable
/// responses) are reported as unavailable.
pub fn backend_error_from_sdk<E, R>(error: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &error {
        SdkError::ServiceError(context) => {
            let service_error = context.err();
            let message = service_message(service_error.code(), service_error.message())
                .unwrap_or_else(|| DisplayErrorContext(&error).to_string());
            BackendError {
                kind: classify_service_code(service_error.code()),
                message,
            }
        }
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            BackendError::unavailable(DisplayErrorContext(&error).to_string())
        }
        _ => BackendError::rejected(DisplayErrorContext(&error).to_string()),
    }
}

pub fn classify_service_code(code: Option<&str>) -> BackendErrorKind {
    match code {
        Some(code) if TRANSIENT_ERROR_CODES.contains(&code) => BackendErrorKind::Unavailable,
        _ => BackendErrorKind::Rejected,
    }
}

fn service_message(code: Option<&str>, message: Option<&str>) -> Option<String> {
    match (code, message) {
        (Some(code), Some(message)) => Some(format!("{code}: {message}")),
        (Some(code), None) => Some(code.to_string()),
        (None, Some(message)) => Some(message.to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::get_item::GetItemError;

    use super::*;

    #[test]
    fn dynamodb_throttling_keeps_service_text() {
        let service_error = GetItemError::generic(
            ErrorMetadata::builder()
                .code("ThrottlingException")
                .message("Rate exceeded")
                .build(),
        );
        let error: SdkError<GetItemError, ()> = SdkError::service_error(service_error, ());

        let backend_error = backend_error_from_sdk(error);
        assert!(backend_error.is_unavailable());
        assert_eq!(backend_error.message, "ThrottlingException: Rate exceeded");
    }

    #[test]
    fn dynamodb_timeout_is_unavailable() {
        let error: SdkError<GetItemError, ()> = SdkError::timeout_error("request timed out");
        assert!(backend_error_from_sdk(error).is_unavailable());
    }

    #[test]
    fn throttling_codes_are_unavailable() {
        assert_eq!(
            classify_service_code(Some("ThrottlingException")),
            BackendErrorKind::Unavailable
        );
        assert_eq!(
            classify_service_code(Some("SlowDown")),
            BackendErrorKind::Unavailable
        );
    }

    #[test]
    fn permission_and_missing_bucket_codes_are_rejections() {
        assert_eq!(
            classify_service_code(Some("AccessDenied")),
            BackendErrorKind::Rejected
        );
        assert_eq!(
            classify_service_code(Some("NoSuchBucket")),
            BackendErrorKind::Rejected
        );
        assert_eq!(classify_service_code(None), BackendErrorKind::Rejected);
    }

    #[test]
    fn service_message_joins_code_and_message() {
        assert_eq!(
            service_message(Some("AccessDenied"), Some("Access Denied")).as_deref(),
            Some("AccessDenied: Access Denied")
        );
        assert_eq!(
            service_message(None, Some("Access Denied")).as_deref(),
            Some("Access Denied")
        );
        assert_eq!(service_message(None, None), None);
    }
}
