use thiserror::Error;

/// Required input missing or malformed. Detected before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{0} must be configured")]
    Missing(String),

    #[error("{name} is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error("scene database configuration is partially specified; missing {}", .missing.join(", "))]
    PartialSceneDb { missing: Vec<String> },

    /// None of the `SCENE_DB_*` variables are set. A legal deployment that
    /// has no scene table to read from.
    #[error("scene lookup is disabled; no SCENE_DB_* variables are set")]
    SceneLookupDisabled,
}

impl ConfigurationError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing(name.into())
    }

    pub fn is_scene_lookup_disabled(&self) -> bool {
        matches!(self, Self::SceneLookupDisabled)
    }

    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Request payload rejected before reaching any backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The backend answered and refused (permission, validation, missing bucket).
    Rejected,
    /// The backend could not be reached or did not answer in time.
    Unavailable,
}

/// Failure reported by a storage or metadata backend.
///
/// `Display` yields the backend's own message unchanged so it can be passed
/// through to the orchestrator as a failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind == BackendErrorKind::Unavailable
    }
}
