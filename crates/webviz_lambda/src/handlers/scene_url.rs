use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::metadata_store::{MetadataStore, SceneLookup};
use crate::runtime::config::{ResolverConfig, SceneDbConfig};
use crate::runtime::contract::{ResolvedScene, SceneRequest};
use crate::runtime::error::{BackendError, ConfigurationError, ValidationError};
use crate::runtime::scene_paths::scene_resource_url;

const SCENE_REQUEST_FIELDS: [&str; 2] = ["scene_key", "sort_key"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("scene '{scene_key}' was not found")]
    NotFound { scene_key: String },

    #[error("scene metadata store is unavailable: {0}")]
    Unavailable(BackendError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ResolveError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unavailable(_) => "unavailable",
            Self::Invalid(_) => "validation_error",
        }
    }
}

/// Maps scene keys to viewer URLs. Holds configuration only, so one
/// instance can serve concurrent requests.
pub struct SceneUrlResolver<S> {
    base_url: String,
    scene_db: SceneDbConfig,
    store: S,
}

impl<S: MetadataStore> SceneUrlResolver<S> {
    pub fn new(config: ResolverConfig, store: S) -> Result<Self, ConfigurationError> {
        let scene_db = config
            .scene_db
            .ok_or(ConfigurationError::SceneLookupDisabled)?;
        Ok(Self {
            base_url: config.base_url,
            scene_db,
            store,
        })
    }

    pub fn resolve_key(&self, scene_key: &str) -> Result<ResolvedScene, ResolveError> {
        self.resolve(&SceneRequest {
            scene_key: scene_key.to_string(),
            sort_key: None,
        })
    }

    pub fn resolve(&self, request: &SceneRequest) -> Result<ResolvedScene, ResolveError> {
        let lookup = self.lookup_for(request)?;

        match self.store.get_scene(&lookup) {
            Ok(Some(record)) => {
                let resource_url = scene_resource_url(&self.base_url, &record);
                info!(
                    component = "scene_url",
                    event = "scene_resolved",
                    scene_key = %lookup.partition_value,
                    resource_url = %resource_url,
                );
                Ok(ResolvedScene { resource_url })
            }
            Ok(None) => {
                info!(
                    component = "scene_url",
                    event = "scene_not_found",
                    scene_key = %lookup.partition_value,
                    table = %self.scene_db.table,
                );
                Err(ResolveError::NotFound {
                    scene_key: lookup.partition_value,
                })
            }
            Err(backend_error) => {
                warn!(
                    component = "scene_url",
                    event = "scene_lookup_failed",
                    scene_key = %lookup.partition_value,
                    table = %self.scene_db.table,
                    region = %self.scene_db.region,
                    unavailable = backend_error.is_unavailable(),
                    error = %backend_error,
                );
                Err(ResolveError::Unavailable(backend_error))
            }
        }
    }

    fn lookup_for(&self, request: &SceneRequest) -> Result<SceneLookup, ValidationError> {
        let scene_key = request.scene_key.trim();
        if scene_key.is_empty() {
            return Err(ValidationError::new("scene_key cannot be empty"));
        }

        let sort_value = request
            .sort_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let sort_value = match (&self.scene_db.sort_key, sort_value) {
            (Some(_), None) => {
                return Err(ValidationError::new(
                    "sort_key is required for this scene table",
                ));
            }
            (None, Some(_)) => {
                return Err(ValidationError::new(
                    "sort_key is not supported by this scene table",
                ));
            }
            (_, value) => value.map(str::to_string),
        };

        Ok(SceneLookup {
            partition_value: scene_key.to_string(),
            sort_value,
        })
    }
}

/// Turns an API Gateway proxy event (or a direct `{scene_key}` payload) into
/// an HTTP response. A resolver that failed to configure answers every
/// request with 500.
pub fn handle_scene_event<S: MetadataStore>(
    event: Value,
    resolver: Result<&SceneUrlResolver<S>, &ConfigurationError>,
) -> ApiGatewayResponse {
    let resolver = match resolver {
        Ok(value) => value,
        Err(config_error) => {
            return error_response(
                500,
                json!({
                    "error": "misconfiguration",
                    "message": config_error.to_string(),
                }),
            );
        }
    };

    let request = match extract_scene_request(event) {
        Ok(value) => value,
        Err(message) => return validation_error_response(&message),
    };

    match resolver.resolve(&request) {
        Ok(resolved) => json_response(200, json!(resolved)),
        Err(resolve_error) => {
            let status_code = match &resolve_error {
                ResolveError::NotFound { .. } => 404,
                ResolveError::Unavailable(_) => 503,
                ResolveError::Invalid(_) => 400,
            };
            error_response(
                status_code,
                json!({
                    "error": resolve_error.kind(),
                    "message": resolve_error.to_string(),
                }),
            )
        }
    }
}

/// Collects `scene_key`/`sort_key` from path parameters, query string, and
/// body, in increasing order of precedence.
fn extract_scene_request(event: Value) -> Result<SceneRequest, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let body = match object.get("body") {
        None => Some(event.clone()),
        Some(Value::Null) => None,
        Some(Value::Object(_)) => object.get("body").cloned(),
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))?,
        ),
        Some(_) => return Err("Request body must be a JSON object".to_string()),
    };

    let mut fields = Map::new();
    for source in ["pathParameters", "queryStringParameters"] {
        if let Some(Value::Object(params)) = object.get(source) {
            for name in SCENE_REQUEST_FIELDS {
                if let Some(value) = params.get(name) {
                    fields.insert(name.to_string(), value.clone());
                }
            }
        }
    }
    match body {
        Some(Value::Object(body)) => {
            for name in SCENE_REQUEST_FIELDS {
                if let Some(value) = body.get(name) {
                    fields.insert(name.to_string(), value.clone());
                }
            }
        }
        Some(_) => return Err("Request body must be a JSON object".to_string()),
        None => {}
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|error| format!("Malformed request: {error}"))
}

fn validation_error_response(message: &str) -> ApiGatewayResponse {
    error_response(
        400,
        json!({
            "error": "validation_error",
            "message": message,
        }),
    )
}

fn json_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    json_response(status_code, payload)
}
