use aws_sdk_dynamodb::config::Region;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use webviz_lambda::adapters::dynamodb_scenes::DynamoDbSceneStore;
use webviz_lambda::handlers::scene_url::{handle_scene_event, ApiGatewayResponse, SceneUrlResolver};
use webviz_lambda::observability::init_logging;
use webviz_lambda::runtime::config::ResolverConfig;
use webviz_lambda::runtime::error::ConfigurationError;

type Resolver = SceneUrlResolver<DynamoDbSceneStore>;

/// Configuration problems are kept and reported per request instead of
/// failing the cold start.
async fn build_resolver() -> Result<Resolver, ConfigurationError> {
    let config = ResolverConfig::from_env()?;
    let scene_db = config
        .scene_db
        .clone()
        .ok_or(ConfigurationError::SceneLookupDisabled)?;

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(scene_db.region.clone()))
        .load()
        .await;
    let store = DynamoDbSceneStore::new(aws_sdk_dynamodb::Client::new(&aws_config), scene_db);

    SceneUrlResolver::new(config, store)
}

async fn handle_request(
    event: LambdaEvent<Value>,
    resolver: &Result<Resolver, ConfigurationError>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_scene_event(event.payload, resolver.as_ref()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let resolver = build_resolver().await;
    match &resolver {
        Err(config_error) if config_error.is_scene_lookup_disabled() => {
            tracing::info!(
                component = "scene_url",
                event = "scene_lookup_disabled",
                reason = %config_error,
            );
        }
        Err(config_error) => {
            tracing::error!(
                component = "scene_url",
                event = "misconfigured",
                error = %config_error,
            );
        }
        Ok(_) => {}
    }
    let resolver = &resolver;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, resolver).await
    }))
    .await
}
