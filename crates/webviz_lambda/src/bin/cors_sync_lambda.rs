use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use webviz_lambda::adapters::response_upload::HttpResponseUploader;
use webviz_lambda::adapters::s3_cors::S3CorsPolicyApplier;
use webviz_lambda::handlers::cors_sync::{deliver_callback, handle_lifecycle_payload};
use webviz_lambda::observability::init_logging;
use webviz_lambda::runtime::contract::ProvisioningOutcome;

struct RuntimeDependencies {
    applier: S3CorsPolicyApplier,
    uploader: HttpResponseUploader,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<ProvisioningOutcome, Error> {
    let invocation = handle_lifecycle_payload(event.payload, &deps.applier);

    if let Some(callback) = &invocation.callback {
        deliver_callback(callback, &deps.uploader).map_err(Error::from)?;
    }

    Ok(invocation.outcome)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        applier: S3CorsPolicyApplier::new(aws_sdk_s3::Client::new(&aws_config)),
        uploader: HttpResponseUploader::default(),
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
