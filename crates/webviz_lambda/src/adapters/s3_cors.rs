use aws_sdk_s3::types::{CorsConfiguration, CorsRule};

use crate::adapters::aws_errors::backend_error_from_sdk;
use crate::adapters::cors_policy::CorsPolicyApplier;
use crate::runtime::cors::CorsRuleSet;
use crate::runtime::error::BackendError;

/// Applies rule sets with a single `PutBucketCors` call.
#[derive(Clone)]
pub struct S3CorsPolicyApplier {
    s3_client: aws_sdk_s3::Client,
}

impl S3CorsPolicyApplier {
    pub fn new(s3_client: aws_sdk_s3::Client) -> Self {
        Self { s3_client }
    }
}

impl CorsPolicyApplier for S3CorsPolicyApplier {
    fn apply(&self, bucket: &str, rule_set: &CorsRuleSet) -> Result<(), BackendError> {
        let configuration = to_s3_cors_configuration(rule_set)?;
        let request = self
            .s3_client
            .put_bucket_cors()
            .bucket(bucket)
            .cors_configuration(configuration);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                request
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(backend_error_from_sdk)
            })
        })
    }
}

pub fn to_s3_cors_configuration(rule_set: &CorsRuleSet) -> Result<CorsConfiguration, BackendError> {
    let rules = rule_set
        .rules
        .iter()
        .map(|rule| {
            CorsRule::builder()
                .set_allowed_headers(Some(rule.allowed_headers.clone()))
                .set_allowed_methods(Some(
                    rule.allowed_methods
                        .iter()
                        .map(|method| method.as_str().to_string())
                        .collect(),
                ))
                .set_allowed_origins(Some(rule.allowed_origins.clone()))
                .set_expose_headers(Some(rule.expose_headers.clone()))
                .set_max_age_seconds(rule.max_age_seconds)
                .build()
                .map_err(|error| BackendError::rejected(format!("invalid CORS rule: {error}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    CorsConfiguration::builder()
        .set_cors_rules(Some(rules))
        .build()
        .map_err(|error| BackendError::rejected(format!("invalid CORS configuration: {error}")))
}
