pub mod aws_errors;
pub mod cors_policy;
pub mod dynamodb_scenes;
pub mod metadata_store;
pub mod response_upload;
pub mod s3_cors;
