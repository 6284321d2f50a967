//! AWS-oriented adapters and handlers for the webviz deployment automation.
//!
//! This crate owns runtime integration details (Lambda handlers, S3 and
//! DynamoDB adapters, CloudFormation response delivery) and exposes a single
//! runtime module boundary for contract, CORS, and configuration primitives.
//! See `crates/webviz_lambda/README.md` for ownership boundaries.

pub mod adapters;
pub mod handlers;
pub mod observability;
pub mod runtime;
