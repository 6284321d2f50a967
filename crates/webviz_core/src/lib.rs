//! Shared webviz deployment domain primitives.
//!
//! This crate owns the provisioning and scene-resolution contracts, CORS rule
//! derivation, and resolver configuration. It intentionally excludes AWS SDK
//! and Lambda runtime concerns.
//! See `crates/webviz_core/README.md` for ownership boundaries.

pub mod config;
pub mod contract;
pub mod cors;
pub mod error;
pub mod scene_paths;
