pub mod cors_sync;
pub mod scene_url;
