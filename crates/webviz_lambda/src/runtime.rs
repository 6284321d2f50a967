pub use webviz_core::{config, contract, cors, error, scene_paths};
