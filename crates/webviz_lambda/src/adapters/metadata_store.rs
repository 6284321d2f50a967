use crate::runtime::contract::SceneRecord;
use crate::runtime::error::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLookup {
    pub partition_value: String,
    pub sort_value: Option<String>,
}

/// Single-key read against the scene metadata table. `Ok(None)` is a miss.
pub trait MetadataStore {
    fn get_scene(&self, lookup: &SceneLookup) -> Result<Option<SceneRecord>, BackendError>;
}

impl<T: MetadataStore + ?Sized> MetadataStore for &T {
    fn get_scene(&self, lookup: &SceneLookup) -> Result<Option<SceneRecord>, BackendError> {
        (**self).get_scene(lookup)
    }
}
