use std::collections::HashMap;
use std::sync::Mutex;

use webviz_lambda::adapters::cors_policy::CorsPolicyApplier;
use webviz_lambda::adapters::metadata_store::{MetadataStore, SceneLookup};
use webviz_lambda::adapters::response_upload::ResponseUploader;
use webviz_lambda::runtime::contract::SceneRecord;
use webviz_lambda::runtime::cors::CorsRuleSet;
use webviz_lambda::runtime::error::BackendError;

/// Buckets with replace-on-write CORS configuration, like S3.
pub struct InMemoryBuckets {
    cors: Mutex<HashMap<String, CorsRuleSet>>,
    apply_calls: Mutex<usize>,
    denied: Mutex<Option<String>>,
}

impl InMemoryBuckets {
    pub fn with_buckets(names: &[&str]) -> Self {
        Self {
            cors: Mutex::new(
                names
                    .iter()
                    .map(|name| (name.to_string(), CorsRuleSet::default()))
                    .collect(),
            ),
            apply_calls: Mutex::new(0),
            denied: Mutex::new(None),
        }
    }

    pub fn deny_with(&self, message: &str) {
        *self.denied.lock().expect("poisoned mutex") = Some(message.to_string());
    }

    pub fn remove_bucket(&self, name: &str) {
        self.cors.lock().expect("poisoned mutex").remove(name);
    }

    pub fn cors_of(&self, name: &str) -> Option<CorsRuleSet> {
        self.cors.lock().expect("poisoned mutex").get(name).cloned()
    }

    pub fn apply_calls(&self) -> usize {
        *self.apply_calls.lock().expect("poisoned mutex")
    }
}

impl CorsPolicyApplier for InMemoryBuckets {
    fn apply(&self, bucket: &str, rule_set: &CorsRuleSet) -> Result<(), BackendError> {
        *self.apply_calls.lock().expect("poisoned mutex") += 1;

        if let Some(message) = self.denied.lock().expect("poisoned mutex").clone() {
            return Err(BackendError::rejected(message));
        }

        let mut cors = self.cors.lock().expect("poisoned mutex");
        match cors.get_mut(bucket) {
            Some(existing) => {
                *existing = rule_set.clone();
                Ok(())
            }
            None => Err(BackendError::rejected(
                "NoSuchBucket: The specified bucket does not exist",
            )),
        }
    }
}

#[derive(Default)]
pub struct RecordingUploader {
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    fail: bool,
}

impl RecordingUploader {
    pub fn failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().expect("poisoned mutex").clone()
    }
}

impl ResponseUploader for RecordingUploader {
    fn upload(&self, url: &str, body: &[u8]) -> Result<(), String> {
        if self.fail {
            return Err("simulated upload failure".to_string());
        }
        self.uploads
            .lock()
            .expect("poisoned mutex")
            .push((url.to_string(), body.to_vec()));
        Ok(())
    }
}

/// Scene table keyed by `(partition, sort)`.
#[derive(Default)]
pub struct InMemorySceneTable {
    items: HashMap<(String, Option<String>), SceneRecord>,
    reads: Mutex<usize>,
}

impl InMemorySceneTable {
    pub fn insert(&mut self, record: SceneRecord) {
        self.items.insert(
            (record.partition_key.clone(), record.sort_key.clone()),
            record,
        );
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().expect("poisoned mutex")
    }
}

impl MetadataStore for InMemorySceneTable {
    fn get_scene(&self, lookup: &SceneLookup) -> Result<Option<SceneRecord>, BackendError> {
        *self.reads.lock().expect("poisoned mutex") += 1;
        Ok(self
            .items
            .get(&(lookup.partition_value.clone(), lookup.sort_value.clone()))
            .cloned())
    }
}

pub struct UnreachableSceneTable;

impl MetadataStore for UnreachableSceneTable {
    fn get_scene(&self, _lookup: &SceneLookup) -> Result<Option<SceneRecord>, BackendError> {
        Err(BackendError::unavailable(
            "dispatch failure: io error: connection timed out",
        ))
    }
}

pub struct DeniedSceneTable;

impl MetadataStore for DeniedSceneTable {
    fn get_scene(&self, _lookup: &SceneLookup) -> Result<Option<SceneRecord>, BackendError> {
        Err(BackendError::rejected(
            "AccessDeniedException: not authorized to perform dynamodb:GetItem",
        ))
    }
}

pub fn scene_record(partition_key: &str, sort_key: Option<&str>) -> SceneRecord {
    SceneRecord {
        partition_key: partition_key.to_string(),
        sort_key: sort_key.map(str::to_string),
        region: "us-east-1".to_string(),
        table: "scenes".to_string(),
    }
}
