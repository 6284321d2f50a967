use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::adapters::aws_errors::backend_error_from_sdk;
use crate::adapters::metadata_store::{MetadataStore, SceneLookup};
use crate::runtime::config::SceneDbConfig;
use crate::runtime::contract::SceneRecord;
use crate::runtime::error::BackendError;

/// Scene metadata table read with `GetItem`.
#[derive(Clone)]
pub struct DynamoDbSceneStore {
    client: aws_sdk_dynamodb::Client,
    scene_db: SceneDbConfig,
}

impl DynamoDbSceneStore {
    pub fn new(client: aws_sdk_dynamodb::Client, scene_db: SceneDbConfig) -> Self {
        Self { client, scene_db }
    }
}

impl MetadataStore for DynamoDbSceneStore {
    fn get_scene(&self, lookup: &SceneLookup) -> Result<Option<SceneRecord>, BackendError> {
        let mut request = self
            .client
            .get_item()
            .table_name(&self.scene_db.table)
            .key(
                &self.scene_db.partition_key,
                AttributeValue::S(lookup.partition_value.clone()),
            );
        if let (Some(sort_key), Some(sort_value)) = (&self.scene_db.sort_key, &lookup.sort_value)
        {
            request = request.key(sort_key, AttributeValue::S(sort_value.clone()));
        }

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move { request.send().await })
        })
        .map_err(backend_error_from_sdk)?;

        output
            .item()
            .map(|item| scene_record_from_item(item, &self.scene_db))
            .transpose()
    }
}

/// Reads the key attributes back out of a table item. Keys are looked up as
/// `S` values, so only string-typed key attributes are accepted.
pub fn scene_record_from_item(
    item: &HashMap<String, AttributeValue>,
    scene_db: &SceneDbConfig,
) -> Result<SceneRecord, BackendError> {
    let partition_key = key_attribute(item, &scene_db.partition_key)?;
    let sort_key = scene_db
        .sort_key
        .as_deref()
        .map(|name| key_attribute(item, name))
        .transpose()?;

    Ok(SceneRecord {
        partition_key,
        sort_key,
        region: scene_db.region.clone(),
        table: scene_db.table.clone(),
    })
}

fn key_attribute(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<String, BackendError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(BackendError::rejected(format!(
            "scene item key attribute '{name}' must be a string"
        ))),
        None => Err(BackendError::rejected(format!(
            "scene item is missing key attribute '{name}'"
        ))),
    }
}
