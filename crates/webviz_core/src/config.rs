//! Resolver configuration sourced from environment-style variables.
//!
//! Parsing is separated from the process environment (`from_lookup`) so the
//! rules can be exercised without touching `std::env`.

use url::Url;

use crate::error::ConfigurationError;

pub const WEBVIZ_ELB_URL: &str = "WEBVIZ_ELB_URL";
pub const SCENE_DB_PARTITION_KEY: &str = "SCENE_DB_PARTITION_KEY";
pub const SCENE_DB_SORT_KEY: &str = "SCENE_DB_SORT_KEY";
pub const SCENE_DB_REGION: &str = "SCENE_DB_REGION";
pub const SCENE_DB_TABLE: &str = "SCENE_DB_TABLE";

/// Key schema and location of the scene metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDbConfig {
    pub partition_key: String,
    /// `None` when the table is keyed by partition key alone.
    pub sort_key: Option<String>,
    pub region: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Public base URL of the viewer, without a trailing slash.
    pub base_url: String,
    pub scene_db: Option<SceneDbConfig>,
}

impl ResolverConfig {
    pub fn new(
        base_url: &str,
        scene_db: Option<SceneDbConfig>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            scene_db,
        })
    }

    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let base_url = lookup(WEBVIZ_ELB_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigurationError::missing(WEBVIZ_ELB_URL))?;

        Self::new(&base_url, scene_db_from_lookup(&lookup)?)
    }
}

/// The four `SCENE_DB_*` variables are all set or all unset. An empty
/// `SCENE_DB_SORT_KEY` counts as set and means "no sort key".
fn scene_db_from_lookup(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<SceneDbConfig>, ConfigurationError> {
    let non_empty = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let partition_key = non_empty(SCENE_DB_PARTITION_KEY);
    let sort_key = lookup(SCENE_DB_SORT_KEY).map(|value| value.trim().to_string());
    let region = non_empty(SCENE_DB_REGION);
    let table = non_empty(SCENE_DB_TABLE);

    let presence = [
        (SCENE_DB_PARTITION_KEY, partition_key.is_some()),
        (SCENE_DB_SORT_KEY, sort_key.is_some()),
        (SCENE_DB_REGION, region.is_some()),
        (SCENE_DB_TABLE, table.is_some()),
    ];
    if presence.iter().all(|(_, present)| !present) {
        return Ok(None);
    }

    let missing: Vec<String> = presence
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name.to_string())
        .collect();

    match (partition_key, sort_key, region, table) {
        (Some(partition_key), Some(sort_key), Some(region), Some(table)) => {
            Ok(Some(SceneDbConfig {
                partition_key,
                sort_key: Some(sort_key).filter(|value| !value.is_empty()),
                region,
                table,
            }))
        }
        _ => Err(ConfigurationError::PartialSceneDb { missing }),
    }
}

/// Accepts an absolute http(s) URL and strips trailing slashes. The result
/// is used as a join prefix, so query, fragment, and userinfo are rejected.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigurationError> {
    let parsed = Url::parse(raw.trim()).map_err(|error| {
        ConfigurationError::malformed(
            WEBVIZ_ELB_URL,
            format!("must be an absolute http or https URL ({error})"),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigurationError::malformed(
            WEBVIZ_ELB_URL,
            "must be an absolute http or https URL",
        ));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ConfigurationError::malformed(WEBVIZ_ELB_URL, "host is missing"));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(ConfigurationError::malformed(
            WEBVIZ_ELB_URL,
            "must not carry credentials",
        ));
    }
    if parsed.query().is_some() {
        return Err(ConfigurationError::malformed(
            WEBVIZ_ELB_URL,
            "must not contain a query string",
        ));
    }
    if parsed.fragment().is_some() {
        return Err(ConfigurationError::malformed(
            WEBVIZ_ELB_URL,
            "must not contain a fragment",
        ));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
