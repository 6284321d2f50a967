use crate::contract::SceneRecord;

pub const SCENE_PATH_PREFIX: &str = "scenes";

/// Path of a scene under the viewer endpoint, `scenes/<partition>[/<sort>]`.
///
/// Each key value is percent-encoded as a single path segment, so keys that
/// contain `/` or spaces cannot change the shape of the path.
pub fn scene_resource_path(record: &SceneRecord) -> String {
    let mut path = format!(
        "{SCENE_PATH_PREFIX}/{}",
        urlencoding::encode(&record.partition_key)
    );
    if let Some(sort_key) = &record.sort_key {
        path.push('/');
        path.push_str(&urlencoding::encode(sort_key));
    }
    path
}

pub fn scene_resource_url(base_url: &str, record: &SceneRecord) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        scene_resource_path(record)
    )
}
