mod support;

use serde_json::{json, Value};
use support::backends::{
    scene_record, DeniedSceneTable, InMemorySceneTable, UnreachableSceneTable,
};
use webviz_lambda::handlers::scene_url::{handle_scene_event, ResolveError, SceneUrlResolver};
use webviz_lambda::runtime::config::{
    ResolverConfig, SceneDbConfig, SCENE_DB_PARTITION_KEY, SCENE_DB_REGION, SCENE_DB_SORT_KEY,
    SCENE_DB_TABLE, WEBVIZ_ELB_URL,
};
use webviz_lambda::runtime::contract::SceneRequest;

fn scene_db(sort_key: Option<&str>) -> SceneDbConfig {
    SceneDbConfig {
        partition_key: "scene_id".to_string(),
        sort_key: sort_key.map(str::to_string),
        region: "us-east-1".to_string(),
        table: "scenes".to_string(),
    }
}

fn config(sort_key: Option<&str>) -> ResolverConfig {
    ResolverConfig::new("http://lb.example.com", Some(scene_db(sort_key)))
        .expect("config should pass")
}

#[test]
fn resolves_scene_from_environment_style_configuration() {
    let config = ResolverConfig::from_lookup(|name| {
        match name {
            WEBVIZ_ELB_URL => Some("http://lb.example.com/"),
            SCENE_DB_PARTITION_KEY => Some("scene_id"),
            SCENE_DB_SORT_KEY => Some(""),
            SCENE_DB_REGION => Some("us-east-1"),
            SCENE_DB_TABLE => Some("scenes"),
            _ => None,
        }
        .map(str::to_string)
    })
    .expect("config should parse");

    let mut table = InMemorySceneTable::default();
    table.insert(scene_record("scene123", None));
    let resolver = SceneUrlResolver::new(config, table).expect("resolver should build");

    let resolved = resolver.resolve_key("scene123").expect("scene should resolve");
    assert_eq!(resolved.resource_url, "http://lb.example.com/scenes/scene123");
}

#[test]
fn absent_scene_is_not_found_on_empty_table() {
    let resolver =
        SceneUrlResolver::new(config(None), InMemorySceneTable::default()).expect("resolver");

    let error = resolver.resolve_key("missing-key").expect_err("should miss");
    assert!(matches!(error, ResolveError::NotFound { .. }));
}

#[test]
fn not_found_and_unavailable_are_distinct() {
    let empty =
        SceneUrlResolver::new(config(None), InMemorySceneTable::default()).expect("resolver");
    let unreachable = SceneUrlResolver::new(config(None), UnreachableSceneTable).expect("resolver");
    let denied = SceneUrlResolver::new(config(None), DeniedSceneTable).expect("resolver");

    let miss = empty.resolve_key("scene123").expect_err("should miss");
    let timeout = unreachable.resolve_key("scene123").expect_err("should fail");
    let refusal = denied.resolve_key("scene123").expect_err("should fail");

    assert_eq!(miss.kind(), "not_found");
    assert_eq!(timeout.kind(), "unavailable");
    assert_eq!(refusal.kind(), "unavailable");
    assert!(refusal.to_string().contains("AccessDeniedException"));
}

#[test]
fn sort_keyed_table_embeds_both_key_fields() {
    let mut table = InMemorySceneTable::default();
    table.insert(scene_record("scene123", Some("v2")));
    let resolver = SceneUrlResolver::new(config(Some("version")), table).expect("resolver");

    let resolved = resolver
        .resolve(&SceneRequest {
            scene_key: "scene123".to_string(),
            sort_key: Some("v2".to_string()),
        })
        .expect("scene should resolve");
    assert_eq!(resolved.resource_url, "http://lb.example.com/scenes/scene123/v2");
}

#[test]
fn sort_keyed_table_requires_sort_key_before_lookup() {
    let table = InMemorySceneTable::default();
    let resolver = SceneUrlResolver::new(config(Some("version")), table).expect("resolver");

    let error = resolver.resolve_key("scene123").expect_err("should fail");
    assert_eq!(error.kind(), "validation_error");
    assert_eq!(error.to_string(), "sort_key is required for this scene table");
}

#[test]
fn resolution_is_deterministic_and_concurrent_safe() {
    let mut table = InMemorySceneTable::default();
    for index in 0..8 {
        table.insert(scene_record(&format!("scene-{index}"), None));
    }
    let resolver = SceneUrlResolver::new(config(None), table).expect("resolver");
    let resolver = &resolver;

    let urls: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    (0..8)
                        .map(|index| {
                            resolver
                                .resolve_key(&format!("scene-{index}"))
                                .expect("scene should resolve")
                                .resource_url
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("resolver thread should not panic"))
            .collect()
    });

    for thread_urls in &urls {
        assert_eq!(thread_urls, &urls[0]);
    }
    assert_eq!(urls[0][3], "http://lb.example.com/scenes/scene-3");
}

#[test]
fn api_gateway_request_round_trip() {
    let mut table = InMemorySceneTable::default();
    table.insert(scene_record("scene123", None));
    let resolver = SceneUrlResolver::new(config(None), table).expect("resolver");

    let response = handle_scene_event(
        json!({
            "resource": "/scenes/{scene_key}",
            "httpMethod": "GET",
            "pathParameters": {"scene_key": "scene123"},
            "queryStringParameters": null,
            "body": null,
            "isBase64Encoded": false
        }),
        Ok(&resolver),
    );

    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["Content-Type"], "application/json");
    let body: Value = serde_json::from_str(&response.body).expect("body should be JSON");
    assert_eq!(body["resource_url"], "http://lb.example.com/scenes/scene123");
}

#[test]
fn invalid_request_never_reaches_store() {
    let table = InMemorySceneTable::default();
    let resolver = SceneUrlResolver::new(config(None), &table).expect("resolver");

    let response = handle_scene_event(json!({"body": "not json"}), Ok(&resolver));
    assert_eq!(response.status_code, 400);

    let response = handle_scene_event(json!({"body": "{\"scene_key\":\"\"}"}), Ok(&resolver));
    assert_eq!(response.status_code, 400);
    assert_eq!(table.reads(), 0);
}
