//! Router tests for the metadata API

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use setlist_cli::{build_router, AppState, BuildInfo};
use setlist_soundcloud::{MetadataError, MetadataResolver, SoundCloudApi};
use tower::util::ServiceExt;

/// API double keyed on the resolved URL
struct FakeApi {
    unavailable: bool,
}

#[async_trait]
impl SoundCloudApi for FakeApi {
    async fn resolve(&self, url: &str) -> setlist_soundcloud::Result<Option<Value>> {
        if self.unavailable {
            return Err(MetadataError::UpstreamUnavailable("connection refused".to_string()));
        }
        Ok(match url {
            "https://soundcloud.com/dj/set" => Some(json!({
                "kind": "track",
                "id": 1,
                "title": "Warehouse Set",
                "duration": 5400000,
                "likes_count": 12,
                "user": {"id": 7, "username": "dj", "full_name": "DJ Example"}
            })),
            "https://soundcloud.com/dj/sets/live" => Some(json!({
                "kind": "playlist",
                "id": 2,
                "title": "Live",
                "track_count": 2,
                "tracks": [{"id": 1, "title": "Warehouse Set"}, {"id": 3}]
            })),
            _ => None,
        })
    }

    async fn search_tracks(&self, _query: &str, limit: usize) -> setlist_soundcloud::Result<Vec<Value>> {
        Ok((0..limit.min(5))
            .map(|i| json!({"id": i, "title": format!("Result {i}"), "user": {"username": "dj"}}))
            .collect())
    }

    async fn tracks_by_ids(&self, ids: &[u64]) -> setlist_soundcloud::Result<Vec<Value>> {
        Ok(ids
            .iter()
            .map(|id| json!({"id": id, "title": format!("Track {id}")}))
            .collect())
    }
}

fn create_test_app(unavailable: bool) -> Router {
    let resolver = MetadataResolver::new(Arc::new(FakeApi { unavailable }));
    let build = BuildInfo {
        job_id: "42".to_string(),
        commit_id: "abc123".to_string(),
    };
    build_router(AppState::new(resolver, build), &["*".to_string()])
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_track_metadata() {
    let (status, body) = send(
        create_test_app(false),
        post_json("/soundcloud/metadata", json!({"url": "https://soundcloud.com/dj/set"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Warehouse Set");
    assert_eq!(body["artist"], "dj");
    assert_eq!(body["artist_name"], "DJ Example");
    assert_eq!(body["duration_seconds"], 5400.0);
    assert_eq!(body["user"]["id"], 7);
    assert!(body["genre"].is_null());
}

#[tokio::test]
async fn test_track_alias_route() {
    let (status, body) = send(
        create_test_app(false),
        post_json("/api/soundcloud/track", json!({"url": "https://soundcloud.com/dj/set"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let (status, body) = send(create_test_app(false), post_json("/soundcloud/metadata", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing 'url' in request body"}));
}

#[tokio::test]
async fn test_invalid_url_is_bad_request_even_when_upstream_is_down() {
    let (status, body) = send(
        create_test_app(true),
        post_json("/soundcloud/metadata", json!({"url": "https://example.com/track"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid SoundCloud URL"}));
}

#[tokio::test]
async fn test_unknown_track_is_not_found() {
    let (status, body) = send(
        create_test_app(false),
        post_json("/soundcloud/metadata", json!({"url": "https://soundcloud.com/dj/gone"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Track not found or unavailable"}));
}

#[tokio::test]
async fn test_upstream_failure_is_internal_error() {
    let (status, body) = send(
        create_test_app(true),
        post_json("/soundcloud/metadata", json!({"url": "https://soundcloud.com/dj/set"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/soundcloud/metadata")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(create_test_app(false), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_playlist_with_and_without_tracks() {
    let (status, body) = send(
        create_test_app(false),
        post_json(
            "/soundcloud/playlist",
            json!({"url": "https://soundcloud.com/dj/sets/live", "loadTracks": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tracks"][1]["title"], "Track 3");

    let (status, body) = send(
        create_test_app(false),
        post_json(
            "/api/soundcloud/playlist",
            json!({"url": "https://soundcloud.com/dj/sets/live", "loadTracks": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tracks"], json!([]));
    assert_eq!(body["track_count"], 2);
}

#[tokio::test]
async fn test_playlist_loads_tracks_by_default() {
    let (status, body) = send(
        create_test_app(false),
        post_json("/soundcloud/playlist", json!({"url": "https://soundcloud.com/dj/sets/live"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tracks"].as_array().unwrap().len(), 2);
    assert_eq!(body["tracks"][0]["title"], "Warehouse Set");
    assert_eq!(body["tracks"][1]["title"], "Track 3");
}

#[tokio::test]
async fn test_track_url_given_as_playlist_is_not_found() {
    let (status, body) = send(
        create_test_app(false),
        post_json("/soundcloud/playlist", json!({"url": "https://soundcloud.com/dj/set"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Playlist not found or unavailable"}));
}

#[tokio::test]
async fn test_search() {
    let (status, body) = send(
        create_test_app(false),
        post_json("/soundcloud/search", json!({"query": "warehouse", "limit": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["user"]["username"], "dj");

    let (status, body) = send(
        create_test_app(false),
        post_json("/api/soundcloud/search", json!({"limit": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing 'query' in request body"}));
}

#[tokio::test]
async fn test_sound_version_and_health() {
    let (status, body) = send(
        create_test_app(false),
        Request::builder().uri("/sound").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([1, 2, 3, 4]));

    let response = create_test_app(false)
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Job ID: 42\nCommit ID: abc123");

    let (status, body) = send(
        create_test_app(false),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app(false).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
