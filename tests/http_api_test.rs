//! Integration tests for the HTTP control API
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`
//! against an in-memory player.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use beefdeets::control::{create_router, CommandHandler};
use beefdeets::{registry, PlayerAdapter};
use common::{sample_tracks, FakePlayer, FakeTrack, StoppedPlayer};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn router(player: impl beefdeets::player::PlayerChannel + 'static) -> Router {
    let adapter = Arc::new(PlayerAdapter::new(player));
    create_router(Arc::new(CommandHandler::new(adapter)))
}

async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), headers)
}

async fn send_json(router: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body, _) = send(router, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_healthz() {
    let (status, body, _) = send(router(StoppedPlayer), Method::GET, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_now_playing_default_fields() {
    let (status, json) = send_json(
        router(FakePlayer::playing(sample_tracks())),
        Method::GET,
        "/player/now_playing.json",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "artist": "Artist Y",
            "title": "Title X",
            "album": "Album Z",
            "playback_pos": 42.5,
            "length": 215.0,
        })
    );
}

#[tokio::test]
async fn test_now_playing_selected_fields() {
    let (status, json) = send_json(
        router(FakePlayer::playing(sample_tracks())),
        Method::GET,
        "/player/now_playing.json?fields=title,codec",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"title": "Title X", "codec": "FLAC"}));
}

#[tokio::test]
async fn test_now_playing_unknown_field_is_bad_request() {
    let (status, json) = send_json(
        router(FakePlayer::playing(sample_tracks())),
        Method::GET,
        "/player/now_playing.json?fields=title,rating",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["outcome"], "error");
    assert_eq!(json["type"], "UnsupportedField");
    assert_eq!(json["message"], "Unsupported field: rating");
}

#[tokio::test]
async fn test_version() {
    let (status, json) =
        send_json(router(FakePlayer::new()), Method::GET, "/player/version.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"version": "1.9.6"}));
}

#[tokio::test]
async fn test_version_player_down() {
    let (status, json) =
        send_json(router(StoppedPlayer), Method::GET, "/player/version.json").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json,
        serde_json::json!({
            "outcome": "error",
            "type": "PlayerUnavailable",
            "message": "Player unavailable: failed to launch /opt/deadbeef/bin/deadbeef: \
                        No such file or directory",
        })
    );
}

#[tokio::test]
async fn test_action_routes_generated_from_registry() {
    for name in registry().names() {
        let (status, json) = send_json(
            router(FakePlayer::playing(sample_tracks())),
            Method::PATCH,
            &format!("/player/{}.json", name),
        )
        .await;
        assert!(json["outcome"] == "ok" || json["outcome"] == "error", "{}", name);
        assert!(json["message"].is_string());
        assert!(status == StatusCode::OK || status == StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[tokio::test]
async fn test_action_ok() {
    let (status, json) = send_json(
        router(FakePlayer::playing(sample_tracks())),
        Method::PATCH,
        "/player/next.json",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"outcome": "ok", "message": ""}));
}

#[tokio::test]
async fn test_action_rejected_with_empty_playlist() {
    let (status, json) =
        send_json(router(FakePlayer::new()), Method::PATCH, "/player/next.json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["outcome"], "error");
    assert_eq!(json["message"], "player did not accept 'next'");
}

#[tokio::test]
async fn test_action_player_down() {
    let (status, json) =
        send_json(router(StoppedPlayer), Method::PATCH, "/player/play.json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["outcome"], "error");
    assert!(json["message"].as_str().unwrap().starts_with("Player unavailable"));
}

#[tokio::test]
async fn test_action_requires_patch() {
    let (status, _, _) = send(router(FakePlayer::new()), Method::GET, "/player/play.json").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_action_not_found() {
    let (status, _, _) =
        send(router(FakePlayer::new()), Method::PATCH, "/player/eject.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_actions_listing() {
    let (status, json) =
        send_json(router(FakePlayer::new()), Method::GET, "/player/actions.json").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(names, registry().names());
}

#[tokio::test]
async fn test_index_title() {
    let (status, body, _) = send(
        router(FakePlayer::playing(sample_tracks())),
        Method::GET,
        "/",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>Album Z - &quot;Title X&quot; by Artist Y</title>"));
}

#[tokio::test]
async fn test_album_cover_missing_is_not_found() {
    let (status, _, _) =
        send(router(FakePlayer::new()), Method::GET, "/player/album_cover.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_album_cover_fallback_not_cached() {
    let dir = TempDir::new().unwrap();
    let fallback = dir.path().join("no_cover.jpg");
    std::fs::write(&fallback, [0xFF, 0xD8, 0xFF, 0xDB]).unwrap();

    let adapter = Arc::new(PlayerAdapter::new(FakePlayer::new()));
    let handler = CommandHandler::new(adapter).with_fallback_cover(Some(fallback));
    let router = create_router(Arc::new(handler));

    let (status, body, headers) = send(router, Method::GET, "/player/album_cover.jpg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, vec![0xFF, 0xD8, 0xFF, 0xDB]);
    assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
    assert!(headers[header::CACHE_CONTROL]
        .to_str()
        .unwrap()
        .contains("no-store"));
    assert_eq!(headers[header::PRAGMA], "no-cache");
}

#[tokio::test]
async fn test_album_cover_unreadable_sidecar_uses_fallback() {
    let dir = TempDir::new().unwrap();
    let track_path = dir.path().join("01.flac");
    std::fs::write(&track_path, b"no art here").unwrap();
    std::fs::create_dir(dir.path().join("cover.jpg")).unwrap();
    let fallback = dir.path().join("no_cover.jpg");
    std::fs::write(&fallback, [0xFF, 0xD8, 0xFF, 0xDB]).unwrap();

    let mut track = FakeTrack::new("Artist Y", "Title X", "Album Z");
    track.path = track_path;
    let adapter = Arc::new(PlayerAdapter::new(FakePlayer::playing(vec![track])));
    let handler = CommandHandler::new(adapter).with_fallback_cover(Some(fallback));
    let router = create_router(Arc::new(handler));

    let (status, body, _) = send(router, Method::GET, "/player/album_cover.jpg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, vec![0xFF, 0xD8, 0xFF, 0xDB]);
}

#[tokio::test]
async fn test_album_cover_player_down() {
    let (status, _, _) = send(router(StoppedPlayer), Method::GET, "/player/album_cover.jpg").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
