//! Integration tests for the axum fallback that serves resolved routes.
//!
//! Requests are sent with `tower::ServiceExt::oneshot`, no listener needed.

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use route_conf::{Config, Resolution, RouteEngine, route_service};
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};
use tower::ServiceExt;

#[derive(Serialize)]
struct Echo {
    handler: String,
    action: String,
    params: BTreeMap<String, String>,
}

async fn echo(resolution: Resolution) -> Response {
    Json(Echo {
        handler: resolution.handler,
        action: resolution.action,
        params: resolution.params.into_iter().collect(),
    })
    .into_response()
}

fn app() -> Router {
    let config = Config::from_toml_file("test")
        .expect("Failed to load config/test.toml")
        .with_route("/items/<id>", "Items", "show")
        .with_route("/events/<at>", "Events", "show")
        .with_route("/café", "Cafe", "index");
    route_service(Arc::new(RouteEngine::from_config(&config)), echo)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_dispatches_resolved_route() {
    let (status, body) = get_json(app(), "/items/42?tab=details").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handler"], "Items");
    assert_eq!(body["action"], "show");
    assert_eq!(body["params"]["id"], "42");
}

#[tokio::test]
async fn test_root_route() {
    let (status, body) = get_json(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handler"], "Home");
    assert_eq!(body["action"], "index");
}

#[tokio::test]
async fn test_qualified_route_over_http() {
    let (status, body) = get_json(app(), "/Home:index/TestList:show").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handler"], "TestList");
    assert_eq!(body["action"], "show");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, body) = get_json(app(), "/does/not/exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NOT_FOUND");
    assert_eq!(body["details"], "/does/not/exist");
}

#[tokio::test]
async fn test_malformed_qualified_route_is_400() {
    let (status, body) = get_json(app(), "/Home:").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_ROUTE");
}

#[tokio::test]
async fn test_explicit_axum_routes_take_precedence() {
    let app = app().route("/home", get(|| async { "plain axum" }));
    let response = app
        .oneshot(Request::get("/home").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"plain axum");
}

#[tokio::test]
async fn test_parameter_may_contain_colons() {
    let (status, body) = get_json(app(), "/events/12:30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handler"], "Events");
    assert_eq!(body["params"]["at"], "12:30");

    let (status, body) = get_json(app(), "/events/a:b:c?tz=utc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["at"], "a:b:c");
}

#[tokio::test]
async fn test_malformed_qualified_route_without_path_match_is_400() {
    let (status, body) = get_json(app(), "/nowhere/a:b:c").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_ROUTE");
}

#[tokio::test]
async fn test_parameters_are_percent_decoded() {
    let (status, body) = get_json(app(), "/items/caf%C3%A9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["id"], "café");

    let (status, body) = get_json(app(), "/items/a%3Fb?tab=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["id"], "a?b");
}

#[tokio::test]
async fn test_encoded_literal_route_matches() {
    let (status, body) = get_json(app(), "/caf%C3%A9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handler"], "Cafe");
    assert_eq!(body["action"], "index");
}

#[tokio::test]
async fn test_undecodable_segments_are_400() {
    let (status, body) = get_json(app(), "/items/a%2Fb").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_ROUTE");

    let (status, body) = get_json(app(), "/items/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_ROUTE");
}
