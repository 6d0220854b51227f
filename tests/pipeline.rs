//! Dispatcher and router behaviour without sockets.

mod common;

use std::collections::BTreeMap;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use content_dispatch::config::{parse_config, RouteConfig};
use content_dispatch::dispatch::{RestVerb, METHOD_FIELD, SUPPRESS_RESPONSE_CODES};
use content_dispatch::routing::ApiFormat;
use content_dispatch::{DispatcherConfig, ErrorKind, InboundRequest};
use serde_json::Value;
use tower::ServiceExt;

use common::{dispatcher, router};

#[test]
fn test_nested_paths_lift_parent_id() {
    let d = dispatcher(&DispatcherConfig::default());

    for (parent, id, sub) in [("content", "22", "comments"), ("users", "7", "posts"), ("a", "0", "b")] {
        let plan = d
            .plan(&InboundRequest::new("GET", format!("/{parent}/{id}/{sub}")))
            .unwrap();
        assert_eq!(plan.route.resource_name, sub);
        assert_eq!(plan.route.remaining_path, "");
        assert_eq!(plan.params.get(parent).map(String::as_str), Some(id));
    }
}

#[test]
fn test_unmatched_paths_add_no_side_params() {
    let d = dispatcher(&DispatcherConfig::default());

    for path in ["/content", "/content/22", "/content/abc/comments", "/a/b/c/d"] {
        let plan = d.plan(&InboundRequest::new("GET", path)).unwrap();
        assert!(plan.params.is_empty(), "path {path}");
    }
}

#[test]
fn test_version_and_format_anywhere_eligible() {
    let d = dispatcher(&DispatcherConfig::default());

    let plan = d
        .plan(&InboundRequest::new("GET", "/v2/content/22/comments.xml?x=1"))
        .unwrap();
    assert_eq!(plan.route.api_version, "v2");
    assert_eq!(plan.route.api_format, ApiFormat::Xml);
    assert_eq!(plan.route.resource_name, "comments");
    assert_eq!(plan.params["content"], "22");
    assert_eq!(plan.handler_id, "ControllerV2XmlCommentsGet");
}

#[test]
fn test_method_override_only_on_post() {
    let d = dispatcher(&DispatcherConfig::default());

    let post = d
        .plan(&InboundRequest::new("POST", "/content/3").param(METHOD_FIELD, "DELETE"))
        .unwrap();
    assert_eq!(post.verb, RestVerb::Delete);
    assert_eq!(post.handler_id, "ControllerV1JsonContentDelete");

    let get = d
        .plan(&InboundRequest::new("GET", "/content/3").param(METHOD_FIELD, "DELETE"))
        .unwrap();
    assert_eq!(get.handler_id, "ControllerV1JsonContentGet");
}

#[test]
fn test_unsupported_method() {
    let err = dispatcher(&DispatcherConfig::default())
        .plan(&InboundRequest::new("TRACE", "/content"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("TRACE"));
}

#[test]
fn test_aliases_default_resource_and_custom_routes() {
    let config = parse_config(
        r#"
        [dispatch]
        default_resource = "content"
        actions = ["like"]

        [resources.aliases]
        articles = "content"

        [[routes]]
        pattern = '(\w+)/(\d+)/(\w+)'
        replacement = "$3"
        "#,
    )
    .unwrap();
    assert_eq!(config.route_rules(), vec![RouteConfig::new(r"(\w+)/(\d+)/(\w+)", "$3")]);
    let d = dispatcher(&config);

    let plan = d.plan(&InboundRequest::new("GET", "/articles/4")).unwrap();
    assert_eq!(plan.route.resource_name, "content");
    assert_eq!(plan.route.remaining_path, "4");

    let plan = d.plan(&InboundRequest::new("GET", "/v1")).unwrap();
    assert_eq!(plan.route.resource_name, "content");

    let plan = d.plan(&InboundRequest::new("GET", "/users/9/articles")).unwrap();
    assert_eq!(plan.route.resource_name, "content");
    assert_eq!(plan.params, BTreeMap::from([("users".to_string(), "9".to_string())]));

    let plan = d.plan(&InboundRequest::new("GET", "/content/5/count")).unwrap();
    assert_eq!(plan.route.resource_name, "count");
    assert_eq!(plan.route.action, None);
}

#[test]
fn test_handle_full_cycle() {
    let mut config = DispatcherConfig::default();
    config.dispatch.default_resource = Some("content".into());
    let d = dispatcher(&config);

    let created = d.handle(InboundRequest::new("POST", "/content").param("title", "t"));
    assert_eq!(created.status, 201);
    let id = created.body["content_id"].as_u64().unwrap();

    // `content/{id}/like` reorders to `like`, leaving only the default resource
    let liked = d.handle(
        InboundRequest::new("POST", format!("/content/{id}/LIKE")).param(METHOD_FIELD, "PUT"),
    );
    assert_eq!(liked.status, 200);
    assert_eq!(liked.body["action"], "like");
    assert_eq!(liked.body["content_id"], id);

    let missing = d.handle(
        InboundRequest::new("GET", "/content/999").param(SUPPRESS_RESPONSE_CODES, "1"),
    );
    assert_eq!(missing.status, 200);
    assert_eq!(missing.body["code"], 404);
}

#[test]
fn test_nested_action_without_default_resource_is_not_found() {
    let d = dispatcher(&DispatcherConfig::default());

    let plan = d.plan(&InboundRequest::new("GET", "/content/5/like"));
    assert_eq!(plan.unwrap_err().kind(), ErrorKind::NotFound);

    let reply = d.handle(InboundRequest::new("PUT", "/content/5/like"));
    assert_eq!(reply.status, 404);
    assert_eq!(reply.body["kind"], "not_found");
}

#[test]
fn test_default_route_ignores_partial_segments() {
    let d = dispatcher(&DispatcherConfig::default());

    let plan = d.plan(&InboundRequest::new("GET", "/my-blog/22/comments")).unwrap();
    assert_eq!(plan.route.resource_name, "my-blog");
    assert_eq!(plan.route.remaining_path, "22/comments");
    assert!(plan.params.is_empty());
}

#[tokio::test]
async fn test_router_oneshot() {
    let response = router(DispatcherConfig::default())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/content")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"body":"no title"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["kind"], "invalid_argument");
    assert!(body["message"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_router_undecodable_body() {
    let response = router(DispatcherConfig::default())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/content")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body[0]["message"], "Request body is not a JSON object.");
}
