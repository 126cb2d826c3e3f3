// crates/hub-server/tests/http_routes.rs

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use common::join;
use http_body_util::BodyExt;
use hub_broker::{Broker, MemoryBroker};
use hub_protocol::UPDATES_TOPIC;
use hub_server::hub_task::{start_hub, HubHandle};
use hub_server::routes::build_router;
use hub_server::types::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> (Router, Arc<MemoryBroker>, HubHandle) {
    let broker = Arc::new(MemoryBroker::new());
    let hub = start_hub(broker.as_ref()).await.unwrap();
    let state = AppState {
        hub: hub.clone(),
        broker: broker.clone(),
        mailbox_capacity: 8,
    };
    (build_router(state), broker, hub)
}

fn post_publish(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/publish")
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn health_reports_registry_size() {
    let (router, _broker, hub) = app().await;
    let (_id, _rx) = join(&hub, "alice", 4).await;

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["clients"], 1);
    assert_eq!(body["users"], 1);
}

#[tokio::test]
async fn publish_forwards_message_to_updates_topic() {
    let (router, broker, _hub) = app().await;
    let mut observer = broker.subscribe(UPDATES_TOPIC).await.unwrap();

    let response = router
        .oneshot(post_publish(r#"{"target_user_id":"alice","type":"x","payload":{"n":1}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, Bytes::from_static(b"Message published"));

    let published: Value = serde_json::from_slice(&observer.recv().await.unwrap()).unwrap();
    assert_eq!(
        published,
        json!({"target_user_id": "alice", "type": "x", "payload": {"n": 1}})
    );
}

#[tokio::test]
async fn publish_fills_in_missing_fields() {
    let (router, broker, _hub) = app().await;
    let mut observer = broker.subscribe(UPDATES_TOPIC).await.unwrap();

    let response = router.oneshot(post_publish(r#"{"type":"ping"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let published: Value = serde_json::from_slice(&observer.recv().await.unwrap()).unwrap();
    assert_eq!(published, json!({"target_user_id": "", "type": "ping", "payload": null}));
}

#[tokio::test]
async fn publish_rejects_invalid_json() {
    let (router, _broker, _hub) = app().await;

    let response = router.oneshot(post_publish("{nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn publish_reports_broker_failure() {
    let (router, broker, _hub) = app().await;
    broker.close().await.unwrap();

    let response = router
        .oneshot(post_publish(r#"{"type":"x","payload":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["code"], "PUBLISH_FAILED");
}

#[tokio::test]
async fn publish_only_accepts_post() {
    let (router, _broker, _hub) = app().await;

    let response = router
        .oneshot(Request::get("/publish").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
