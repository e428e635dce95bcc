//! Integration tests driving the full webhook router.
//!
//! Run with: cargo test --test integration

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use provider_webhook::api::{create_router, AppState};
use provider_webhook::config::Config;

const FULL_QUERY: &str = "subscriptionId=00000000-0000-0000-0000-000000000000\
&resourceGroup=rg1&providerNamespace=Microsoft.Contoso\
&resourceType=widgets&resourceTypeName=widget1";

const SCOPE_PARAMS: [(&str, &str); 5] = [
    ("subscriptionId", "00000000-0000-0000-0000-000000000000"),
    ("resourceGroup", "rg1"),
    ("providerNamespace", "Microsoft.Contoso"),
    ("resourceType", "widgets"),
    ("resourceTypeName", "widget1"),
];

const CREATE_REFUSAL: &str =
    "SampleErrorMessage - Please don't create this resource. This is dangerous.";
const DELETE_REFUSAL: &str =
    "SampleErrorMessage - Please don't delete this resource. This is important.";

fn app() -> Router {
    let config = Config::default();
    create_router(AppState::new(&config), config.body_limit_bytes)
}

async fn call(method: Method, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
    let response = app()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn begin(body: Value) -> Value {
    let uri = format!("/Provider/OnResourceCreationBegin?{FULL_QUERY}");
    let (status, bytes) = call(Method::PUT, &uri, Body::from(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test]
async fn validate_endpoints_accept_complete_parameters_with_empty_body() {
    for action in ["OnResourceCreationValidate", "OnResourceDeletionValidate"] {
        let uri = format!("/Provider/{action}?{FULL_QUERY}");
        let (status, bytes) = call(Method::POST, &uri, Body::empty()).await;

        assert_eq!(status, StatusCode::OK, "{action}");
        assert!(bytes.is_empty(), "{action} should return an empty body");
    }
}

#[tokio::test]
async fn creation_validate_refuses_missing_parameter_in_body() {
    let uri = "/Provider/OnResourceCreationValidate?subscriptionId=s&resourceGroup=rg";
    let (status, bytes) = call(Method::POST, uri, Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({
            "error": {
                "code": "SampleErrorCode",
                "message": CREATE_REFUSAL
            },
            "status": "Failed"
        })
    );
}

#[tokio::test]
async fn validate_endpoints_refuse_each_missing_parameter() {
    for (action, message) in [
        ("OnResourceCreationValidate", CREATE_REFUSAL),
        ("OnResourceDeletionValidate", DELETE_REFUSAL),
    ] {
        for (dropped, _) in SCOPE_PARAMS {
            let query = SCOPE_PARAMS
                .iter()
                .filter(|(name, _)| *name != dropped)
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("&");
            let uri = format!("/Provider/{action}?{query}");
            let (status, bytes) = call(Method::POST, &uri, Body::empty()).await;

            assert_eq!(status, StatusCode::OK, "{action} without {dropped}");
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(
                body,
                json!({
                    "error": { "code": "SampleErrorCode", "message": message },
                    "status": "Failed"
                }),
                "{action} without {dropped}"
            );
        }
    }
}

#[tokio::test]
async fn validate_endpoints_bind_parameter_names_case_insensitively() {
    let query = SCOPE_PARAMS
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let name = if i % 2 == 0 {
                name.to_lowercase()
            } else {
                name.to_uppercase()
            };
            format!("{name}={value}")
        })
        .collect::<Vec<_>>()
        .join("&");

    for action in ["OnResourceCreationValidate", "OnResourceDeletionValidate"] {
        let uri = format!("/Provider/{action}?{query}");
        let (status, bytes) = call(Method::POST, &uri, Body::empty()).await;

        assert_eq!(status, StatusCode::OK, "{action}");
        assert!(bytes.is_empty(), "{action} should accept mixed-case keys");
    }
}

#[tokio::test]
async fn repeated_parameter_keeps_ok_status_on_every_post_endpoint() {
    let query = format!("{FULL_QUERY}&resourceGroup=other");
    for action in [
        "OnResourceCreationValidate",
        "OnResourceDeletionValidate",
        "OnResourceCreationCompleted",
    ] {
        let uri = format!("/Provider/{action}?{query}");
        let (status, bytes) = call(Method::POST, &uri, Body::empty()).await;

        assert_eq!(status, StatusCode::OK, "{action}");
        assert!(bytes.is_empty(), "{action} should use the first resourceGroup");
    }
}

#[tokio::test]
async fn creation_begin_accepts_repeated_parameter() {
    let uri = format!("/Provider/OnResourceCreationBegin?{FULL_QUERY}&resourceGroup=other");
    let body = json!({ "properties": {} }).to_string();
    let (status, bytes) = call(Method::PUT, &uri, Body::from(body)).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["properties"]["internalMetadata"].is_object());
}

#[tokio::test]
async fn deletion_validate_refuses_empty_parameter() {
    let query = FULL_QUERY.replace("resourceTypeName=widget1", "resourceTypeName=");
    let uri = format!("/Provider/OnResourceDeletionValidate?{query}");
    let (status, bytes) = call(Method::POST, &uri, Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "Failed");
    assert_eq!(body["error"]["message"], DELETE_REFUSAL);
}

#[tokio::test]
async fn creation_begin_initializes_internal_metadata() {
    let body = begin(json!({ "properties": { "sku": "standard" } })).await;

    let meta = &body["properties"]["internalMetadata"];
    assert_eq!(meta["description"], "This is your private data.");
    assert_eq!(meta["createdTime"], meta["lastUpdatedTime"]);
    assert_eq!(body["properties"]["sku"], "standard");
}

#[tokio::test]
async fn creation_begin_preserves_existing_metadata_and_refreshes_update_time() {
    let created = (Utc::now() - Duration::days(1)).to_rfc3339();
    let body = begin(json!({
        "properties": {
            "internalMetadata": {
                "description": "existing description",
                "createdTime": created,
                "lastUpdatedTime": created
            }
        }
    }))
    .await;

    let meta = &body["properties"]["internalMetadata"];
    assert_eq!(meta["description"], "existing description");
    assert_eq!(meta["createdTime"], json!(created));
    assert!(timestamp(&meta["lastUpdatedTime"]) >= timestamp(&meta["createdTime"]));
    assert_ne!(meta["lastUpdatedTime"], json!(created));
}

#[tokio::test]
async fn creation_begin_round_trips_unrelated_fields() {
    let sent = json!({
        "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Contoso/widgets/w1",
        "location": "eastus",
        "properties": {
            "count": 7,
            "tags": ["a", "b"],
            "nested": { "deep": { "flag": true } },
            "nothing": null
        }
    });

    let mut received = begin(sent.clone()).await;

    let properties = received["properties"].as_object_mut().unwrap();
    assert!(properties.remove("internalMetadata").is_some());
    assert_eq!(received, sent);
}

#[tokio::test]
async fn creation_begin_rejects_malformed_body() {
    let uri = format!("/Provider/OnResourceCreationBegin?{FULL_QUERY}");
    let (status, bytes) = call(Method::PUT, &uri, Body::from("{ not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "InvalidRequestContent");
    assert_eq!(body["status"], "Failed");
}

#[tokio::test]
async fn creation_begin_rejects_non_object_metadata() {
    let uri = format!("/Provider/OnResourceCreationBegin?{FULL_QUERY}");
    let body = json!({ "properties": { "internalMetadata": [1, 2] } }).to_string();
    let (status, _) = call(Method::PUT, &uri, Body::from(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn creation_completed_always_returns_empty_ok() {
    for uri in [
        "/Provider/OnResourceCreationCompleted".to_string(),
        format!("/Provider/OnResourceCreationCompleted?{FULL_QUERY}"),
    ] {
        let (status, bytes) = call(Method::POST, &uri, Body::from("ignored")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(bytes.is_empty());
    }
}
