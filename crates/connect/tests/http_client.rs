//! HttpConnectClient against a mock Connect server
//!
//! Client calls block their thread, so most tests make them through
//! `spawn_blocking` the way async callers should.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use opfield_connect::{ConnectClient, ConnectError, HttpConnectClient, Item, Vault};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn vaults(server: &MockServer, title: &'static str) -> Result<Vec<Vault>, ConnectError> {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        HttpConnectClient::new(&uri, "test-token")
            .and_then(|client| client.get_vaults_by_title(title))
    })
    .await
    .expect("blocking task panicked")
}

async fn item(
    server: &MockServer,
    title: &'static str,
    vault_id: &'static str,
) -> Result<Item, ConnectError> {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        HttpConnectClient::new(&uri, "test-token")
            .and_then(|client| client.get_item_by_title(title, vault_id))
    })
    .await
    .expect("blocking task panicked")
}

#[tokio::test]
async fn test_get_vaults_by_title_sends_filter_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .and(query_param("filter", "name eq \"Engineering\""))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "v1", "name": "Engineering"},
            {"id": "v2", "name": "Engineering", "description": "copy"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let result = vaults(&server, "Engineering").await.unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, "v1");
    assert_eq!(result[1].description.as_deref(), Some("copy"));
}

#[tokio::test]
async fn test_get_vaults_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(vaults(&server, "Nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_maps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": 401,
            "message": "Invalid token signature"
        })))
        .mount(&server)
        .await;

    let err = vaults(&server, "Engineering").await.unwrap_err();
    match err {
        ConnectError::Unauthorized { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid token signature");
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = vaults(&server, "Engineering").await.unwrap_err();
    match err {
        ConnectError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_item_by_title_fetches_full_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/v1/items"))
        .and(query_param("filter", "title eq \"db-creds\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "i1", "title": "db-creds", "vault": {"id": "v1"}, "category": "DATABASE"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/v1/items/i1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "i1",
            "title": "db-creds",
            "vault": {"id": "v1"},
            "category": "DATABASE",
            "fields": [
                {"id": "f1", "label": "host", "value": "db.internal", "type": "STRING"},
                {"id": "f2", "label": "port", "value": "5432", "type": "STRING"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = item(&server, "db-creds", "v1").await.unwrap();
    assert_eq!(item.get_value("host"), "db.internal");
    assert_eq!(item.get_value("port"), "5432");
}

#[tokio::test]
async fn test_get_item_by_title_none_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = item(&server, "db-creds", "v1").await.unwrap_err();
    assert!(matches!(err, ConnectError::ItemNotFound { .. }));
}

#[tokio::test]
async fn test_get_item_by_title_ambiguous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "i1", "title": "db-creds"},
            {"id": "i2", "title": "db-creds"}
        ])))
        .mount(&server)
        .await;

    let err = item(&server, "db-creds", "v1").await.unwrap_err();
    assert!(matches!(err, ConnectError::AmbiguousItem { count: 2, .. }));
}

#[tokio::test]
async fn test_get_item_unknown_vault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/missing/items"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "vault not found"
        })))
        .mount(&server)
        .await;

    let err = item(&server, "db-creds", "missing").await.unwrap_err();
    match err {
        ConnectError::NotFound { message } => assert_eq!(message, "vault not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = vaults(&server, "Engineering").await.unwrap_err();
    assert!(matches!(err, ConnectError::Decode(_)));
}

#[tokio::test]
async fn test_vault_title_with_quotes_is_escaped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .and(query_param("filter", r#"name eq "Team \"Blue\"""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "v7", "name": "Team \"Blue\""}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let result = vaults(&server, r#"Team "Blue""#).await.unwrap();
    assert_eq!(result[0].id, "v7");
}

#[tokio::test]
async fn test_vault_id_is_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/eng%2Fops/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "i1", "title": "db-creds"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults/eng%2Fops/items/i1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "i1",
            "title": "db-creds",
            "fields": [{"label": "host", "value": "db.internal"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = item(&server, "db-creds", "eng/ops").await.unwrap();
    assert_eq!(result.get_value("host"), "db.internal");
}

#[tokio::test]
async fn test_direct_call_from_async_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/vaults"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "v1", "name": "Engineering"}
        ])))
        .mount(&server)
        .await;

    let client = HttpConnectClient::new(&server.uri(), "test-token").unwrap();
    let result = client.get_vaults_by_title("Engineering").unwrap();
    assert_eq!(result[0].id, "v1");
}
