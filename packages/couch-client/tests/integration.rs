use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use couch_client::{initialize, upsert, Config, Document, Error, TransportConfig};

fn doc(value: serde_json::Value) -> Document {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_upsert_creates_missing_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "not_found", "reason": "missing"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/users/alice"))
        .and(body_json(json!({"a": 1})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"ok": true, "id": "alice", "rev": "1-abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = initialize(&Config::new("users").with_url(server.uri())).unwrap();
    let ack = upsert(&handle.db, "alice", doc(json!({"a": 1}))).await.unwrap();

    assert!(ack.ok);
    assert_eq!(ack.id, "alice");
    assert_eq!(ack.rev, "1-abc");
}

#[tokio::test]
async fn test_upsert_updates_existing_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_id": "alice", "_rev": "1-abc", "a": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/users/alice"))
        .and(body_json(json!({"a": 2, "_rev": "1-abc"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"ok": true, "id": "alice", "rev": "2-def"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = initialize(&Config::new("users").with_url(server.uri())).unwrap();
    let ack = handle.db.upsert("alice", doc(json!({"a": 2}))).await.unwrap();

    assert_eq!(ack.rev, "2-def");
}

#[tokio::test]
async fn test_upsert_read_failure_skips_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized",
            "reason": "Name or password is incorrect."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let handle = initialize(&Config::new("users").with_url(server.uri())).unwrap();
    let err = handle
        .db
        .upsert("alice", doc(json!({"a": 1})))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_upsert_conflict_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "alice", "_rev": "1-abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "conflict",
            "reason": "Document update conflict."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = initialize(&Config::new("users").with_url(server.uri())).unwrap();
    let err = handle
        .db
        .upsert("alice", doc(json!({"a": 2})))
        .await
        .unwrap_err();

    match err {
        Error::Couch { status, error, .. } => {
            assert_eq!(status, 409);
            assert_eq!(error, "conflict");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_document_id_is_one_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/org%2Falice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "org/alice", "_rev": "1-abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = initialize(&Config::new("users").with_url(server.uri())).unwrap();
    let fetched = handle.db.get("org/alice").await.unwrap();

    assert_eq!(fetched.get("_rev"), Some(&json!("1-abc")));
}

#[tokio::test]
async fn test_transport_options_are_applied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .and(header("x-request-source", "couch-client-tests"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "alice", "_rev": "1-a"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut transport: TransportConfig = serde_json::from_value(json!({
        "url": "http://127.0.0.1:1",
        "auth": {"username": "admin", "password": "secret"},
        "timeout_ms": 5000
    }))
    .unwrap();
    transport
        .headers
        .insert("x-request-source".to_string(), "couch-client-tests".to_string());

    let config = Config::new("users")
        .with_url(server.uri())
        .with_request(transport);
    let handle = initialize(&config).unwrap();

    assert_eq!(handle.couch.url(), server.uri());
    handle.db.get("alice").await.unwrap();
}

#[tokio::test]
async fn test_dot_segment_id_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&server)
        .await;

    let handle = initialize(&Config::new("users").with_url(server.uri())).unwrap();
    for id in ["", ".", ".."] {
        let err = upsert(&handle.db, id, doc(json!({"a": 1}))).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDocumentId { .. }), "{id:?} gave {err:?}");
    }
}
