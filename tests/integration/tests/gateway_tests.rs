//! Gateway Integration Tests
//!
//! Run with: cargo test -p integration-tests --test gateway_tests
//!
//! Everything except the PostgreSQL round trip runs against the in-memory
//! store; that one needs DATABASE_URL.

use integration_tests::{
    assert_status, check_test_env, fixtures::*, TestServer, WsClient,
};
use relay_core::MessageStore;
use reqwest::StatusCode;

// ============================================================================
// HTTP
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (server, _store) = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    let body = assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(body, "OK");
}

// ============================================================================
// Join
// ============================================================================

#[tokio::test]
async fn test_init_with_empty_store() {
    let (server, _store) = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();

    alice.send_json(&init_frame("alice")).await.unwrap();

    let history = alice.expect_kind("history").await.unwrap();
    assert_eq!(history["messages"], serde_json::json!([]));

    let joined = alice.expect_kind("system").await.unwrap();
    assert_eq!(system_text(&joined), Some("alice joined the chat"));
    assert!(joined["timestamp"].is_string());
}

#[tokio::test]
async fn test_join_notice_reaches_existing_clients() {
    let (server, _store) = TestServer::start().await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    let _alice = server.join("alice").await.unwrap();

    let notice = bob.expect_kind("system").await.unwrap();
    assert_eq!(system_text(&notice), Some("alice joined the chat"));
    bob.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_ws_path_is_also_served() {
    let (server, _store) = TestServer::start().await.unwrap();
    let mut client = WsClient::connect(&server.ws_url("/ws")).await.unwrap();

    client.send_json(&init_frame("carol")).await.unwrap();
    client.expect_kind("history").await.unwrap();
}

#[tokio::test]
async fn test_history_replays_stored_messages_oldest_first() {
    let (server, store) = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    for text in ["first", "second", "third"] {
        alice.say(text).await.unwrap();
        alice.expect_kind("message").await.unwrap();
    }
    assert_eq!(store.len(), 3);

    let mut bob = server.connect().await.unwrap();
    bob.send_json(&init_frame("bob")).await.unwrap();

    let history = bob.expect_kind("history").await.unwrap();
    let bodies: Vec<_> = history["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
    assert_eq!(history["messages"][0]["username"], "alice");
}

// ============================================================================
// Messages and typing
// ============================================================================

#[tokio::test]
async fn test_message_round_trip() {
    let (server, store) = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    alice.expect_kind("system").await.unwrap();

    alice.say("hi").await.unwrap();

    let to_alice = alice.expect_kind("message").await.unwrap();
    let to_bob = bob.expect_kind("message").await.unwrap();
    assert_eq!(to_alice, to_bob);

    let stored = store.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].username.as_deref(), Some("alice"));
    assert_eq!(stored[0].body, "hi");

    let payload = &to_bob["message"];
    assert_eq!(payload["id"], stored[0].id.to_string());
    assert_eq!(payload["username"], "alice");
    assert_eq!(payload["message"], "hi");
    assert!(payload["timestamp"].is_string());

    alice.expect_silence().await.unwrap();
    bob.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_message_before_init_is_anonymous() {
    let (server, store) = TestServer::start().await.unwrap();
    let mut anon = server.connect().await.unwrap();

    anon.say("hello?").await.unwrap();

    let event = anon.expect_kind("message").await.unwrap();
    assert!(event["message"].get("username").is_none());
    assert!(store.all()[0].is_anonymous());
}

#[tokio::test]
async fn test_typing_is_not_echoed() {
    let (server, _store) = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    alice.expect_kind("system").await.unwrap();

    alice.typing().await.unwrap();

    let typing = bob.expect_kind("typing").await.unwrap();
    assert_eq!(typing, serde_json::json!({"type": "typing", "username": "alice"}));
    alice.expect_silence().await.unwrap();
}

// ============================================================================
// Leave
// ============================================================================

#[tokio::test]
async fn test_leave_notice_sent_once() {
    let (server, _store) = TestServer::start().await.unwrap();
    let alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    server.wait_for_connections(2).await.unwrap();

    alice.close().await.unwrap();

    let notice = bob.expect_kind("system").await.unwrap();
    assert_eq!(system_text(&notice), Some("alice left the chat"));
    server.wait_for_connections(1).await.unwrap();
    bob.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_unnamed_disconnect_is_quiet() {
    let (server, _store) = TestServer::start().await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    let anon = server.connect().await.unwrap();
    server.wait_for_connections(2).await.unwrap();

    anon.close().await.unwrap();

    server.wait_for_connections(1).await.unwrap();
    bob.expect_silence().await.unwrap();
}

// ============================================================================
// Malformed input
// ============================================================================

#[tokio::test]
async fn test_malformed_frames_are_ignored() {
    let (server, store) = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    alice.expect_kind("system").await.unwrap();

    for raw in ["{}", "not json", r#"{"type":"shout"}"#, r#"{"type":"message"}"#] {
        alice.send_text(raw).await.unwrap();
    }
    alice.send_binary(vec![1, 2, 3]).await.unwrap();

    alice.expect_silence().await.unwrap();
    bob.expect_silence().await.unwrap();
    assert!(store.is_empty());
    assert_eq!(server.state.registry().len(), 2);

    // The session is still usable
    alice.say("still here").await.unwrap();
    assert_eq!(bob.expect_kind("message").await.unwrap()["message"]["message"], "still here");
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[tokio::test]
async fn test_postgres_backed_round_trip() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start_from_env().await.expect("Failed to start server");
    let name = unique_username("pg");
    let mut client = server.join(&name).await.unwrap();

    let text = format!("persisted by {name}");
    client.say(&text).await.unwrap();
    let event = client.expect_kind("message").await.unwrap();
    assert_eq!(event["message"]["message"], text.as_str());

    let config = integration_tests::test_config().unwrap();
    let store = relay_gateway::server::build_store(&config.store).await.unwrap();
    let recent = store.recent(50).await.unwrap();
    assert!(recent.iter().any(|m| m.body == text && m.username.as_deref() == Some(name.as_str())));
}
