use super::*;
use crate::net::request::Method;
use crate::test_helpers::{ScriptedTransport, alice, identity_reply};
use serde_json::json;

#[tokio::test]
async fn fetch_user_info_hits_user_info_endpoint() {
    let transport = ScriptedTransport::new();
    transport.reply_json(identity_reply(&alice()));
    let client = RequestClient::new(transport.clone());

    let envelope = fetch_user_info(&client, "/api").await.unwrap();
    assert!(envelope.success);
    assert_eq!(envelope.data, Some(alice()));

    let sent = transport.last_request();
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.url, "/api/user/info");
}

#[tokio::test]
async fn logout_is_a_get() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true, "message": "bye" }));
    let client = RequestClient::new(transport.clone());

    let envelope = logout(&client, "/api").await.unwrap();
    assert!(envelope.success);
    assert_eq!(transport.last_request().method, Method::Get);
    assert_eq!(transport.last_request().url, "/api/logout");
}

#[tokio::test]
async fn login_posts_credentials() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": false, "message": "wrong password" }));
    let client = RequestClient::new(transport.clone());

    let envelope = login(&client, "/api", "alice", "hunter22").await.unwrap();
    assert!(!envelope.success);

    let sent = transport.last_request();
    assert_eq!(sent.url, "/api/login");
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "username": "alice", "password": "hunter22" }));
}

#[tokio::test]
async fn register_posts_email() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true }));
    let client = RequestClient::new(transport.clone());

    let request = RegisterRequest { username: "carol", password: "secret1", email: "carol@example.com" };
    register(&client, "/api", &request).await.unwrap();

    let body: serde_json::Value = serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], json!("carol@example.com"));
}

#[tokio::test]
async fn change_password_targets_user_endpoint() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true }));
    let client = RequestClient::new(transport.clone());

    let request = ChangePasswordRequest { old_password: "a", new_password: "bcdefg" };
    change_password(&client, "/api", &request).await.unwrap();
    assert_eq!(transport.last_request().url, "/api/user/change-password");
}

#[tokio::test]
async fn non_object_body_is_a_parse_error() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!([1, 2, 3]));
    let client = RequestClient::new(transport.clone());

    assert!(matches!(logout(&client, "/api").await, Err(RequestError::Parse(_))));
}
