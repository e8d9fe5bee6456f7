use super::*;
use crate::test_helpers::ScriptedTransport;
use serde_json::json;

fn client(transport: &Rc<ScriptedTransport>) -> RequestClient {
    RequestClient::new(transport.clone())
}

// =============================================================================
// Option merging
// =============================================================================

#[test]
fn defaults_include_credentials_and_json() {
    let request = HttpRequest::resolve("/api/x", RequestOptions::default());
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.credentials, Credentials::Include);
    assert_eq!(request.header("content-type"), Some(JSON_CONTENT_TYPE));
    assert!(request.body.is_none());
}

#[test]
fn caller_fields_take_precedence() {
    let options = RequestOptions::method(Method::Put)
        .with_credentials(Credentials::Omit)
        .with_body("{}".into());
    let request = HttpRequest::resolve("/api/x", options);
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.credentials, Credentials::Omit);
    assert_eq!(request.body.as_deref(), Some("{}"));
}

#[test]
fn caller_headers_replace_default_headers_wholesale() {
    let options = RequestOptions::default().with_headers(vec![("X-Trace".into(), "1".into())]);
    let request = HttpRequest::resolve("/api/x", options);
    assert_eq!(request.header("X-Trace"), Some("1"));
    assert!(request.header("Content-Type").is_none());
}

#[test]
fn absent_caller_fields_keep_defaults() {
    let merged = RequestOptions::method(Method::Post).merged_over(RequestOptions::defaults());
    assert_eq!(merged.credentials, Some(Credentials::Include));
    assert!(merged.headers.is_some());
}

#[test]
fn method_parses_case_insensitively() {
    assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
    assert!("TRACE".parse::<Method>().is_err());
}

#[test]
fn endpoint_joins_base_and_path() {
    assert_eq!(endpoint("/api", "/user/info"), "/api/user/info");
    assert_eq!(endpoint("/api/", "logout"), "/api/logout");
    assert_eq!(endpoint("https://shop.example/api", "/login"), "https://shop.example/api/login");
    assert_eq!(endpoint("", "/login"), "/login");
}

// =============================================================================
// request / convenience wrappers
// =============================================================================

#[tokio::test]
async fn request_returns_parsed_body_even_for_logical_failure() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": false, "message": "nope" }));

    let value = client(&transport).get("/api/cart").await.unwrap();
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["message"], json!("nope"));
}

#[tokio::test]
async fn request_propagates_network_error() {
    let transport = ScriptedTransport::new();
    transport.fail("connection refused");

    let err = client(&transport).get("/api/cart").await.unwrap_err();
    assert_eq!(err, RequestError::Network("connection refused".into()));
}

#[tokio::test]
async fn request_reports_non_json_body_as_parse_error() {
    let transport = ScriptedTransport::new();
    transport.reply_raw("<html>502 Bad Gateway</html>");

    let err = client(&transport).get("/api/cart").await.unwrap_err();
    assert!(matches!(err, RequestError::Parse(_)));
}

#[tokio::test]
async fn post_serializes_body_with_defaults() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true }));

    client(&transport)
        .post("/api/cart/add", &json!({ "productId": 3, "quantity": 2 }))
        .await
        .unwrap();

    let sent = transport.last_request();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.url, "/api/cart/add");
    assert_eq!(sent.credentials, Credentials::Include);
    assert_eq!(sent.header("Content-Type"), Some(JSON_CONTENT_TYPE));
    let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "productId": 3, "quantity": 2 }));
}

#[tokio::test]
async fn put_uses_put_method() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true }));

    client(&transport).put("/api/cart/update", &json!({ "quantity": 1 })).await.unwrap();
    assert_eq!(transport.last_request().method, Method::Put);
}

#[tokio::test]
async fn delete_without_data_sends_no_body() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true }));

    client(&transport).delete::<Value>("/api/cart/clear", None).await.unwrap();
    let sent = transport.last_request();
    assert_eq!(sent.method, Method::Delete);
    assert!(sent.body.is_none());
}

#[tokio::test]
async fn delete_with_data_sends_body() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true }));

    client(&transport)
        .delete("/api/cart/remove", Some(&json!({ "productId": 9 })))
        .await
        .unwrap();
    assert_eq!(transport.last_request().body.as_deref(), Some(r#"{"productId":9}"#));
}

#[tokio::test]
async fn request_envelope_rejects_mismatched_data() {
    let transport = ScriptedTransport::new();
    transport.reply_json(json!({ "success": true, "data": { "username": 5 } }));

    let result = client(&transport)
        .request_envelope::<crate::net::types::Identity>("/api/user/info", RequestOptions::default())
        .await;
    assert!(matches!(result, Err(RequestError::Parse(_))));
}
