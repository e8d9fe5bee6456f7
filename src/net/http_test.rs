use super::*;
use crate::net::request::{RequestClient, RequestOptions};
use axum::Router;
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::rc::Rc;

// =============================================================================
// Throwaway authority
// =============================================================================

const SESSION_COOKIE: &str = "JSESSIONID=abc123";

async fn login() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        axum::Json(json!({ "success": true, "message": "ok" })),
    )
}

async fn user_info(headers: HeaderMap) -> axum::Json<Value> {
    let signed_in = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE));
    if signed_in {
        axum::Json(json!({ "success": true, "data": { "id": 1, "username": "alice", "role": "user" } }))
    } else {
        axum::Json(json!({ "success": false, "message": "not logged in" }))
    }
}

async fn spawn_authority() -> String {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/user/info", get(user_info));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn session_cookie_from_login_is_replayed() {
    let origin = spawn_authority().await;
    let client = RequestClient::new(Rc::new(HttpTransport::new(&origin).unwrap()));

    let before = client.get("/api/user/info").await.unwrap();
    assert_eq!(before["success"], json!(false));

    client.post("/api/login", &json!({ "username": "alice", "password": "pw" })).await.unwrap();

    let after = client.get("/api/user/info").await.unwrap();
    assert_eq!(after["success"], json!(true));
    assert_eq!(after["data"]["username"], json!("alice"));
}

#[tokio::test]
async fn omitted_credentials_do_not_send_cookie() {
    let origin = spawn_authority().await;
    let transport = HttpTransport::new(&origin).unwrap().with_session_cookie(SESSION_COOKIE);
    let client = RequestClient::new(Rc::new(transport));

    let omitted = client
        .request("/api/user/info", RequestOptions::default().with_credentials(Credentials::Omit))
        .await
        .unwrap();
    assert_eq!(omitted["success"], json!(false));

    let included = client.get("/api/user/info").await.unwrap();
    assert_eq!(included["success"], json!(true));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = RequestClient::new(Rc::new(HttpTransport::new("http://127.0.0.1:1").unwrap()));
    let err = client.get("/api/user/info").await.unwrap_err();
    assert!(matches!(err, RequestError::Network(_)));
}

#[test]
fn relative_origin_is_rejected() {
    assert!(HttpTransport::new("/api").is_err());
}
