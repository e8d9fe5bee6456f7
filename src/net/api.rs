//! Typed wrappers for the storefront's account endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session cache and page controller call these instead of building
//! URLs and envelopes by hand. All of them go through [`RequestClient`] and so
//! carry the session cookie.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::request::{RequestClient, RequestOptions, endpoint};
use super::types::{
    ApiResponse, ChangePasswordRequest, Identity, LoginRequest, RegisterRequest, RequestError,
};

pub const USER_INFO_PATH: &str = "/user/info";
pub const LOGOUT_PATH: &str = "/logout";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const CHANGE_PASSWORD_PATH: &str = "/user/change-password";

/// "Who am I" query: `GET {base}/user/info`.
///
/// # Errors
///
/// Returns a [`RequestError`] on transport failure or a malformed envelope.
pub async fn fetch_user_info(client: &RequestClient, base: &str) -> Result<ApiResponse<Identity>, RequestError> {
    client
        .request_envelope(&endpoint(base, USER_INFO_PATH), RequestOptions::default())
        .await
}

/// End the server session: `GET {base}/logout`.
///
/// # Errors
///
/// Returns a [`RequestError`] on transport failure or a malformed envelope.
pub async fn logout(client: &RequestClient, base: &str) -> Result<ApiResponse, RequestError> {
    let value = client.get(&endpoint(base, LOGOUT_PATH)).await?;
    decode(value)
}

/// Credential login: `POST {base}/login`. Never logs the password.
///
/// # Errors
///
/// Returns a [`RequestError`] on transport failure or a malformed envelope.
pub async fn login(client: &RequestClient, base: &str, username: &str, password: &str) -> Result<ApiResponse, RequestError> {
    let value = client
        .post(&endpoint(base, LOGIN_PATH), &LoginRequest { username, password })
        .await?;
    decode(value)
}

/// Account creation: `POST {base}/register`.
///
/// # Errors
///
/// Returns a [`RequestError`] on transport failure or a malformed envelope.
pub async fn register(
    client: &RequestClient,
    base: &str,
    request: &RegisterRequest<'_>,
) -> Result<ApiResponse, RequestError> {
    let value = client.post(&endpoint(base, REGISTER_PATH), request).await?;
    decode(value)
}

/// Password change for the signed-in user: `POST {base}/user/change-password`.
///
/// # Errors
///
/// Returns a [`RequestError`] on transport failure or a malformed envelope.
pub async fn change_password(
    client: &RequestClient,
    base: &str,
    request: &ChangePasswordRequest<'_>,
) -> Result<ApiResponse, RequestError> {
    let value = client.post(&endpoint(base, CHANGE_PASSWORD_PATH), request).await?;
    decode(value)
}

fn decode(value: Value) -> Result<ApiResponse, RequestError> {
    serde_json::from_value(value).map_err(|e| RequestError::Parse(format!("unexpected envelope: {e}")))
}
