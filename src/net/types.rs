//! Wire types shared with the storefront server.
//!
//! DESIGN
//! ======
//! Every endpoint answers with the same envelope: a `success` flag plus an
//! optional `data` payload and `message`. Logical failures travel in-band
//! inside that envelope; only transport and decoding problems surface as
//! [`RequestError`].

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ERROR
// =============================================================================

/// Failures raised by the request primitive.
///
/// `Network` and `Parse` are transport-level failures. A well-formed response
/// with `success: false` is never an error; it is returned in-band as an
/// [`ApiResponse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The request never produced a response body.
    #[error("network request failed: {0}")]
    Network(String),

    /// The response body was not the expected JSON shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The request payload could not be encoded.
    #[error("request encode failed: {0}")]
    Serialization(String),
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Response envelope used by every storefront endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Server message, or `fallback` when the server sent none.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Role carried by an identity. Anything other than these two fails decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The signed-in user as reported by `GET {base}/user/info`.
///
/// Fields other than `username` and `role` (`id`, `email`, `registerTime`, ...)
/// are server-defined and kept opaque in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role, extra: Map::new() }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Look up an opaque server-defined field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}
