//! Generic authenticated request primitive.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything that talks to the storefront server goes through
//! [`RequestClient`]: the session refresh, logout, login and arbitrary page
//! calls. The actual I/O sits behind the [`Transport`] trait so the browser
//! build (`gloo-net`), the CLI (`reqwest`) and tests share the same logic.
//!
//! DESIGN
//! ======
//! Caller options are merged over fixed defaults one field at a time. A field
//! the caller supplies replaces the default field as a whole, so passing
//! `headers` drops the default `Content-Type`. Bodies are parsed as JSON
//! regardless of HTTP status because the server reports logical failures
//! in-band.
//!
//! ERROR HANDLING
//! ==============
//! Transport and decode failures are logged and returned to the caller.
//! There are no retries.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{ApiResponse, RequestError};

/// Default content type negotiated with the server.
pub const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// REQUEST MODEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = RequestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            other => Err(RequestError::Serialization(format!("unsupported method: {other}"))),
        }
    }
}

/// Which requests carry the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Include,
    SameOrigin,
    Omit,
}

/// Caller-supplied request options. `None` fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: Option<Vec<(String, String)>>,
    pub body: Option<String>,
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    /// Options every request starts from: cookies included, JSON content type.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            method: None,
            headers: Some(vec![("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned())]),
            body: None,
            credentials: Some(Credentials::Include),
        }
    }

    #[must_use]
    pub fn method(method: Method) -> Self {
        Self { method: Some(method), ..Self::default() }
    }

    #[must_use]
    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Some(headers);
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Overlay `self` on `base`; every field present in `self` wins.
    #[must_use]
    pub fn merged_over(self, base: Self) -> Self {
        Self {
            method: self.method.or(base.method),
            headers: self.headers.or(base.headers),
            body: self.body.or(base.body),
            credentials: self.credentials.or(base.credentials),
        }
    }
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub credentials: Credentials,
}

impl HttpRequest {
    fn resolve(url: &str, options: RequestOptions) -> Self {
        let options = options.merged_over(RequestOptions::defaults());
        Self {
            method: options.method.unwrap_or_default(),
            url: url.to_owned(),
            headers: options.headers.unwrap_or_default(),
            body: options.body,
            credentials: options.credentials.unwrap_or_default(),
        }
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Performs one round trip and returns the raw response body.
///
/// Implementations must not interpret HTTP status; the body is what the
/// caller parses.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// # Errors
    ///
    /// Returns [`RequestError::Network`] when no body could be obtained.
    async fn send(&self, request: HttpRequest) -> Result<String, RequestError>;
}

// =============================================================================
// CLIENT
// =============================================================================

/// Shared handle to a [`Transport`] with the default option policy applied.
#[derive(Clone)]
pub struct RequestClient {
    transport: Rc<dyn Transport>,
}

impl RequestClient {
    #[must_use]
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Network`] on transport failure and
    /// [`RequestError::Parse`] when the body is not JSON.
    pub async fn request(&self, url: &str, options: RequestOptions) -> Result<Value, RequestError> {
        let request = HttpRequest::resolve(url, options);
        let method = request.method;
        tracing::debug!(%method, %url, "request");

        let result = match self.transport.send(request).await {
            Ok(body) => serde_json::from_str::<Value>(&body)
                .map_err(|e| RequestError::Parse(format!("invalid JSON from {url}: {e}"))),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!(%method, %url, error = %e, "request failed");
        }
        result
    }

    /// Issue a request and decode the body as an [`ApiResponse`].
    ///
    /// # Errors
    ///
    /// Same as [`RequestClient::request`], plus [`RequestError::Parse`] when the
    /// envelope or its `data` does not match `T`.
    pub async fn request_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, RequestError> {
        let value = self.request(url, options).await?;
        serde_json::from_value(value).map_err(|e| {
            let err = RequestError::Parse(format!("unexpected envelope from {url}: {e}"));
            tracing::warn!(%url, error = %err, "request failed");
            err
        })
    }

    /// # Errors
    ///
    /// See [`RequestClient::request`].
    pub async fn get(&self, url: &str) -> Result<Value, RequestError> {
        self.request(url, RequestOptions::method(Method::Get)).await
    }

    /// # Errors
    ///
    /// See [`RequestClient::request`]; [`RequestError::Serialization`] if `data`
    /// cannot be encoded.
    pub async fn post<B: Serialize + ?Sized>(&self, url: &str, data: &B) -> Result<Value, RequestError> {
        self.request(url, RequestOptions::method(Method::Post).with_body(encode(data)?))
            .await
    }

    /// # Errors
    ///
    /// See [`RequestClient::post`].
    pub async fn put<B: Serialize + ?Sized>(&self, url: &str, data: &B) -> Result<Value, RequestError> {
        self.request(url, RequestOptions::method(Method::Put).with_body(encode(data)?))
            .await
    }

    /// `DELETE`, with a JSON body only when `data` is given.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::post`].
    pub async fn delete<B: Serialize + ?Sized>(
        &self,
        url: &str,
        data: Option<&B>,
    ) -> Result<Value, RequestError> {
        let mut options = RequestOptions::method(Method::Delete);
        if let Some(data) = data {
            options = options.with_body(encode(data)?);
        }
        self.request(url, options).await
    }
}

fn encode<B: Serialize + ?Sized>(data: &B) -> Result<String, RequestError> {
    serde_json::to_string(data).map_err(|e| RequestError::Serialization(e.to_string()))
}

/// Join an API base (`/api`, `https://shop.example/api/`) with an endpoint path.
#[must_use]
pub fn endpoint(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_owned()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
