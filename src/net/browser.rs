//! Browser [`Transport`] backed by `gloo-net` (`fetch`).
//!
//! The browser owns the cookie jar; the credentials mode is passed straight
//! through to `fetch`.

use gloo_net::http::{Request, RequestBuilder};
use web_sys::RequestCredentials;

use super::request::{Credentials, HttpRequest, Method, Transport};
use super::types::RequestError;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

fn builder(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Delete => Request::delete(url),
        Method::Patch => Request::patch(url),
    }
}

fn credentials_mode(credentials: Credentials) -> RequestCredentials {
    match credentials {
        Credentials::Include => RequestCredentials::Include,
        Credentials::SameOrigin => RequestCredentials::SameOrigin,
        Credentials::Omit => RequestCredentials::Omit,
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, RequestError> {
        let mut builder =
            builder(request.method, &request.url).credentials(credentials_mode(request.credentials));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let request = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| RequestError::Serialization(format!("failed to build request: {e}")))?;

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))
    }
}
