//! Native [`Transport`] backed by `reqwest`.
//!
//! DESIGN
//! ======
//! Browsers keep the session cookie for us; natively the transport owns a
//! cookie jar and applies the [`Credentials`] policy itself: cookies are sent
//! and stored only for requests that include credentials. Relative URLs
//! (`/api/user/info`) resolve against the configured origin.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{COOKIE, SET_COOKIE};
use url::Url;

use super::request::{Credentials, HttpRequest, Method, Transport};
use super::types::RequestError;

pub struct HttpTransport {
    client: reqwest::Client,
    origin: Url,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`RequestError::Network`] if `origin` is not an absolute URL or
    /// the HTTP client cannot be built.
    pub fn new(origin: &str) -> Result<Self, RequestError> {
        let origin = Url::parse(origin).map_err(|e| RequestError::Network(format!("invalid origin {origin}: {e}")))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RequestError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { client, origin, jar: Arc::new(Jar::default()) })
    }

    /// Seed the jar with an existing session cookie (`JSESSIONID=...`).
    #[must_use]
    pub fn with_session_cookie(self, cookie: &str) -> Self {
        self.jar.add_cookie_str(cookie, &self.origin);
        self
    }

    fn resolve(&self, url: &str) -> Result<Url, RequestError> {
        self.origin
            .join(url)
            .map_err(|e| RequestError::Network(format!("invalid url {url}: {e}")))
    }

    fn carries_credentials(&self, credentials: Credentials, url: &Url) -> bool {
        match credentials {
            Credentials::Include => true,
            Credentials::SameOrigin => url.origin() == self.origin.origin(),
            Credentials::Omit => false,
        }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, RequestError> {
        let url = self.resolve(&request.url)?;
        let with_cookies = self.carries_credentials(request.credentials, &url);

        let mut builder = self.client.request(reqwest_method(request.method), url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if with_cookies {
            if let Some(cookies) = self.jar.cookies(&url) {
                builder = builder.header(COOKIE, cookies);
            }
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;
        if with_cookies {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            self.jar.set_cookies(&mut set_cookies, &url);
        }

        response
            .text()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))
    }
}
