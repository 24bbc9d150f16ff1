//! HTTP connection to the marketplace REST API.
//!
//! Wraps a `reqwest` client, the API base URL and the shared
//! [`SessionContext`]. Merchant-scoped calls carry the session's bearer token;
//! public calls carry nothing. Every non-2xx response is turned into a
//! [`ClientError`], with the body's `message` field surfaced when present.

use reqwest::{multipart::Form, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::session::SessionContext;

/// Shared HTTP plumbing used by every API wrapper.
#[derive(Clone)]
pub struct Connection {
    http: reqwest::Client,
    base_url: String,
    /// The session consulted for bearer tokens and invalidated on 401.
    pub session: SessionContext,
}

impl Connection {
    pub fn new(base_url: &str, timeout: Duration, session: SessionContext) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request; `auth` attaches the bearer token or fails with
    /// [`ClientError::NoSession`].
    fn request(&self, method: Method, path: &str, auth: bool) -> Result<RequestBuilder> {
        debug!(%method, path, "api request");
        let builder = self.http.request(method, self.url(path));
        if !auth {
            return Ok(builder);
        }
        let token = self.session.token().ok_or(ClientError::NoSession)?;
        Ok(builder.bearer_auth(token))
    }

    /// Map a response to `Ok` for 2xx, otherwise to the matching error.
    async fn check(&self, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = extract_message(&text);
        warn!(status = status.as_u16(), message = ?message, "api call rejected");

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(ClientError::Unauthorized(message.unwrap_or_default()));
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let resp = self.check(builder.send().await?).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn send_unit(&self, builder: RequestBuilder) -> Result<()> {
        self.check(builder.send().await?).await?;
        Ok(())
    }

    // -- Authenticated -----------------------------------------------------

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, path, true)?.query(query);
        self.send_json(builder).await
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let builder = self.request(Method::GET, path, true)?;
        let resp = self.check(builder.send().await?).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path, true)?.json(body);
        self.send_json(builder).await
    }

    /// POST without a body, ignoring whatever the backend returns.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::POST, path, true)?;
        self.send_unit(builder).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::PUT, path, true)?.json(body);
        self.send_json(builder).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path, true)?;
        self.send_unit(builder).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let builder = self.request(Method::POST, path, true)?.multipart(form);
        self.send_json(builder).await
    }

    // -- Public (no auth) --------------------------------------------------

    pub async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, path, false)?.query(query);
        self.send_json(builder).await
    }

    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path, false)?.json(body);
        self.send_json(builder).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}` or `{"error": ..}`; anything else yields `None`.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
