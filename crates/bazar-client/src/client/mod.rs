//! HTTP client for the storefront REST backend.
//!
//! All endpoints live under `{base}/api/v1/`. Every response body is folded
//! into an [`ApiEnvelope`]; non-2xx statuses become [`ClientError::Api`], and
//! 401/403 additionally clear the shared [`Session`].

mod auth;
mod categories;
mod products;
mod subcategories;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::error::{ClientError, GENERIC_ERROR_MESSAGE};
use crate::session::Session;

pub use auth::LoginResponse;
pub use products::{ImageUpload, ProductPage, ProductUpdate};

const API_PREFIX: &str = "api/v1/";
const DEFAULT_USER_AGENT: &str = "bazar/0.1";

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_root: Url,
    session: Arc<Session>,
}

impl ApiClient {
    /// Creates a client rooted at `{base_url}/api/v1/`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: Option<&str>,
        session: Arc<Session>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        let base = format!("{}/", base_url.trim().trim_end_matches('/'));
        let api_root = Url::parse(&base)
            .and_then(|root| root.join(API_PREFIX))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_root,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.api_root
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.api_root.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "api request");
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope, ClientError> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send(builder, path).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope, ClientError> {
        let builder = self.request(method, path)?.json(body);
        self.send(builder, path).await
    }

    pub(crate) async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiEnvelope, ClientError> {
        let builder = self.request(method, path)?.multipart(form);
        self.send(builder, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<ApiEnvelope, ClientError> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder, path).await
    }

    /// Sends the request and folds the response into an envelope.
    ///
    /// 401 and 403 force a logout before the error is returned.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<ApiEnvelope, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = parse_body(&text);

        if status.is_success() {
            return body
                .map(ApiEnvelope::from_body)
                .map_err(|e| ClientError::Deserialize {
                    context: format!("response body for {path}"),
                    source: e,
                });
        }

        let message = body
            .ok()
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map_or_else(|| GENERIC_ERROR_MESSAGE.to_string(), str::to_owned);
        let code = status.as_u16();
        tracing::debug!(status = code, path, message = %message, "api error response");

        if code == 401 || code == 403 {
            self.session.force_logout(code);
            return Err(ClientError::Unauthorized {
                status: code,
                message,
            });
        }
        Err(ClientError::Api {
            status: code,
            message,
        })
    }
}

/// Parses a response body; an empty body is `Null`.
fn parse_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
}
