use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::session::SessionContext;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{ApiResponse, ErrorBody};

/// Typed access to the HR backend.
///
/// Every request carries the session's bearer token when there is one. A
/// 401 from the backend drops the session before the error is returned.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Dispatching request");

        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends and maps the status line; the body is left to the caller.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected credentials, clearing session");
            self.session.clear();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
            let parsed: ErrorBody = serde_json::from_value(body.clone()).unwrap_or_default();
            let message = parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

            warn!(status = status.as_u16(), %message, "Backend returned an error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
                code: parsed.code,
                body,
            });
        }

        Ok(response)
    }

    /// Sends and unwraps the `{ success, message, ... }` envelope.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;

        if !envelope.success {
            return Err(ClientError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        Ok(envelope)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.fetch(self.request(Method::GET, path)).await?.data)
    }

    pub(crate) async fn get_with<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Ok(self
            .fetch(self.request(Method::GET, path).query(query))
            .await?
            .data)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Ok(self
            .fetch(self.request(Method::POST, path).json(body))
            .await?
            .data)
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Ok(self
            .fetch(self.request(Method::PUT, path).json(body))
            .await?
            .data)
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.fetch(self.request(Method::DELETE, path)).await?.data)
    }
}
