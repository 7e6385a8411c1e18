//! HTTP client for the test management REST backend.
//!
//! Every call is logged with method, path, status and elapsed time, and every
//! failure is normalized into [`AppError::Request`]. Nothing is retried.

use std::borrow::Cow;
use std::time::Instant;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{ModulesApi, ProductsApi, TestCasesApi, TestRunsApi, TestSuitesApi, UploadsApi};
use crate::config::{Config, LANGUAGE_HEADER};
use crate::error::{AppError, AppResult, ErrorResponse};

/// Longest raw error body echoed into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the REST backend; cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_token: Option<SecretString>,
    language: String,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::request(None, format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "API client initialized (base_url={}, language={}, session_token={})",
            config.api_base(),
            config.language,
            if config.session_token.is_some() {
                "set"
            } else {
                "none"
            }
        );

        Ok(ApiClient {
            http,
            base_url: config.api_base(),
            session_token: config.session_token.clone(),
            language: config.language.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    pub fn modules(&self) -> ModulesApi<'_> {
        ModulesApi::new(self)
    }

    pub fn test_cases(&self) -> TestCasesApi<'_> {
        TestCasesApi::new(self)
    }

    pub fn test_suites(&self) -> TestSuitesApi<'_> {
        TestSuitesApi::new(self)
    }

    pub fn test_runs(&self) -> TestRunsApi<'_> {
        TestRunsApi::new(self)
    }

    pub fn uploads(&self) -> UploadsApi<'_> {
        UploadsApi::new(self)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(LANGUAGE_HEADER, &self.language);
        if let Some(ref token) = self.session_token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder
    }

    /// Send a request, log it, and turn non-success statuses into errors.
    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> AppResult<Response> {
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| {
            warn!(
                target: "api",
                "{} {} failed after {}ms: {}",
                method,
                path,
                start.elapsed().as_millis(),
                e
            );
            AppError::request(None, format!("{} {} failed: {}", method, path, e))
        })?;

        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis();

        if status.is_success() {
            debug!(target: "api", "{} {} -> {} ({}ms)", method, path, status.as_u16(), elapsed_ms);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(
            target: "api",
            "{} {} -> {} ({}ms): {}",
            method,
            path,
            status.as_u16(),
            elapsed_ms,
            message
        );
        Err(AppError::request(Some(status.as_u16()), message))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .send(Method::GET, path, self.request(Method::GET, path))
            .await?;
        decode_json(response).await
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> AppResult<Vec<u8>> {
        let response = self
            .send(Method::GET, path, self.request(Method::GET, path))
            .await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, builder).await?;
        decode_json(response).await
    }

    pub(crate) async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<()> {
        let builder = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, builder).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> AppResult<T> {
        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.send(Method::POST, path, builder).await?;
        decode_json(response).await
    }

    /// PUT whose response body, if any, is ignored.
    pub(crate) async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<()> {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, builder).await?;
        Ok(())
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.send(Method::PUT, path, builder).await?;
        decode_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> AppResult<()> {
        self.send(Method::DELETE, path, self.request(Method::DELETE, path))
            .await?;
        Ok(())
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::request(
            Some(status.as_u16()),
            format!("Unexpected response body: {}", e),
        )
    })
}

/// Pick the most useful message out of a failed response.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body)
        && let Some(message) = parsed.best_message()
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

/// Percent-encode a single path segment.
pub(crate) fn seg(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Reject empty identifiers before any request is made.
pub(crate) fn require(value: &str, what: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", what)));
    }
    Ok(())
}
