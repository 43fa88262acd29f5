//! HTTP client for OpenAI-compatible APIs.
//!
//! The API layer is split into protocol modules:
//! - `completions`: streaming `/chat/completions`
//! - `files`: `/files` uploads
//! - `fine_tuning`: `/fine_tuning/jobs`
//! - `moderations`: `/moderations`
//! - `client`: the `ApiClient` facade tying them to one configured endpoint

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::ChatRequest;

mod client;
mod completions;
mod files;
mod fine_tuning;
mod moderations;
pub(crate) mod sse;

pub use client::ApiClient;

/// Content fragments of one streamed completion, in arrival order.
///
/// The stream ends (`None`) only after the provider's end-of-stream signal.
/// A failure is reported as a final `Err` item.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ApiError>> + Send>>;

/// Minimal streaming chat interface used by the chat loop.
///
/// Tests provide scripted fragment streams without network calls while the
/// production path uses [`ApiClient`].
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream, ApiError>;
}

/// Attach a bearer token unless it is empty (local providers skip auth).
pub(crate) fn with_bearer(
    req: reqwest::RequestBuilder,
    bearer: Option<&str>,
) -> reqwest::RequestBuilder {
    match bearer.filter(|value| !value.trim().is_empty()) {
        Some(token) => req.header("Authorization", format!("Bearer {token}")),
        None => req,
    }
}

/// Map non-2xx responses to `ApiError::Status` carrying the body text.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let code = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(code, "api returned error status");
    Err(ApiError::Status { code, body })
}

/// Check status and decode a JSON body into `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|err| ApiError::InvalidResponse(format!("unexpected response body: {err}")))
}
