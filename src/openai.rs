//! Shared HTTP transport for the OpenAI-compatible APIs.
//!
//! Both the embedding provider and the chat model send JSON through
//! [`OpenAIClient::post_json`], which owns authentication, the per-call
//! timeout, and the retry policy.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pdf_rag_core::{RagError, Result};

/// Authenticated client for one API base URL.
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    max_retries: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagError::external("http", e))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            api_base: api_base.into(),
            max_retries,
        })
    }

    /// Full URL for an endpoint path such as `"embeddings"`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST `body` to `path` and decode the JSON reply, retrying transient
    /// failures. `service` names the caller in errors and logs.
    pub async fn post_json<B, R>(&self, service: &str, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                debug!(service, attempt, delay_secs = delay.as_secs(), "retrying");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json::<R>().await.map_err(|e| {
                            RagError::external(service, format!("invalid response body: {}", e))
                        });
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    let err = RagError::external(
                        service,
                        format!("API error {}: {}", status, error_detail(&body_text)),
                    );

                    if is_retryable(status) {
                        warn!(service, %status, attempt, "transient API error");
                        last_err = Some(err);
                        continue;
                    }

                    return Err(err);
                }
                Err(e) => {
                    warn!(service, error = %e, attempt, "request failed");
                    last_err = Some(RagError::external(service, e));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| RagError::external(service, "request failed after retries")))
    }
}

/// Delay before retry number `attempt` (1-based).
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.saturating_sub(1).min(5))
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

/// The API's `error.message` when the body has one, else the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
