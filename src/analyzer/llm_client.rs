use crate::analyzer::prompts::Prompt;
use crate::error::ClientError;
use crate::models::{AnalysisConfig, RawModelResponse};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Bound for the model listing and connectivity checks.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_DETAIL_CHARS: usize = 200;

pub trait ModelServerClient: Send + Sync {
    fn list_models(&self) -> BoxFuture<'_, Result<BTreeSet<String>, ClientError>>;

    fn check_connectivity(&self) -> BoxFuture<'_, bool>;

    /// Sends one completion request. `timeout` bounds the whole exchange and
    /// the request is dropped as soon as `cancel` fires. Never retries.
    fn complete<'a>(
        &'a self,
        prompt: &'a Prompt,
        model: &'a str,
        timeout: Duration,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<RawModelResponse, ClientError>>;

    fn base_url(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for an Ollama-compatible model server.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Server {
                status: None,
                detail: format!("HTTP client setup failed: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, ClientError> {
        Self::new(&config.server_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_tags(&self) -> Result<BTreeSet<String>, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/api/tags"))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, HEALTH_CHECK_TIMEOUT))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: Some(status.as_u16()),
                detail: body_detail(&body),
            });
        }

        let tags: TagsResponse = response.json().await.map_err(|e| ClientError::Server {
            status: None,
            detail: format!("invalid model list: {}", e),
        })?;

        Ok(tags.models.into_iter().map(|tag| tag.name).collect())
    }

    /// Returns the generated text and the model name the server reported.
    async fn generate(
        &self,
        prompt: &Prompt,
        model: &str,
        timeout: Duration,
    ) -> Result<(String, Option<String>), ClientError> {
        let request = GenerateRequest {
            model,
            prompt: prompt.as_str(),
            stream: false,
        };

        let response = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e, timeout))?;

        debug!(status = status.as_u16(), body_bytes = body.len(), "generate response received");

        // A bare 404 usually means a wrong base URL path, not a missing model.
        if !status.is_success() && mentions_missing_model(&body) {
            return Err(ClientError::ModelNotFound {
                model: model.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::Server {
                status: Some(status.as_u16()),
                detail: body_detail(&body),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Server {
                status: None,
                detail: format!("undecodable response body: {}", e),
            })?;

        if let Some(error) = parsed.error {
            if mentions_missing_model(&error) {
                return Err(ClientError::ModelNotFound {
                    model: model.to_string(),
                });
            }
            return Err(ClientError::Server {
                status: None,
                detail: error,
            });
        }

        let text = parsed.response.ok_or_else(|| ClientError::Server {
            status: None,
            detail: "response field missing".to_string(),
        })?;
        let answered_by = parsed.model.filter(|name| !name.trim().is_empty());

        Ok((text, answered_by))
    }

    fn map_transport_error(&self, err: reqwest::Error, timeout: Duration) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout { timeout }
        } else if err.is_connect() || err.is_request() || err.is_builder() {
            ClientError::Connection {
                url: self.base_url.clone(),
                detail: err.to_string(),
            }
        } else {
            ClientError::Server {
                status: err.status().map(|s| s.as_u16()),
                detail: err.to_string(),
            }
        }
    }
}

impl ModelServerClient for OllamaClient {
    fn list_models(&self) -> BoxFuture<'_, Result<BTreeSet<String>, ClientError>> {
        Box::pin(async move {
            let models = self.fetch_tags().await?;
            debug!(count = models.len(), "listed models");
            Ok(models)
        })
    }

    fn check_connectivity(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let check = self
                .http
                .get(self.endpoint("/api/tags"))
                .timeout(HEALTH_CHECK_TIMEOUT)
                .send()
                .await;

            match check {
                Ok(response) => response.status().is_success(),
                Err(e) => {
                    debug!(error = %e, url = %self.base_url, "connectivity check failed");
                    false
                }
            }
        })
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a Prompt,
        model: &'a str,
        timeout: Duration,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<RawModelResponse, ClientError>> {
        Box::pin(async move {
            let started = Instant::now();
            debug!(
                model,
                timeout_ms = timeout.as_millis() as u64,
                prompt_chars = prompt.len(),
                "sending generate request"
            );

            // Dropping the exchange future aborts the HTTP request.
            let (text, answered_by) = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                outcome = tokio::time::timeout(timeout, self.generate(prompt, model, timeout)) => {
                    match outcome {
                        Ok(result) => result?,
                        Err(_) => {
                            warn!(model, timeout_ms = timeout.as_millis() as u64, "generate request timed out");
                            return Err(ClientError::Timeout { timeout });
                        }
                    }
                }
            };

            let answered_by = answered_by.unwrap_or_else(|| model.to_string());
            Ok(RawModelResponse::new(text, answered_by, started.elapsed()))
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Ollama tags without an explicit version resolve to `:latest`.
pub fn model_is_available(models: &BTreeSet<String>, name: &str) -> bool {
    let wanted = name.trim();
    if wanted.is_empty() {
        return false;
    }

    let wanted = wanted.strip_suffix(":latest").unwrap_or(wanted);
    models
        .iter()
        .any(|model| model.strip_suffix(":latest").unwrap_or(model) == wanted)
}

fn mentions_missing_model(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("not found") && lower.contains("model")
}

/// Prefers the `error` field of a JSON error body over the raw text.
fn body_detail(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_string));

    let detail = from_json.unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        return "empty error body".to_string();
    }

    if detail.chars().count() > MAX_DETAIL_CHARS {
        format!("{}...", detail.chars().take(MAX_DETAIL_CHARS).collect::<String>())
    } else {
        detail
    }
}
