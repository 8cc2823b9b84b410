use super::error::TransportError;
use super::messages::{
    BatchPredictRequest, BatchPredictResponse, HistoryResponse, PredictRequest, PredictResponse,
    ServiceStatus,
};
use super::{ClassifierApi, ServiceAlive};
use crate::session::{AnalyticsSummary, BatchResult, HistoryEntry, PredictionResult, SessionConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest server-provided message carried into an error
const MAX_SERVER_MESSAGE: usize = 200;

/// HTTP client for the classification service
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client using the transport's default timeouts
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client with an optional per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        info!("Classification service client targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Self::with_timeout(config.base_url.clone(), config.request_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response
    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<(StatusCode, Vec<u8>), TransportError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TransportError::no_response(url, &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::no_response(url, &e))?
            .to_vec();

        debug!("{} -> {} ({} bytes)", url, status, body.len());

        if !status.is_success() {
            return Err(TransportError::Server {
                status: status.as_u16(),
                message: server_message(status, &body),
            });
        }

        Ok((status, body))
    }
}

/// Pull the most useful failure text out of an error body
fn server_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if let Some(message) = error_field(&value) {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.chars().take(MAX_SERVER_MESSAGE).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

fn error_field(value: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(|s| s.chars().take(MAX_SERVER_MESSAGE).collect())
}

fn decode_error(status: StatusCode, message: impl ToString) -> TransportError {
    TransportError::Decode {
        status: status.as_u16(),
        message: message.to_string(),
    }
}

#[async_trait]
impl ClassifierApi for ServiceClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn probe(&self) -> Result<ServiceAlive, TransportError> {
        let url = self.url("/");
        let (status, body) = self.send(self.client.get(&url), &url).await?;

        // The root body is informational only
        let info: ServiceStatus = serde_json::from_slice(&body).unwrap_or_default();

        Ok(ServiceAlive {
            status: status.as_u16(),
            message: info.message,
        })
    }

    async fn predict_one(&self, text: &str) -> Result<PredictionResult, TransportError> {
        let url = self.url("/predict");
        let request = PredictRequest {
            text: text.to_string(),
        };

        let (status, body) = self
            .send(self.client.post(&url).json(&request), &url)
            .await?;

        let value: Value =
            serde_json::from_slice(&body).map_err(|e| decode_error(status, e))?;

        // Model failures come back as 2xx with an `error` field
        if value.get("prediction").is_none() {
            if let Some(message) = value.get("error").and_then(Value::as_str) {
                return Err(TransportError::Server {
                    status: status.as_u16(),
                    message: message.to_string(),
                });
            }
        }

        let response: PredictResponse =
            serde_json::from_value(value).map_err(|e| decode_error(status, e))?;

        response
            .into_prediction(text)
            .map_err(|e| decode_error(status, e))
    }

    async fn predict_batch(&self, texts: &[String]) -> Result<BatchResult, TransportError> {
        let url = self.url("/predict-batch");
        let request = BatchPredictRequest {
            texts: texts.to_vec(),
        };

        let (status, body) = self
            .send(self.client.post(&url).json(&request), &url)
            .await?;

        let response: BatchPredictResponse =
            serde_json::from_slice(&body).map_err(|e| decode_error(status, e))?;

        if response.results.len() != texts.len() {
            warn!(
                "Batch returned {} results for {} texts",
                response.results.len(),
                texts.len()
            );
        }

        let mut results = Vec::with_capacity(response.results.len());
        for (index, item) in response.results.into_iter().enumerate() {
            let submitted = texts.get(index).map(String::as_str).unwrap_or_default();
            results.push(
                item.into_batch_item(submitted)
                    .map_err(|e| decode_error(status, format!("result {}: {}", index, e)))?,
            );
        }

        Ok(BatchResult {
            total_processed: response.total_processed.unwrap_or(results.len()),
            results,
        })
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, TransportError> {
        let limit = limit.max(1);
        let url = self.url("/history");

        let (_, body) = self
            .send(self.client.get(&url).query(&[("limit", limit)]), &url)
            .await?;

        let mut history = match serde_json::from_slice::<HistoryResponse>(&body) {
            Ok(response) => response.history,
            Err(e) => {
                debug!("Ignoring malformed history response: {}", e);
                Vec::new()
            }
        };

        if history.len() > limit {
            let excess = history.len() - limit;
            history.drain(..excess);
        }

        Ok(history)
    }

    async fn fetch_analytics(&self) -> Result<Option<AnalyticsSummary>, TransportError> {
        let url = self.url("/analytics");
        let (_, body) = self.send(self.client.get(&url), &url).await?;

        let value = match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => return Ok(None),
        };

        let summary: AnalyticsSummary = match serde_json::from_value(value) {
            Ok(summary) => summary,
            Err(e) => {
                debug!("Ignoring malformed analytics response: {}", e);
                return Ok(None);
            }
        };

        if summary.total_predictions == 0 {
            return Ok(None);
        }

        if !summary.is_consistent() {
            warn!(
                "Analytics counts disagree: spam={} ham={} total={}",
                summary.spam_count, summary.ham_count, summary.total_predictions
            );
        }

        Ok(Some(summary))
    }

    async fn clear_history(&self) -> Result<(), TransportError> {
        let url = self.url("/history");
        self.send(self.client.delete(&url), &url).await?;
        Ok(())
    }
}
