//! Client for the remote classification service
//!
//! Each operation is one request/response exchange with no internal retries.
//! Failures are reported as a `TransportError` that separates "no response"
//! from "failure response".

mod client;
mod error;
pub mod messages;

pub use client::ServiceClient;
pub use error::TransportError;

use crate::session::{AnalyticsSummary, BatchResult, HistoryEntry, PredictionResult};
use async_trait::async_trait;

/// Successful probe outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAlive {
    /// HTTP status of the probe response
    pub status: u16,
    /// Informational message from the service root, if any
    pub message: Option<String>,
}

/// Operations offered by the classification service
///
/// Implementations:
/// - `ServiceClient`: JSON over HTTP
/// - test doubles that script responses and count calls
#[async_trait]
pub trait ClassifierApi: Send + Sync {
    /// Base URL, for log lines and error text
    fn base_url(&self) -> &str;

    /// Reachability check; any 2xx counts as alive
    async fn probe(&self) -> Result<ServiceAlive, TransportError>;

    /// Classify one non-blank text
    async fn predict_one(&self, text: &str) -> Result<PredictionResult, TransportError>;

    /// Classify non-blank texts; results keep input order
    async fn predict_batch(&self, texts: &[String]) -> Result<BatchResult, TransportError>;

    /// Most recent history entries, oldest first, at most `limit`
    ///
    /// A malformed body yields an empty list rather than an error.
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, TransportError>;

    /// Aggregate analytics; `None` when the service has no predictions yet
    async fn fetch_analytics(&self) -> Result<Option<AnalyticsSummary>, TransportError>;

    /// Clear the service's history log
    async fn clear_history(&self) -> Result<(), TransportError>;
}
