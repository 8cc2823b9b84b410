use super::models::{AnalyticsSummary, BatchResult, HistoryEntry, PredictionResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reachability of the remote service, as decided by the last probe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

/// Failure classes shown to the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Empty input, rejected locally
    Validation,
    /// Predict attempted while the service is not ready
    NotConnected,
    /// No response received
    Unreachable,
    /// Response received with a failure status or an unusable body
    Server,
}

/// The single active user-facing error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub category: ErrorCategory,
    pub message: String,
}

impl ErrorState {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Everything the presentation layer renders from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub connection: ConnectionStatus,

    /// Last successful single prediction
    pub prediction: Option<PredictionResult>,

    /// Last successful batch prediction
    pub batch: Option<BatchResult>,

    /// Local copy of the most recent history entries, oldest first
    pub history: Vec<HistoryEntry>,

    /// Absent when the service has no predictions yet
    pub analytics: Option<AnalyticsSummary>,

    /// True while a predict call is in flight
    pub loading: bool,

    pub error: Option<ErrorState>,

    /// Non-critical refresh failure; never shares the error slot
    pub warning: Option<String>,

    /// When history was last refreshed successfully
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Most recent history entry, if any
    pub fn latest_history_entry(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionStatus::Connected
    }
}
