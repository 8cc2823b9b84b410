use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a client session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session identifier used in log lines (e.g., "session-5f0c...")
    pub session_id: String,

    /// Base URL of the classification service
    pub base_url: String,

    /// Number of history entries kept locally (most recent)
    /// Default: 10
    pub history_limit: usize,

    /// Per-request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            base_url: "http://localhost:8000".to_string(),
            history_limit: 10,
            request_timeout: None,
        }
    }
}
