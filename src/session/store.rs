use super::models::{AnalyticsSummary, BatchResult, HistoryEntry, PredictionResult};
use super::state::{ConnectionStatus, ErrorState, SessionState};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared handle to the session state
///
/// Every write goes through a single write lock, so readers never observe a
/// half-applied transition. Setters replace their whole slice.
#[derive(Clone, Default)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the current state
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Apply a composite transition atomically
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut state = self.state.write().await;
        f(&mut state)
    }

    pub async fn set_connection_status(&self, status: ConnectionStatus) {
        debug!("Connection status -> {:?}", status);
        self.update(|s| s.connection = status).await;
    }

    pub async fn set_prediction(&self, prediction: Option<PredictionResult>) {
        self.update(|s| s.prediction = prediction).await;
    }

    pub async fn set_batch_result(&self, batch: Option<BatchResult>) {
        self.update(|s| s.batch = batch).await;
    }

    pub async fn set_history(&self, history: Vec<HistoryEntry>) {
        self.update(|s| {
            s.history = history;
            s.last_refreshed_at = Some(chrono::Utc::now());
        })
        .await;
    }

    pub async fn set_analytics(&self, analytics: Option<AnalyticsSummary>) {
        self.update(|s| s.analytics = analytics).await;
    }

    pub async fn set_error(&self, error: Option<ErrorState>) {
        self.update(|s| s.error = error).await;
    }

    pub async fn set_warning(&self, warning: Option<String>) {
        self.update(|s| s.warning = warning).await;
    }

    pub async fn set_loading(&self, loading: bool) {
        self.update(|s| s.loading = loading).await;
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        self.state.read().await.connection
    }

    pub async fn error(&self) -> Option<ErrorState> {
        self.state.read().await.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::ErrorCategory;

    fn sample_prediction(text: &str) -> PredictionResult {
        PredictionResult {
            text: text.to_string(),
            prediction: 0,
            confidence: 0.8,
            text_length: text.chars().count(),
            word_count: text.split_whitespace().count(),
        }
    }

    #[tokio::test]
    async fn test_setters_replace_slice() {
        let store = SessionStore::new();
        store.set_prediction(Some(sample_prediction("first"))).await;
        store.set_prediction(Some(sample_prediction("second message"))).await;

        let snapshot = store.snapshot().await;
        let prediction = snapshot.prediction.unwrap();
        assert_eq!(prediction.text, "second message");
        assert_eq!(prediction.word_count, 2);
    }

    #[tokio::test]
    async fn test_update_is_applied_as_one_transition() {
        let store = SessionStore::new();
        store
            .set_error(Some(ErrorState::new(ErrorCategory::Server, "HTTP 500")))
            .await;
        store.set_loading(true).await;

        store
            .update(|s| {
                s.prediction = Some(sample_prediction("ok"));
                s.error = None;
                s.loading = false;
            })
            .await;

        let snapshot = store.snapshot().await;
        assert!(snapshot.prediction.is_some());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_history_refresh_stamps_time() {
        let store = SessionStore::new();
        assert!(store.snapshot().await.last_refreshed_at.is_none());

        store.set_history(Vec::new()).await;
        assert!(store.snapshot().await.last_refreshed_at.is_some());
    }
}
