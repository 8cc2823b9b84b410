use crate::session::{AnalyticsSummary, HistoryEntry};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state for the mock service handlers
#[derive(Clone, Default)]
pub struct MockState {
    /// Every prediction made so far, oldest first
    pub history: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, entries: impl IntoIterator<Item = HistoryEntry>) {
        let mut history = self.history.write().await;
        history.extend(entries);
    }

    /// The last `limit` entries, oldest first
    pub async fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let history = self.history.read().await;
        let start = history.len().saturating_sub(limit);
        history[start..].to_vec()
    }

    /// Analytics over the whole history; all zeros when empty
    pub async fn analytics(&self) -> AnalyticsSummary {
        let history = self.history.read().await;
        AnalyticsSummary::from_entries(&history).unwrap_or(AnalyticsSummary {
            total_predictions: 0,
            spam_count: 0,
            ham_count: 0,
            spam_percentage: 0.0,
            average_confidence: 0.0,
            average_text_length: 0.0,
        })
    }

    pub async fn clear(&self) {
        self.history.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.read().await.is_empty()
    }
}
