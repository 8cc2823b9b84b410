use serde::{Deserialize, Serialize};

/// Label value the service uses for spam
pub const SPAM: u8 = 1;

/// Label value the service uses for ham (not spam)
pub const HAM: u8 = 0;

/// Outcome of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Text that was classified
    pub text: String,

    /// 1 = spam, 0 = ham
    pub prediction: u8,

    /// Model confidence (0.0 to 1.0)
    pub confidence: f64,

    /// Number of characters in `text`
    pub text_length: usize,

    /// Number of whitespace-delimited words in `text`
    pub word_count: usize,
}

impl PredictionResult {
    pub fn is_spam(&self) -> bool {
        self.prediction == SPAM
    }

    pub fn label(&self) -> &'static str {
        label_for(self.prediction)
    }
}

/// One row of a batch prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub text: String,
    pub prediction: u8,
    pub confidence: f64,
    /// "spam" or "ham"
    pub result: String,
}

/// Outcome of a batch prediction, in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_processed: usize,
    pub results: Vec<BatchItem>,
}

impl BatchResult {
    pub fn spam_count(&self) -> usize {
        self.results.iter().filter(|r| r.prediction == SPAM).count()
    }
}

/// A prediction recorded in the service's history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub prediction: u8,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub text_length: usize,
    #[serde(default)]
    pub word_count: usize,
    /// Timestamp as reported by the service (ISO 8601)
    #[serde(default)]
    pub timestamp: String,
}

/// Aggregate statistics over the service's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_predictions: u64,
    #[serde(default)]
    pub spam_count: u64,
    #[serde(default)]
    pub ham_count: u64,
    #[serde(default)]
    pub spam_percentage: f64,
    #[serde(default)]
    pub average_confidence: f64,
    #[serde(default)]
    pub average_text_length: f64,
}

impl AnalyticsSummary {
    /// Build a summary from history rows; `None` when there are no rows
    pub fn from_entries(entries: &[HistoryEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let total = entries.len() as u64;
        let spam_count = entries.iter().filter(|e| e.prediction == SPAM).count() as u64;
        let confidence_sum: f64 = entries.iter().map(|e| e.confidence).sum();
        let length_sum: usize = entries.iter().map(|e| e.text_length).sum();

        Some(Self {
            total_predictions: total,
            spam_count,
            ham_count: total - spam_count,
            spam_percentage: spam_count as f64 / total as f64 * 100.0,
            average_confidence: confidence_sum / total as f64,
            average_text_length: length_sum as f64 / total as f64,
        })
    }

    /// spam + ham must add up to the total, and the percentage must match the counts
    pub fn is_consistent(&self) -> bool {
        if self.spam_count + self.ham_count != self.total_predictions {
            return false;
        }
        if self.total_predictions == 0 {
            return true;
        }
        let expected = 100.0 * self.spam_count as f64 / self.total_predictions as f64;
        (self.spam_percentage - expected).abs() < 0.01
    }
}

pub fn label_for(prediction: u8) -> &'static str {
    if prediction == SPAM {
        "spam"
    } else {
        "ham"
    }
}

/// Character count, matching what the service reports as `text_length`
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

/// Number of whitespace-delimited non-empty tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
