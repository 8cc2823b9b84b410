use crate::session::models::{self, BatchItem, HistoryEntry, PredictionResult};
use serde::{Deserialize, Serialize};

/// Body of POST /predict
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Body of POST /predict-batch
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictRequest {
    pub texts: Vec<String>,
}

/// Response of GET /
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A scored text as the service reports it (single predict, batch rows)
///
/// Only `prediction` and `confidence` are required; the other fields are
/// filled in from the submitted text when the service leaves them out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl PredictResponse {
    fn label(&self) -> Result<u8, String> {
        match self.prediction {
            Some(p) if p == models::SPAM as i64 => Ok(models::SPAM),
            Some(p) if p == models::HAM as i64 => Ok(models::HAM),
            Some(p) => Err(format!("prediction must be 0 or 1, got {}", p)),
            None => Err("missing prediction".to_string()),
        }
    }

    fn checked_confidence(&self) -> Result<f64, String> {
        match self.confidence {
            Some(c) if c.is_finite() && (0.0..=1.0).contains(&c) => Ok(c),
            Some(c) => Err(format!("confidence out of range: {}", c)),
            None => Err("missing confidence".to_string()),
        }
    }

    /// Convert into a `PredictionResult`, backfilling from the submitted text
    pub fn into_prediction(self, submitted: &str) -> Result<PredictionResult, String> {
        let prediction = self.label()?;
        let confidence = self.checked_confidence()?;
        let text = self.text.unwrap_or_else(|| submitted.to_string());

        Ok(PredictionResult {
            text_length: self
                .text_length
                .unwrap_or_else(|| models::text_length(submitted)),
            word_count: self
                .word_count
                .unwrap_or_else(|| models::word_count(submitted)),
            text,
            prediction,
            confidence,
        })
    }

    /// Convert into a batch row, backfilling from the submitted text
    pub fn into_batch_item(self, submitted: &str) -> Result<BatchItem, String> {
        let prediction = self.label()?;
        let confidence = self.checked_confidence()?;

        Ok(BatchItem {
            text: self.text.unwrap_or_else(|| submitted.to_string()),
            result: self
                .result
                .unwrap_or_else(|| models::label_for(prediction).to_string()),
            prediction,
            confidence,
        })
    }
}

/// Response of POST /predict-batch
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    #[serde(default)]
    pub total_processed: Option<usize>,
    #[serde(default)]
    pub results: Vec<PredictResponse>,
}

/// Response of GET /history
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Query of GET /history
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}
