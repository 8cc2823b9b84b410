use crate::session::models::{self, HistoryEntry};

/// Phrases that push a text towards spam
const SPAM_KEYWORDS: &[&str] = &[
    "urgent",
    "winner",
    "free",
    "limited time",
    "click now",
    "offer",
    "discount",
];

/// Keyword hits needed before a text is labelled spam
const SPAM_THRESHOLD: usize = 2;

/// Label and confidence for `text`
///
/// Two or more keyword hits: spam, confidence 0.7 + 0.1 per hit (max 0.95).
/// Otherwise ham, confidence grows with length from 0.6 (max 0.9).
pub fn classify(text: &str) -> (u8, f64) {
    let lower = text.to_lowercase();
    let hits = SPAM_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();

    if hits >= SPAM_THRESHOLD {
        (models::SPAM, (0.7 + hits as f64 * 0.1).min(0.95))
    } else {
        let length = models::text_length(text) as f64;
        (models::HAM, (0.6 + length / 100.0 * 0.2).min(0.9))
    }
}

/// Score `text` and stamp it as a new history entry
pub fn score(text: &str) -> HistoryEntry {
    let (prediction, confidence) = classify(text);

    HistoryEntry {
        text: text.to_string(),
        prediction,
        confidence,
        text_length: models::text_length(text),
        word_count: models::word_count(text),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}
