//! Client session state
//!
//! This module owns everything the presentation layer renders:
//! - Domain models returned by the classification service
//! - The `SessionState` snapshot (connection, results, history, analytics, errors)
//! - The `SessionStore`, the only writer of that state

mod config;
pub mod models;
mod state;
mod store;

pub use config::SessionConfig;
pub use models::{AnalyticsSummary, BatchItem, BatchResult, HistoryEntry, PredictionResult};
pub use state::{ConnectionStatus, ErrorCategory, ErrorState, SessionState};
pub use store::SessionStore;
