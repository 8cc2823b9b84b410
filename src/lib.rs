pub mod api;
pub mod config;
pub mod coordinator;
pub mod mock;
pub mod session;

pub use api::{ClassifierApi, ServiceAlive, ServiceClient, TransportError};
pub use config::Config;
pub use coordinator::{Coordinator, CoordinatorError, Phase};
pub use mock::{MockServer, MockState};
pub use session::{
    AnalyticsSummary, BatchItem, BatchResult, ConnectionStatus, ErrorCategory, ErrorState,
    HistoryEntry, PredictionResult, SessionConfig, SessionState, SessionStore,
};
