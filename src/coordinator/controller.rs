use super::messages;
use super::phase::{Phase, PhaseCell};
use crate::api::{ClassifierApi, ServiceClient, TransportError};
use crate::session::{
    BatchResult, ConnectionStatus, ErrorCategory, ErrorState, PredictionResult, SessionConfig,
    SessionState, SessionStore,
};
use anyhow::Result;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Why a coordinator operation did not produce a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("not connected (coordinator is {phase:?})")]
    NotConnected { phase: Phase },

    #[error("operation not available while {0:?}")]
    Busy(Phase),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Drives connectivity checks and the request sequence around each user action
///
/// The coordinator is the only writer of the session store. Background work
/// (probe, history/analytics refreshes, remote history clears) runs as
/// detached tasks whose only effect is a store overwrite when they resolve.
#[derive(Clone)]
pub struct Coordinator {
    session_id: String,
    client: Arc<dyn ClassifierApi>,
    store: SessionStore,
    phase: Arc<PhaseCell>,
    history_limit: usize,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Coordinator {
    /// Create a coordinator and start the initial connectivity probe
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        client: Arc<dyn ClassifierApi>,
        store: SessionStore,
        config: &SessionConfig,
    ) -> Self {
        info!(
            "Creating coordinator {} for {}",
            config.session_id,
            client.base_url()
        );

        let coordinator = Self {
            session_id: config.session_id.clone(),
            client,
            store,
            phase: Arc::new(PhaseCell::new(Phase::Probing)),
            history_limit: config.history_limit.max(1),
            tasks: Arc::new(Mutex::new(Vec::new())),
        };

        let this = coordinator.clone();
        coordinator.track(tokio::spawn(async move {
            this.run_probe().await;
        }));

        coordinator
    }

    /// Build the HTTP client and a fresh store from config, then start probing
    pub fn connect(config: &SessionConfig) -> Result<Self> {
        let client = ServiceClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), SessionStore::new(), config))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase.load()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn snapshot(&self) -> SessionState {
        self.store.snapshot().await
    }

    /// Text of the active error, if any
    pub async fn user_error_message(&self) -> Option<String> {
        self.store.error().await.map(|e| e.message)
    }

    /// Re-run the connectivity probe and wait for its outcome
    pub async fn retry_connection(&self) -> Result<ConnectionStatus, CoordinatorError> {
        let current = self.phase.load();
        if matches!(current, Phase::Probing | Phase::Submitting) {
            debug!("Ignoring retry while {:?}", current);
            return Err(CoordinatorError::Busy(current));
        }

        self.phase
            .transition(current, Phase::Probing)
            .map_err(CoordinatorError::Busy)?;

        info!("Retrying connection to {}", self.client.base_url());

        // The probe runs as a tracked task, so it still resolves the phase if
        // this future is dropped while waiting
        let (tx, rx) = oneshot::channel();
        let this = self.clone();
        self.track(tokio::spawn(async move {
            this.store.set_error(None).await;
            let _ = tx.send(this.run_probe().await);
        }));

        match rx.await {
            Ok(status) => Ok(status),
            // Aborted by shutdown
            Err(_) => Ok(self.store.connection_status().await),
        }
    }

    /// Classify a single text
    pub async fn predict(&self, text: &str) -> Result<PredictionResult, CoordinatorError> {
        if text.trim().is_empty() {
            return Err(self.reject_invalid(messages::EMPTY_TEXT).await);
        }

        let guard = self.begin_submission().await?;

        match self.client.predict_one(text).await {
            Ok(result) => {
                info!(
                    "Prediction: {} (confidence {:.2})",
                    result.label(),
                    result.confidence
                );
                let stored = result.clone();
                self.store
                    .update(move |s| {
                        s.prediction = Some(stored);
                        s.error = None;
                        s.loading = false;
                    })
                    .await;
                guard.finish();
                self.spawn_refresh();
                Ok(result)
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                self.fail_submission(&e, "prediction").await;
                guard.finish();
                Err(e.into())
            }
        }
    }

    /// Classify several texts; blank entries are dropped before sending
    pub async fn predict_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<BatchResult, CoordinatorError> {
        let submitted: Vec<String> = texts
            .iter()
            .map(|t| t.as_ref())
            .filter(|t: &&str| !t.trim().is_empty())
            .map(str::to_string)
            .collect();

        if submitted.is_empty() {
            return Err(self.reject_invalid(messages::EMPTY_BATCH).await);
        }

        let guard = self.begin_submission().await?;

        match self.client.predict_batch(&submitted).await {
            Ok(batch) => {
                info!(
                    "Batch prediction: {} processed, {} spam",
                    batch.total_processed,
                    batch.spam_count()
                );
                let stored = batch.clone();
                self.store
                    .update(move |s| {
                        s.batch = Some(stored);
                        s.error = None;
                        s.loading = false;
                    })
                    .await;
                guard.finish();
                self.spawn_refresh();
                Ok(batch)
            }
            Err(e) => {
                warn!("Batch prediction failed: {}", e);
                self.fail_submission(&e, "batch prediction").await;
                guard.finish();
                Err(e.into())
            }
        }
    }

    /// Classify one message per line of `raw`
    pub async fn predict_batch_text(&self, raw: &str) -> Result<BatchResult, CoordinatorError> {
        let lines: Vec<&str> = raw.lines().collect();
        self.predict_batch(lines.as_slice()).await
    }

    /// Refresh history and analytics now and wait for both
    pub async fn refresh(&self) -> Result<(), CoordinatorError> {
        let phase = self.phase.load();
        if phase != Phase::Ready {
            self.store.set_error(Some(messages::not_connected(phase))).await;
            return Err(CoordinatorError::NotConnected { phase });
        }

        self.store.set_error(None).await;
        self.refresh_now().await;
        Ok(())
    }

    /// Clear history locally right away and ask the service to do the same
    pub async fn clear_history(&self) -> Result<(), CoordinatorError> {
        let phase = self.phase.load();
        if !matches!(phase, Phase::Ready | Phase::Disconnected) {
            debug!("Ignoring clear history while {:?}", phase);
            return Err(CoordinatorError::Busy(phase));
        }

        self.store
            .update(|s| {
                s.error = None;
                s.history.clear();
                s.analytics = None;
            })
            .await;

        let client = Arc::clone(&self.client);
        self.track(tokio::spawn(async move {
            match client.clear_history().await {
                Ok(()) => info!("Remote history cleared"),
                Err(e) => warn!("Failed to clear remote history: {}", e),
            }
        }));

        Ok(())
    }

    /// Input-changed hook: drop a validation error, leave anything else alone
    pub async fn clear_validation_error(&self) {
        self.store
            .update(|s| {
                if matches!(
                    s.error,
                    Some(ErrorState {
                        category: ErrorCategory::Validation,
                        ..
                    })
                ) {
                    s.error = None;
                }
            })
            .await;
    }

    /// Wait for every background task spawned so far, including tasks they spawn
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = self.lock_tasks().drain(..).collect();
            if pending.is_empty() {
                break;
            }

            for task in pending {
                if let Err(e) = task.await {
                    if !e.is_cancelled() {
                        error!("Background task panicked: {}", e);
                    }
                }
            }
        }
    }

    /// Abort outstanding background work and stop accepting predictions
    pub fn shutdown(&self) {
        info!("Shutting down coordinator {}", self.session_id);
        self.phase.store(Phase::Idle);

        for task in self.lock_tasks().drain(..) {
            task.abort();
        }
    }

    async fn run_probe(&self) -> ConnectionStatus {
        self.store
            .set_connection_status(ConnectionStatus::Checking)
            .await;

        let status = match self.client.probe().await {
            Ok(alive) => {
                info!(
                    "Connected to {} (HTTP {}{})",
                    self.client.base_url(),
                    alive.status,
                    alive
                        .message
                        .as_deref()
                        .map(|m| format!(", {}", m))
                        .unwrap_or_default()
                );
                ConnectionStatus::Connected
            }
            Err(e) => {
                warn!("Probe of {} failed: {}", self.client.base_url(), e);
                let failure = messages::probe_failure(&e, self.client.base_url());
                self.store.set_error(Some(failure)).await;
                ConnectionStatus::Disconnected
            }
        };

        self.store.set_connection_status(status).await;

        let next = match status {
            ConnectionStatus::Connected => Phase::Ready,
            _ => Phase::Disconnected,
        };
        if let Err(actual) = self.phase.transition(Phase::Probing, next) {
            debug!("Probe finished after coordinator moved to {:?}", actual);
            return status;
        }

        if next == Phase::Ready {
            self.spawn_refresh();
        }

        status
    }

    fn spawn_refresh(&self) {
        let this = self.clone();
        self.track(tokio::spawn(async move {
            this.refresh_now().await;
        }));
    }

    /// Fetch history and analytics; each overwrites its slice as it resolves
    async fn refresh_now(&self) {
        let history = async {
            match self.client.fetch_history(self.history_limit).await {
                Ok(entries) => {
                    debug!("History refreshed ({} entries)", entries.len());
                    self.store.set_history(entries).await;
                    None
                }
                Err(e) => {
                    warn!("History refresh failed: {}", e);
                    Some("history".to_string())
                }
            }
        };

        let analytics = async {
            match self.client.fetch_analytics().await {
                Ok(summary) => {
                    self.store.set_analytics(summary).await;
                    None
                }
                Err(e) => {
                    warn!("Analytics refresh failed: {}", e);
                    self.store.set_analytics(None).await;
                    Some("analytics".to_string())
                }
            }
        };

        let (history, analytics) = futures::join!(history, analytics);
        let failures: Vec<String> = [history, analytics].into_iter().flatten().collect();

        let warning = if failures.is_empty() {
            None
        } else {
            Some(messages::refresh_warning(&failures))
        };
        self.store.set_warning(warning).await;
    }

    async fn reject_invalid(&self, message: &'static str) -> CoordinatorError {
        debug!("Rejected input: {}", message);
        self.store.set_error(Some(messages::validation(message))).await;
        CoordinatorError::Validation(message)
    }

    /// Claim the Ready -> Submitting transition, or record why not
    async fn begin_submission(&self) -> Result<SubmissionGuard, CoordinatorError> {
        if let Err(phase) = self.phase.transition(Phase::Ready, Phase::Submitting) {
            warn!("Rejected prediction while {:?}", phase);
            self.store.set_error(Some(messages::not_connected(phase))).await;
            return Err(CoordinatorError::NotConnected { phase });
        }

        // Armed before the first await so a dropped future still restores Ready
        let guard = SubmissionGuard {
            phase: Arc::clone(&self.phase),
            store: self.store.clone(),
            finished: false,
        };

        self.store
            .update(|s| {
                s.error = None;
                s.loading = true;
            })
            .await;

        Ok(guard)
    }

    async fn fail_submission(&self, err: &TransportError, action: &str) {
        let failure = messages::request_failure(err, action);
        self.store
            .update(move |s| {
                s.error = Some(failure);
                s.loading = false;
            })
            .await;
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.lock_tasks();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the coordinator to Ready when a submission ends, even if the
/// predict future is dropped mid-flight
struct SubmissionGuard {
    phase: Arc<PhaseCell>,
    store: SessionStore,
    finished: bool,
}

impl SubmissionGuard {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        // Shutdown may have moved us to Idle; leave that alone
        let _ = self.phase.transition(Phase::Submitting, Phase::Ready);

        if !self.finished {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let store = self.store.clone();
                handle.spawn(async move {
                    store.set_loading(false).await;
                });
            }
        }
    }
}
