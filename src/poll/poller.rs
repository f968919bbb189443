use super::policy::RetryPolicy;
use crate::store::{InterviewRecord, RecordStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Retrieval progress for one call's record, published to the presentation
/// layer so it can distinguish "still trying", "gave up" and "store failed".
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalState {
    Idle,
    Fetching { call_id: String, attempt: u32 },
    Found(InterviewRecord),
    NotFound { call_id: String, attempts: u32 },
    Failed { call_id: String, error: String },
}

/// Terminal outcome of one bounded-retry fetch loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Found(InterviewRecord),
    Exhausted { attempts: u32 },
    StoreError(String),
    Cancelled,
}

/// Runs at most one retrieval sequence at a time.
///
/// The active flag doubles as the controller's start gate: a new call
/// cannot start while a sequence is in flight.
pub struct RecordPoller {
    store: Arc<dyn RecordStore>,
    policy: RetryPolicy,

    /// Progress channel feeding the presentation layer
    state_tx: Arc<watch::Sender<RetrievalState>>,
    state_rx: watch::Receiver<RetrievalState>,

    /// Whether a sequence is currently in flight
    active: Arc<AtomicBool>,

    /// Cancellation signal for the in-flight sequence
    cancel_tx: Mutex<Option<watch::Sender<bool>>>,

    /// Handle for the retrieval task
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RecordPoller {
    pub fn new(store: Arc<dyn RecordStore>, policy: RetryPolicy) -> Self {
        let (state_tx, state_rx) = watch::channel(RetrievalState::Idle);

        Self {
            store,
            policy,
            state_tx: Arc::new(state_tx),
            state_rx,
            active: Arc::new(AtomicBool::new(false)),
            cancel_tx: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// Subscribe to retrieval progress.
    pub fn subscribe(&self) -> watch::Receiver<RetrievalState> {
        self.state_rx.clone()
    }

    /// Whether a retrieval sequence is currently in flight.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Start one retrieval sequence for the given call identifier.
    ///
    /// At most one sequence runs at a time; a second begin while one is in
    /// flight is ignored.
    pub async fn begin(&self, call_id: String) {
        if self.active.swap(true, Ordering::SeqCst) {
            warn!(
                "Record retrieval already in flight; ignoring call {}",
                call_id
            );
            return;
        }

        info!("Starting record retrieval for call {}", call_id);

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        *self.cancel_tx.lock().await = Some(cancel_tx);

        let store = Arc::clone(&self.store);
        let policy = self.policy.clone();
        let state_tx = Arc::clone(&self.state_tx);
        let active = Arc::clone(&self.active);

        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                outcome = fetch_with_retry(store.as_ref(), &policy, &call_id, &state_tx) => outcome,
                _ = cancel_rx.wait_for(|cancelled| *cancelled) => RetrievalOutcome::Cancelled,
            };

            let next = match outcome {
                RetrievalOutcome::Found(record) => {
                    info!("Record found for call {}", call_id);
                    RetrievalState::Found(record)
                }
                RetrievalOutcome::Exhausted { attempts } => {
                    warn!("No record for call {} after {} attempts", call_id, attempts);
                    RetrievalState::NotFound {
                        call_id: call_id.clone(),
                        attempts,
                    }
                }
                RetrievalOutcome::StoreError(err) => {
                    error!("Record store query failed for call {}: {}", call_id, err);
                    RetrievalState::Failed {
                        call_id: call_id.clone(),
                        error: err,
                    }
                }
                RetrievalOutcome::Cancelled => {
                    info!("Record retrieval cancelled for call {}", call_id);
                    RetrievalState::Idle
                }
            };

            let _ = state_tx.send(next);
            active.store(false, Ordering::SeqCst);
        });

        *self.task.lock().await = Some(handle);
    }

    /// Cancel the in-flight retrieval sequence, if any, and wait for it to
    /// wind down.
    pub async fn cancel(&self) {
        if let Some(cancel_tx) = self.cancel_tx.lock().await.take() {
            let _ = cancel_tx.send(true);
        }

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                error!("Retrieval task panicked: {}", e);
            }
        }
    }
}

/// Bounded fixed-interval retrieval loop.
///
/// Waits the initial delay, then queries up to `max_attempts` times with
/// `interval` between attempts. A store error stops the loop immediately;
/// only "not found" is retried. Per-attempt progress goes out on `progress`.
pub async fn fetch_with_retry(
    store: &dyn RecordStore,
    policy: &RetryPolicy,
    call_id: &str,
    progress: &watch::Sender<RetrievalState>,
) -> RetrievalOutcome {
    let _ = progress.send(RetrievalState::Fetching {
        call_id: call_id.to_string(),
        attempt: 0,
    });

    tokio::time::sleep(policy.initial_delay).await;

    for attempt in 1..=policy.max_attempts {
        let _ = progress.send(RetrievalState::Fetching {
            call_id: call_id.to_string(),
            attempt,
        });

        match store.find_by_call_id(call_id).await {
            Ok(Some(record)) => return RetrievalOutcome::Found(record),
            Ok(None) => {
                if attempt < policy.max_attempts {
                    info!(
                        "No record yet for call {} (attempt {}/{})",
                        call_id, attempt, policy.max_attempts
                    );
                    tokio::time::sleep(policy.interval).await;
                }
            }
            Err(err) => return RetrievalOutcome::StoreError(format!("{err:#}")),
        }
    }

    RetrievalOutcome::Exhausted {
        attempts: policy.max_attempts,
    }
}
