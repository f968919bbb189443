use super::events::{is_public_key_error, CallEvent};
use super::service::CallService;
use super::state::{apply, CallPhase, CallState, Effect};
use crate::poll::RecordPoller;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long the key-missing banner stays visible.
pub const KEY_BANNER_WINDOW: Duration = Duration::from_millis(3000);

/// Owns the call-session state machine and the single subscription to the
/// Call Service event stream.
///
/// Transitions are published on a watch channel so the presentation layer
/// can subscribe once and re-render on every change. When a call ends, the
/// finished call's identifier is handed to the record poller exactly once.
pub struct CallController {
    /// Process-wide Call Service client
    service: Arc<dyn CallService>,

    /// Assistant configuration used for every session
    assistant_id: String,

    /// Poller receiving finished call identifiers
    poller: Arc<RecordPoller>,

    /// Authoritative session state
    state: Arc<Mutex<CallState>>,

    /// Snapshot channel feeding the presentation layer
    snapshot_tx: Arc<watch::Sender<CallState>>,
    snapshot_rx: watch::Receiver<CallState>,

    /// Generation counter guarding the banner-clear timer against raising
    /// and clearing the banner in quick succession
    banner_epoch: Arc<AtomicU64>,

    /// Handle for the event-driving task
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl CallController {
    pub fn new(
        service: Arc<dyn CallService>,
        assistant_id: impl Into<String>,
        poller: Arc<RecordPoller>,
    ) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(CallState::default());

        Self {
            service,
            assistant_id: assistant_id.into(),
            poller,
            state: Arc::new(Mutex::new(CallState::default())),
            snapshot_tx: Arc::new(snapshot_tx),
            snapshot_rx,
            banner_epoch: Arc::new(AtomicU64::new(0)),
            event_task: Mutex::new(None),
        }
    }

    /// Subscribe to state snapshots. Every transition publishes one.
    pub fn subscribe(&self) -> watch::Receiver<CallState> {
        self.snapshot_rx.clone()
    }

    /// Current state snapshot.
    pub async fn snapshot(&self) -> CallState {
        self.state.lock().await.clone()
    }

    /// Subscribe to the Call Service event stream and drive the state
    /// machine from it. Idempotent; the subscription is taken once.
    pub async fn run(&self) -> Result<()> {
        let mut task = self.event_task.lock().await;
        if task.is_some() {
            warn!("Controller already running");
            return Ok(());
        }

        let mut events = self
            .service
            .subscribe()
            .await
            .context("Failed to subscribe to call service events")?;

        let state = Arc::clone(&self.state);
        let snapshot_tx = Arc::clone(&self.snapshot_tx);
        let banner_epoch = Arc::clone(&self.banner_epoch);
        let poller = Arc::clone(&self.poller);

        *task = Some(tokio::spawn(async move {
            info!("Call service event loop started");

            while let Some(event) = events.recv().await {
                Self::apply_event(&state, &snapshot_tx, &banner_epoch, &poller, event).await;
            }

            info!("Call service event stream closed");
        }));

        Ok(())
    }

    /// Start a new call session. No-op unless the session is Idle and no
    /// record retrieval is in flight.
    pub async fn start(&self) -> Result<()> {
        {
            let mut st = self.state.lock().await;
            if st.phase != CallPhase::Idle {
                warn!("Start requested while call is {:?}; ignoring", st.phase);
                return Ok(());
            }
            if self.poller.is_active() {
                warn!("Start requested while record retrieval is in flight; ignoring");
                return Ok(());
            }
            st.phase = CallPhase::Connecting;
            let _ = self.snapshot_tx.send(st.clone());
        }

        match self.service.start(&self.assistant_id).await {
            Ok(handle) => {
                info!("Call session requested: {}", handle.id);
                let mut st = self.state.lock().await;
                st.call_id = Some(handle.id);
                let _ = self.snapshot_tx.send(st.clone());
                Ok(())
            }
            Err(err) => {
                error!("Call service rejected session start: {}", err);
                let key_error = is_public_key_error(&err);
                {
                    let mut st = self.state.lock().await;
                    st.phase = CallPhase::Idle;
                    st.call_id = None;
                    if key_error {
                        st.key_missing = true;
                    }
                    let _ = self.snapshot_tx.send(st.clone());
                }
                if key_error {
                    Self::schedule_banner_clear(
                        &self.state,
                        &self.snapshot_tx,
                        &self.banner_epoch,
                    );
                }
                Err(err).context("Failed to start call session")
            }
        }
    }

    /// Ask the Call Service to terminate the current session. No effect
    /// while Idle. The service confirms with a call-end event.
    pub async fn stop(&self) -> Result<()> {
        {
            let st = self.state.lock().await;
            if st.phase == CallPhase::Idle {
                return Ok(());
            }
        }

        self.service
            .stop()
            .await
            .context("Failed to stop call session")
    }

    /// Apply one Call Service event. The event loop calls this for every
    /// received event; tests may call it directly.
    pub async fn handle_event(&self, event: CallEvent) {
        Self::apply_event(
            &self.state,
            &self.snapshot_tx,
            &self.banner_epoch,
            &self.poller,
            event,
        )
        .await;
    }

    /// Tear down: drop the event subscription and terminate any live
    /// session.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(task) = self.event_task.lock().await.take() {
            task.abort();
        }

        let live = {
            let st = self.state.lock().await;
            matches!(st.phase, CallPhase::Connecting | CallPhase::Connected)
        };
        if live {
            self.service
                .stop()
                .await
                .context("Failed to stop call session during shutdown")?;
        }

        Ok(())
    }

    async fn apply_event(
        state: &Arc<Mutex<CallState>>,
        snapshot_tx: &Arc<watch::Sender<CallState>>,
        banner_epoch: &Arc<AtomicU64>,
        poller: &Arc<RecordPoller>,
        event: CallEvent,
    ) {
        let effects = {
            let mut st = state.lock().await;
            let (next, effects) = apply(&st, &event);
            if next == *st && effects.is_empty() {
                return;
            }

            if st.key_missing && !next.key_missing {
                // Invalidate any pending banner-clear timer
                banner_epoch.fetch_add(1, Ordering::SeqCst);
            }

            *st = next;
            let _ = snapshot_tx.send(st.clone());

            // Ended is observable for one snapshot, then the session resets
            // so a new call can start
            if st.phase == CallPhase::Ended {
                st.phase = CallPhase::Idle;
                let _ = snapshot_tx.send(st.clone());
            }

            effects
        };

        for effect in effects {
            match effect {
                Effect::HandOff(call_id) => {
                    info!("Call {} ended; retrieving analysis record", call_id);
                    poller.begin(call_id).await;
                }
                Effect::ScheduleBannerClear => {
                    Self::schedule_banner_clear(state, snapshot_tx, banner_epoch);
                }
            }
        }
    }

    /// Clear the key-missing banner after the display window, unless the
    /// banner was cleared or re-raised in the meantime.
    fn schedule_banner_clear(
        state: &Arc<Mutex<CallState>>,
        snapshot_tx: &Arc<watch::Sender<CallState>>,
        banner_epoch: &Arc<AtomicU64>,
    ) {
        let epoch = banner_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let state = Arc::clone(state);
        let snapshot_tx = Arc::clone(snapshot_tx);
        let banner_epoch = Arc::clone(banner_epoch);

        tokio::spawn(async move {
            tokio::time::sleep(KEY_BANNER_WINDOW).await;

            if banner_epoch.load(Ordering::SeqCst) != epoch {
                return;
            }

            let mut st = state.lock().await;
            if st.key_missing {
                st.key_missing = false;
                let _ = snapshot_tx.send(st.clone());
            }
        });
    }
}
