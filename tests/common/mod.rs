#![allow(dead_code)]

use async_trait::async_trait;
use interview_coach::{
    CallEvent, CallService, InterviewRecord, RecordStore, ServiceError, SessionHandle,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Call Service stub: scripted start results, events injected via channel.
pub struct StubCallService {
    start_results: Mutex<VecDeque<Result<SessionHandle, ServiceError>>>,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    events: Mutex<Option<mpsc::Receiver<CallEvent>>>,
}

impl StubCallService {
    pub fn new(
        start_results: Vec<Result<SessionHandle, ServiceError>>,
    ) -> (Self, mpsc::Sender<CallEvent>) {
        let (events_tx, events_rx) = mpsc::channel(16);
        let stub = Self {
            start_results: Mutex::new(start_results.into()),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            events: Mutex::new(Some(events_rx)),
        };
        (stub, events_tx)
    }

    pub fn accepts(id: &str) -> Result<SessionHandle, ServiceError> {
        Ok(SessionHandle { id: id.to_string() })
    }

    pub fn rejects(status: Option<u16>, message: &str) -> Result<SessionHandle, ServiceError> {
        Err(ServiceError {
            status,
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl CallService for StubCallService {
    async fn start(&self, _assistant_id: &str) -> Result<SessionHandle, ServiceError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.start_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ServiceError {
                    status: Some(500),
                    message: "no scripted start result".to_string(),
                })
            })
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<CallEvent>, ServiceError> {
        self.events.lock().unwrap().take().ok_or(ServiceError {
            status: None,
            message: "event stream already subscribed".to_string(),
        })
    }
}

/// Scripted response for one record store query.
pub enum ScriptedResponse {
    Found(InterviewRecord),
    NotFound,
    Fail(String),
}

/// Record store stub that replays scripted query results and records when
/// each query arrived. Once the script runs out, queries return "not found".
pub struct ScriptedStore {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    pub queries: Mutex<Vec<(Instant, String)>>,
    pub inserted: Mutex<Vec<InterviewRecord>>,
}

impl ScriptedStore {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
            inserted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn find_by_call_id(&self, call_id: &str) -> anyhow::Result<Option<InterviewRecord>> {
        self.queries
            .lock()
            .unwrap()
            .push((Instant::now(), call_id.to_string()));

        match self.responses.lock().unwrap().pop_front() {
            Some(ScriptedResponse::Found(record)) => Ok(Some(record)),
            Some(ScriptedResponse::NotFound) | None => Ok(None),
            Some(ScriptedResponse::Fail(message)) => Err(anyhow::anyhow!(message)),
        }
    }

    async fn insert(&self, record: &InterviewRecord) -> anyhow::Result<()> {
        self.inserted.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub fn sample_record(call_id: &str) -> InterviewRecord {
    InterviewRecord {
        call_id: call_id.to_string(),
        transcript: "hi".to_string(),
        summary: "summary: ok".to_string(),
        clarity: 4,
        relevance: 5,
        persuasiveness: 3,
        created_at: None,
    }
}
