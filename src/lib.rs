pub mod call;
pub mod config;
pub mod poll;
pub mod store;
pub mod webhook;

pub use call::{
    CallController, CallEvent, CallPhase, CallService, CallState, ServiceError, SessionHandle,
};
pub use config::Config;
pub use poll::{fetch_with_retry, RecordPoller, RetrievalOutcome, RetrievalState, RetryPolicy};
pub use store::{HttpRecordStore, InterviewRecord, RecordStore};
pub use webhook::{create_router, AppState};
