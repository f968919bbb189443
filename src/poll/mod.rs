//! Record Retrieval Poller
//!
//! The analysis record is written by an out-of-band webhook receiver with
//! no completion signal available to the client, so after a call ends the
//! only way to observe the record is to poll the store on a fixed schedule.

mod policy;
mod poller;

pub use policy::RetryPolicy;
pub use poller::{fetch_with_retry, RecordPoller, RetrievalOutcome, RetrievalState};
