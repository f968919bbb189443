//! Record Store boundary
//!
//! One row per completed call, written once by the webhook receiver and
//! read by the record poller. The store itself is an external managed
//! database reached over its REST dialect.

mod http;
mod record;

pub use http::HttpRecordStore;
pub use record::InterviewRecord;

use anyhow::Result;

/// Durable store holding one analysis row per completed call.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Find at most one record keyed by call identifier.
    ///
    /// `Ok(None)` means the row has not been written yet — distinct from
    /// `Err`, which is a store-level failure.
    async fn find_by_call_id(&self, call_id: &str) -> Result<Option<InterviewRecord>>;

    /// Insert one record. Used only by the webhook receiver.
    async fn insert(&self, record: &InterviewRecord) -> Result<()>;
}
