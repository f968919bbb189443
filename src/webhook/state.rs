use crate::store::RecordStore;
use std::sync::Arc;

/// Shared application state for webhook handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store receiving end-of-call rows
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}
