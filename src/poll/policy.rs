use std::time::Duration;

/// Fixed-schedule retry policy for post-call record retrieval.
///
/// Worst-case latency before giving up is
/// `initial_delay + (max_attempts - 1) * interval`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of store queries before giving up
    pub max_attempts: u32,

    /// Delay between consecutive attempts
    pub interval: Duration,

    /// One-time delay before the first attempt, covering expected
    /// server-side processing latency
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_millis(2000),
            initial_delay: Duration::from_millis(3000),
        }
    }
}
