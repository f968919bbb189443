use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One analysis row, written once by the webhook receiver after the Call
/// Service finishes processing a call server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    /// Session identifier the row is keyed by
    pub call_id: String,

    /// Full conversation transcript
    pub transcript: String,

    /// Free-text synopsis as produced by the analysis
    pub summary: String,

    // Scores are 0-5 by convention, not enforced
    pub clarity: i32,
    pub relevance: i32,
    pub persuasiveness: i32,

    /// Assigned by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl InterviewRecord {
    /// Display form of the summary. The analysis prompt prefixes summaries
    /// with "summary: ", which is noise in the UI; the stored value keeps it.
    pub fn summary_text(&self) -> &str {
        self.summary
            .strip_prefix("summary: ")
            .unwrap_or(&self.summary)
    }
}
