use super::state::AppState;
use crate::store::InterviewRecord;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// POST /webhooks/call-report
/// End-of-call report from the Call Service backend. One insert per report.
pub async fn call_report(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let Some(message) = payload.get("message") else {
        return invalid_request();
    };
    if message.get("type").and_then(Value::as_str) != Some("end-of-call-report") {
        return invalid_request();
    }

    let record = match extract_record(message) {
        Ok(record) => record,
        Err(e) => {
            // Same externally visible failure as an insert error; the
            // distinguishing cause only goes to the log
            error!("Failed to extract end-of-call report fields: {:#}", e);
            return save_failed();
        }
    };

    info!("End-of-call report received for call {}", record.call_id);

    match state.store.insert(&record).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Data saved" }))).into_response(),
        Err(e) => {
            error!("Failed to save interview record: {:#}", e);
            save_failed()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn invalid_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid request" })),
    )
        .into_response()
}

fn save_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to save data" })),
    )
        .into_response()
}

/// Map the report payload onto one record row. Transcript and summary fall
/// back to empty strings; the structured scores are required.
fn extract_record(message: &Value) -> Result<InterviewRecord> {
    let call_id = match message.pointer("/call/id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            warn!("End-of-call report carries no call id");
            String::new()
        }
    };

    let summary = message
        .pointer("/analysis/summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let transcript = message
        .pointer("/artifact/transcript")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let scores = message
        .pointer("/analysis/structuredData")
        .context("Report has no structured analysis data")?;

    Ok(InterviewRecord {
        call_id,
        transcript,
        summary,
        clarity: score(scores, "clarity")?,
        relevance: score(scores, "relevance")?,
        persuasiveness: score(scores, "persuasiveness")?,
        created_at: None,
    })
}

fn score(scores: &Value, field: &str) -> Result<i32> {
    scores
        .get(field)
        .and_then(Value::as_i64)
        .with_context(|| format!("Structured analysis data has no {} score", field))
        .map(|n| n as i32)
}
