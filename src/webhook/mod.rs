//! Webhook receiver for end-of-call reports
//!
//! The Call Service backend posts one report per finished call:
//! - POST /webhooks/call-report - convert the report into one store row
//! - GET /health - health check
//!
//! The handler never lets an error escape; every request gets a structured
//! HTTP response.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
