//! Call Session Controller
//!
//! This module owns the finite-state view of an in-progress call:
//! - `service` — the trait boundary to the external Call Service
//! - `events` — lifecycle events and the error payload the service emits
//! - `state` — the phase machine as a pure transition function
//! - `controller` — the long-lived driver holding the single event
//!   subscription and publishing snapshots to the presentation layer

mod controller;
mod events;
mod service;
mod state;

pub use controller::{CallController, KEY_BANNER_WINDOW};
pub use events::{is_public_key_error, CallEvent, ServiceError};
pub use service::{CallService, SessionHandle};
pub use state::{apply, CallPhase, CallState, Effect};
