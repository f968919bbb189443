use super::events::{is_public_key_error, CallEvent};
use serde::Serialize;

/// Call lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallPhase {
    Idle,
    Connecting,
    Connected,
    Ended,
}

/// Authoritative call-session state owned by the controller.
///
/// Published as-is to the presentation layer on every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallState {
    pub phase: CallPhase,

    /// Session identifier assigned by the Call Service.
    /// Set exactly while phase is Connecting or Connected.
    pub call_id: Option<String>,

    /// Whether the assistant is currently speaking (Connected only)
    pub assistant_speaking: bool,

    /// Last normalized volume level received (Connected only)
    pub audio_level: f32,

    /// Transient "public key missing/invalid" banner flag
    pub key_missing: bool,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            phase: CallPhase::Idle,
            call_id: None,
            assistant_speaking: false,
            audio_level: 0.0,
            key_missing: false,
        }
    }
}

/// Side effect requested by a transition, executed by the controller driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the finished call's identifier to the record poller.
    /// Emitted at most once per call.
    HandOff(String),

    /// Clear the key-missing banner after the display window.
    ScheduleBannerClear,
}

/// Applies one Call Service event to the state.
///
/// Pure transition function: events outside the transition table leave the
/// phase untouched, so duplicate or out-of-order delivery is harmless.
pub fn apply(state: &CallState, event: &CallEvent) -> (CallState, Vec<Effect>) {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        CallEvent::CallStart => {
            if state.phase == CallPhase::Connecting {
                next.phase = CallPhase::Connected;
                next.key_missing = false;
            }
        }
        CallEvent::CallEnd => {
            if state.phase == CallPhase::Connected {
                next.phase = CallPhase::Ended;
                next.assistant_speaking = false;
                next.audio_level = 0.0;
                // Taking the identifier here is what makes the hand-off
                // single-shot: a second call-end finds nothing to take.
                if let Some(call_id) = next.call_id.take() {
                    effects.push(Effect::HandOff(call_id));
                }
            }
        }
        CallEvent::SpeechStart => {
            if state.phase == CallPhase::Connected {
                next.assistant_speaking = true;
            }
        }
        CallEvent::SpeechEnd => {
            if state.phase == CallPhase::Connected {
                next.assistant_speaking = false;
            }
        }
        CallEvent::VolumeLevel(level) => {
            if state.phase == CallPhase::Connected {
                next.audio_level = *level;
            }
        }
        CallEvent::Error(err) => {
            if state.phase == CallPhase::Connecting {
                next.phase = CallPhase::Idle;
                next.call_id = None;
            }
            if is_public_key_error(err) {
                next.key_missing = true;
                effects.push(Effect::ScheduleBannerClear);
            }
        }
    }

    (next, effects)
}
