//! Session events: every observable transition of a spin session.
//!
//! The runner persists these to the event log; tests compare them to
//! check that seeded sessions replay identically.

use crate::{
    state::IgnoreReason,
    types::{Degrees, Millis, RunId, SessionId},
};
use serde::{Deserialize, Serialize};

/// Variants are only ever appended; stored payloads depend on the tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    SessionCreated {
        session_id:   SessionId,
        at_ms:        Millis,
        sector_count: usize,
    },
    SpinStarted {
        session_id:      SessionId,
        at_ms:           Millis,
        chosen_index:    usize,
        start_rotation:  Degrees,
        target_rotation: Degrees,
        full_turns:      u32,
        jitter_degrees:  Degrees,
    },
    SpinIgnored {
        session_id: SessionId,
        at_ms:      Millis,
        reason:     IgnoreReason,
    },
    SpinSettled {
        session_id:     SessionId,
        at_ms:          Millis,
        chosen_index:   usize,
        label:          String,
        final_rotation: Degrees,
    },
    ResultShown {
        session_id: SessionId,
        at_ms:      Millis,
        label:      String,
    },
    ResultDismissed {
        session_id: SessionId,
        at_ms:      Millis,
    },
    TimersCancelled {
        session_id: SessionId,
        at_ms:      Millis,
        count:      usize,
    },
}

impl WheelEvent {
    /// Stable name for the event_type column.
    pub fn kind(&self) -> &'static str {
        match self {
            WheelEvent::SessionCreated { .. }  => "session_created",
            WheelEvent::SpinStarted { .. }     => "spin_started",
            WheelEvent::SpinIgnored { .. }     => "spin_ignored",
            WheelEvent::SpinSettled { .. }     => "spin_settled",
            WheelEvent::ResultShown { .. }     => "result_shown",
            WheelEvent::ResultDismissed { .. } => "result_dismissed",
            WheelEvent::TimersCancelled { .. } => "timers_cancelled",
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            WheelEvent::SessionCreated { session_id, .. }
            | WheelEvent::SpinStarted { session_id, .. }
            | WheelEvent::SpinIgnored { session_id, .. }
            | WheelEvent::SpinSettled { session_id, .. }
            | WheelEvent::ResultShown { session_id, .. }
            | WheelEvent::ResultDismissed { session_id, .. }
            | WheelEvent::TimersCancelled { session_id, .. } => session_id,
        }
    }

    pub fn at_ms(&self) -> Millis {
        match self {
            WheelEvent::SessionCreated { at_ms, .. }
            | WheelEvent::SpinStarted { at_ms, .. }
            | WheelEvent::SpinIgnored { at_ms, .. }
            | WheelEvent::SpinSettled { at_ms, .. }
            | WheelEvent::ResultShown { at_ms, .. }
            | WheelEvent::ResultDismissed { at_ms, .. }
            | WheelEvent::TimersCancelled { at_ms, .. } => *at_ms,
        }
    }
}

/// A persisted event log row.
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub session_id: SessionId,
    pub at_ms:      Millis,
    pub event_type: String,
    pub payload:    String,
}

impl EventLogEntry {
    pub fn from_event(run_id: &str, event: &WheelEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id:         None,
            run_id:     run_id.to_string(),
            session_id: event.session_id().to_string(),
            at_ms:      event.at_ms(),
            event_type: event.kind().to_string(),
            payload:    serde_json::to_string(event)?,
        })
    }
}
