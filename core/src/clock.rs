//! Session clock: owns the current time and the pending timers.
//!
//! Stands in for the host's timer callbacks. The host advances the clock
//! from its own event loop; timers fire in deadline order and never
//! before their deadline. Teardown cancels everything still pending.

use crate::types::Millis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Spin animation finished.
    Settle,
    /// Show the result display.
    Reveal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timer {
    pub id:       u64,
    pub kind:     TimerKind,
    pub fires_at: Millis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionClock {
    pub now_ms:    Millis,
    pub torn_down: bool,
    pending:       Vec<Timer>,
    next_id:       u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `delay_ms` from now.
    /// Returns None once the clock has been torn down.
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: Millis) -> Option<u64> {
        if self.torn_down {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            kind,
            fires_at: self.now_ms.saturating_add(delay_ms),
        });
        Some(id)
    }

    pub fn cancel(&mut self, id: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Cancel everything and refuse new timers.
    pub fn teardown(&mut self) -> usize {
        self.torn_down = true;
        self.cancel_all()
    }

    pub fn pending(&self) -> &[Timer] {
        &self.pending
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Millis) -> Option<Timer> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fires_at <= until)
            .min_by_key(|(_, t)| (t.fires_at, t.id))?;
        let timer = self.pending.remove(pos);
        self.now_ms = self.now_ms.max(timer.fires_at);
        Some(timer)
    }

    /// Move the clock forward to `until` (never backwards).
    pub fn settle_at(&mut self, until: Millis) {
        self.now_ms = self.now_ms.max(until);
    }
}
