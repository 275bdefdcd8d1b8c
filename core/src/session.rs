//! The spin session: one wheel, one spin, one reveal.
//!
//! TIMELINE (all times relative to the spin trigger):
//!   0 ms                  outcome drawn, rotation planned, Spinning
//!   duration_ms           settle timer fires, Settled, outcome revealed
//!   + reveal_delay_ms     result display shown
//!   any time after        dismiss hides the display
//!
//! RULES:
//!   - The outcome is fixed at the trigger; the animation cannot change it.
//!   - Only one spin per session. Later triggers are ignored and logged.
//!   - Teardown cancels pending timers; nothing fires afterwards.
//!   - Every transition is recorded as a WheelEvent.

use crate::{
    clock::{SessionClock, Timer, TimerKind},
    config::{SpinConfig, WheelConfig},
    easing::SPIN_EASING,
    error::WheelResult,
    event::WheelEvent,
    outcome::{Outcome, OutcomeTable},
    planner::SpinPlan,
    rng::WheelRng,
    state::{self, IgnoreReason, SpinPhase, SpinState, Trigger},
    types::{Degrees, Millis, SessionId},
};
use serde::Serialize;

pub struct WheelSession {
    pub session_id:  SessionId,
    table:           OutcomeTable,
    spin:            SpinConfig,
    state:           SpinState,
    clock:           SessionClock,
    rng:             WheelRng,
    plan:            Option<SpinPlan>,
    spin_started_at: Option<Millis>,
    torn_down_at:    Option<Millis>,
    revealed:        Option<usize>,
    result_visible:  bool,
    events:          Vec<WheelEvent>,
}

/// Serializable view of a session for hosts and tooling.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id:         SessionId,
    pub now_ms:             Millis,
    pub phase:              SpinPhase,
    pub can_spin:           bool,
    pub state:              SpinState,
    pub displayed_rotation: Degrees,
    pub result_label:       Option<String>,
    pub result_visible:     bool,
    pub pending_timers:     Vec<Timer>,
}

impl WheelSession {
    /// Validate `config` and build an Idle session.
    pub fn new(session_id: SessionId, config: &WheelConfig, rng: WheelRng) -> WheelResult<Self> {
        config.validate()?;
        let table = OutcomeTable::new(config.outcomes.clone())?;
        let mut session = Self {
            session_id,
            spin: config.spin.clone(),
            table,
            state: SpinState::new(),
            clock: SessionClock::new(),
            rng,
            plan: None,
            spin_started_at: None,
            torn_down_at: None,
            revealed: None,
            result_visible: false,
            events: Vec::new(),
        };
        session.record(WheelEvent::SessionCreated {
            session_id:   session.session_id.clone(),
            at_ms:        0,
            sector_count: session.table.sector_count(),
        });
        log::debug!(
            "session {} created: {} sectors, rng={}",
            session.session_id,
            session.table.sector_count(),
            session.rng.name
        );
        Ok(session)
    }

    // ── Control surface ───────────────────────────────────────

    /// The spin trigger. Idempotent once a spin has started.
    pub fn spin(&mut self) -> WheelResult<Trigger> {
        if self.clock.torn_down {
            return Ok(self.ignore(IgnoreReason::TornDown));
        }

        let (next, trigger) = state::start_spin(
            self.state.clone(),
            &self.table,
            &self.spin,
            &mut self.rng,
        )?;
        self.state = next;

        match &trigger {
            Trigger::Started(plan) => {
                self.plan = Some(*plan);
                self.spin_started_at = Some(self.clock.now_ms);
                self.clock.schedule(TimerKind::Settle, self.spin.duration_ms);
                log::debug!(
                    "session {} spin: index={} {:.1}° -> {:.1}° ({} turns, jitter {:+.2}°)",
                    self.session_id,
                    plan.chosen_index,
                    plan.start_rotation,
                    plan.target_rotation,
                    plan.full_turns,
                    plan.jitter_degrees
                );
                self.record(WheelEvent::SpinStarted {
                    session_id:      self.session_id.clone(),
                    at_ms:           self.clock.now_ms,
                    chosen_index:    plan.chosen_index,
                    start_rotation:  plan.start_rotation,
                    target_rotation: plan.target_rotation,
                    full_turns:      plan.full_turns,
                    jitter_degrees:  plan.jitter_degrees,
                });
            }
            Trigger::Ignored(reason) => {
                self.record_ignored(*reason);
            }
        }
        Ok(trigger)
    }

    /// Hide the result display. Returns false when nothing was shown.
    pub fn dismiss(&mut self) -> bool {
        if !self.result_visible {
            return false;
        }
        self.result_visible = false;
        self.record(WheelEvent::ResultDismissed {
            session_id: self.session_id.clone(),
            at_ms:      self.clock.now_ms,
        });
        true
    }

    /// Cancel all pending timers and refuse further spins.
    /// Repeat calls are no-ops and return 0.
    pub fn teardown(&mut self) -> usize {
        if self.clock.torn_down {
            return 0;
        }
        self.torn_down_at = Some(self.clock.now_ms);
        let count = self.clock.teardown();
        if count > 0 {
            log::debug!("session {} teardown cancelled {count} timer(s)", self.session_id);
        }
        self.record(WheelEvent::TimersCancelled {
            session_id: self.session_id.clone(),
            at_ms:      self.clock.now_ms,
            count,
        });
        count
    }

    /// Advance the session clock by `delta_ms`, firing every timer that
    /// falls due. Returns the events emitted during this advance.
    pub fn advance(&mut self, delta_ms: Millis) -> Vec<WheelEvent> {
        let first_new = self.events.len();
        let until = self.clock.now_ms.saturating_add(delta_ms);

        while let Some(timer) = self.clock.pop_due(until) {
            match timer.kind {
                TimerKind::Settle => self.on_settle(),
                TimerKind::Reveal => self.on_reveal(),
            }
        }
        self.clock.settle_at(until);

        self.events[first_new..].to_vec()
    }

    // ── Timer handlers ────────────────────────────────────────

    fn on_settle(&mut self) {
        let (next, revealed) = state::settle(self.state.clone());
        self.state = next;
        let Some(index) = revealed else {
            return;
        };
        self.revealed = Some(index);
        let label = self.label_of(index);
        log::info!(
            "session {} settled on '{label}' (sector {index}) at {:.1}°",
            self.session_id,
            self.state.cumulative_rotation_degrees
        );
        self.record(WheelEvent::SpinSettled {
            session_id:     self.session_id.clone(),
            at_ms:          self.clock.now_ms,
            chosen_index:   index,
            label,
            final_rotation: self.state.cumulative_rotation_degrees,
        });
        self.clock.schedule(TimerKind::Reveal, self.spin.reveal_delay_ms);
    }

    fn on_reveal(&mut self) {
        let Some(index) = self.revealed else {
            return;
        };
        self.result_visible = true;
        let label = self.label_of(index);
        self.record(WheelEvent::ResultShown {
            session_id: self.session_id.clone(),
            at_ms:      self.clock.now_ms,
            label,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn phase(&self) -> SpinPhase {
        self.state.phase()
    }

    pub fn can_spin(&self) -> bool {
        !self.clock.torn_down && self.state.can_spin()
    }

    pub fn now_ms(&self) -> Millis {
        self.clock.now_ms
    }

    pub fn table(&self) -> &OutcomeTable {
        &self.table
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        self.plan.as_ref()
    }

    /// The won outcome, available only once the wheel has settled.
    pub fn result(&self) -> Option<&Outcome> {
        self.revealed.and_then(|i| self.table.get(i))
    }

    pub fn is_result_visible(&self) -> bool {
        self.result_visible
    }

    /// Rotation to display right now, following the easing curve while
    /// the wheel is spinning. Frozen where it was if torn down mid-spin.
    pub fn rotation_at_now(&self) -> Degrees {
        match (self.phase(), self.plan, self.spin_started_at) {
            (SpinPhase::Spinning, Some(plan), Some(started)) => {
                let now = self.torn_down_at.unwrap_or(self.clock.now_ms);
                let elapsed = now.saturating_sub(started);
                let progress = elapsed as f64 / self.spin.duration_ms as f64;
                SPIN_EASING.interpolate(plan.start_rotation, plan.target_rotation, progress)
            }
            _ => self.state.cumulative_rotation_degrees,
        }
    }

    pub fn events(&self) -> &[WheelEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<WheelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id:         self.session_id.clone(),
            now_ms:             self.clock.now_ms,
            phase:              self.phase(),
            can_spin:           self.can_spin(),
            state:              self.state.clone(),
            displayed_rotation: self.rotation_at_now(),
            result_label:       self.result().map(|o| o.label.clone()),
            result_visible:     self.result_visible,
            pending_timers:     self.clock.pending().to_vec(),
        }
    }

    // ── Internals ─────────────────────────────────────────────

    fn ignore(&mut self, reason: IgnoreReason) -> Trigger {
        self.record_ignored(reason);
        Trigger::Ignored(reason)
    }

    fn record_ignored(&mut self, reason: IgnoreReason) {
        log::debug!("session {} spin ignored: {reason:?}", self.session_id);
        self.record(WheelEvent::SpinIgnored {
            session_id: self.session_id.clone(),
            at_ms:      self.clock.now_ms,
            reason,
        });
    }

    fn label_of(&self, index: usize) -> String {
        self.table
            .get(index)
            .map(|o| o.label.clone())
            .unwrap_or_default()
    }

    fn record(&mut self, event: WheelEvent) {
        self.events.push(event);
    }
}
