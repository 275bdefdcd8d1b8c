//! Spin state and its two transitions.
//!
//! Idle ──start_spin──▶ Spinning ──settle──▶ Settled
//!
//! Both transitions take the state by value and return the next one.
//! The outcome is drawn inside `start_spin`, before any animation runs;
//! `settle` only reveals what was already chosen.

use crate::{
    config::SpinConfig,
    error::WheelResult,
    outcome::OutcomeTable,
    planner::{plan_spin, SpinPlan},
    rng::WheelRng,
    types::Degrees,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    Idle,
    Spinning,
    Settled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpinState {
    pub cumulative_rotation_degrees: Degrees,
    pub is_spinning:                 bool,
    pub has_spun:                    bool,
    pub chosen_outcome_index:        Option<usize>,
}

impl SpinState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SpinPhase {
        if self.has_spun {
            SpinPhase::Settled
        } else if self.is_spinning {
            SpinPhase::Spinning
        } else {
            SpinPhase::Idle
        }
    }

    /// The spin control is enabled only before the single spin.
    pub fn can_spin(&self) -> bool {
        self.phase() == SpinPhase::Idle
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    AlreadySpinning,
    AlreadySpun,
    TornDown,
}

/// What a spin trigger did.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Started(SpinPlan),
    Ignored(IgnoreReason),
}

/// Handle the user's spin trigger.
///
/// From Idle: draw the outcome, plan the rotation, enter Spinning.
/// From any other phase: return the state untouched.
pub fn start_spin(
    state: SpinState,
    table: &OutcomeTable,
    spin: &SpinConfig,
    rng: &mut WheelRng,
) -> WheelResult<(SpinState, Trigger)> {
    match state.phase() {
        SpinPhase::Spinning => return Ok((state, Trigger::Ignored(IgnoreReason::AlreadySpinning))),
        SpinPhase::Settled  => return Ok((state, Trigger::Ignored(IgnoreReason::AlreadySpun))),
        SpinPhase::Idle     => {}
    }

    let chosen = table.choose(rng);
    let plan = plan_spin(
        state.cumulative_rotation_degrees,
        chosen,
        table.sector_count(),
        spin,
        rng,
    )?;

    let next = SpinState {
        cumulative_rotation_degrees: plan.target_rotation,
        is_spinning:                 true,
        has_spun:                    false,
        chosen_outcome_index:        Some(chosen),
    };
    Ok((next, Trigger::Started(plan)))
}

/// Finish the animation: Spinning becomes Settled and the outcome drawn
/// at spin start is returned. Any other phase is left as is.
pub fn settle(state: SpinState) -> (SpinState, Option<usize>) {
    if state.phase() != SpinPhase::Spinning {
        return (state, None);
    }
    let revealed = state.chosen_outcome_index;
    let next = SpinState {
        is_spinning: false,
        has_spun: true,
        ..state
    };
    (next, revealed)
}
