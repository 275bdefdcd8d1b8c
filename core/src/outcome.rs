//! Outcomes and the weighted selector.
//!
//! The ordered outcome list defines the wheel: outcome `i` owns sector `i`.
//! Selection walks the positive-weight outcomes in order with a running
//! sum, so a zero-weight outcome keeps its sector but can never be drawn.

use crate::{
    error::{WheelError, WheelResult},
    rng::WheelRng,
};
use serde::{Deserialize, Serialize};

/// A prize on the wheel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub label:  String,
    pub weight: u32,
}

impl Outcome {
    pub fn new(label: impl Into<String>, weight: u32) -> Self {
        Self { label: label.into(), weight }
    }

    pub fn is_drawable(&self) -> bool {
        self.weight > 0
    }
}

/// Sum of positive weights. Zero means nothing can be drawn.
pub fn total_weight(outcomes: &[Outcome]) -> u64 {
    outcomes
        .iter()
        .filter(|o| o.is_drawable())
        .map(|o| o.weight as u64)
        .sum()
}

/// Draw one outcome index with probability weight / total_weight.
///
/// Fails on an empty list or one with no positive weight; callers are
/// expected to have validated the list at configuration time.
pub fn choose_outcome(outcomes: &[Outcome], rng: &mut WheelRng) -> WheelResult<usize> {
    if outcomes.is_empty() {
        return Err(WheelError::NoOutcomes);
    }
    let total = total_weight(outcomes);
    if total == 0 {
        return Err(WheelError::ZeroTotalWeight);
    }
    let roll = rng.next_u64_below(total);
    Ok(index_for_roll(outcomes, roll))
}

/// Map a roll in [0, total_weight) to the outcome whose cumulative
/// weight first exceeds it.
fn index_for_roll(outcomes: &[Outcome], roll: u64) -> usize {
    let mut cumulative = 0u64;
    for (i, outcome) in outcomes.iter().enumerate().filter(|(_, o)| o.is_drawable()) {
        cumulative += outcome.weight as u64;
        if cumulative > roll {
            return i;
        }
    }
    // roll < total guarantees a hit above; the last drawable outcome is
    // the only sane answer if that is ever violated.
    outcomes.iter().rposition(Outcome::is_drawable).unwrap_or(0)
}

/// A validated, immutable outcome list.
#[derive(Debug, Clone)]
pub struct OutcomeTable {
    outcomes:     Vec<Outcome>,
    total_weight: u64,
}

impl OutcomeTable {
    pub fn new(outcomes: Vec<Outcome>) -> WheelResult<Self> {
        if outcomes.is_empty() {
            return Err(WheelError::NoOutcomes);
        }
        let total_weight = total_weight(&outcomes);
        if total_weight == 0 {
            return Err(WheelError::ZeroTotalWeight);
        }
        Ok(Self { outcomes, total_weight })
    }

    pub fn choose(&self, rng: &mut WheelRng) -> usize {
        let roll = rng.next_u64_below(self.total_weight);
        index_for_roll(&self.outcomes, roll)
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn get(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    pub fn sector_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Expected selection share of outcome `index`; 0.0 when out of range.
    pub fn probability(&self, index: usize) -> f64 {
        self.outcomes
            .get(index)
            .map(|o| o.weight as f64 / self.total_weight as f64)
            .unwrap_or(0.0)
    }
}
