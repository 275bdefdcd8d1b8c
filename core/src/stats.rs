//! Tallies of drawn outcomes against their configured shares.

use crate::outcome::OutcomeTable;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct DrawTally {
    counts: Vec<u64>,
    total:  u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareRow {
    pub index:    usize,
    pub label:    String,
    pub weight:   u32,
    pub count:    u64,
    pub expected: f64,
    pub observed: f64,
}

impl DrawTally {
    pub fn new(sector_count: usize) -> Self {
        Self {
            counts: vec![0; sector_count],
            total:  0,
        }
    }

    pub fn record(&mut self, index: usize) {
        if index >= self.counts.len() {
            self.counts.resize(index + 1, 0);
        }
        self.counts[index] += 1;
        self.total += 1;
    }

    pub fn count(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn share(&self, index: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(index) as f64 / self.total as f64
    }

    /// One row per outcome: expected weight share next to observed share.
    pub fn compare(&self, table: &OutcomeTable) -> Vec<ShareRow> {
        table
            .outcomes()
            .iter()
            .enumerate()
            .map(|(index, outcome)| ShareRow {
                index,
                label:    outcome.label.clone(),
                weight:   outcome.weight,
                count:    self.count(index),
                expected: table.probability(index),
                observed: self.share(index),
            })
            .collect()
    }

    /// Largest |observed - expected| across all outcomes.
    pub fn max_abs_deviation(&self, table: &OutcomeTable) -> f64 {
        self.compare(table)
            .iter()
            .map(|row| (row.observed - row.expected).abs())
            .fold(0.0, f64::max)
    }
}
