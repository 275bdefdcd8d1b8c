//! Wheel configuration: the outcome list and spin timing.
//!
//! Loaded once at startup and validated before any session is built.
//! A wheel that could award nothing, or whose explicitly configured
//! jitter could push the pointer out of the chosen sector, is rejected here.
//! Left unset, jitter shrinks to fit however many sectors the wheel has.

use crate::{
    error::{WheelError, WheelResult},
    outcome::Outcome,
    types::{Degrees, Millis, FULL_TURN},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SPIN_DURATION_MS: Millis = 4000;
pub const DEFAULT_REVEAL_DELAY_MS: Millis = 300;
pub const DEFAULT_MIN_FULL_TURNS: u32 = 5;
pub const DEFAULT_MAX_FULL_TURNS: u32 = 7;
pub const DEFAULT_MAX_JITTER_DEGREES: Degrees = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinConfig {
    /// Length of the spin animation. Settle fires when it elapses.
    #[serde(default = "default_duration")]
    pub duration_ms: Millis,
    /// Pause between settle and showing the result.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: Millis,
    #[serde(default = "default_min_turns")]
    pub min_full_turns: u32,
    #[serde(default = "default_max_turns")]
    pub max_full_turns: u32,
    /// Jitter is drawn uniformly from [-max, +max].
    /// None picks `DEFAULT_MAX_JITTER_DEGREES`, narrowed for crowded wheels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_jitter_degrees: Option<Degrees>,
}

fn default_duration() -> Millis { DEFAULT_SPIN_DURATION_MS }
fn default_reveal_delay() -> Millis { DEFAULT_REVEAL_DELAY_MS }
fn default_min_turns() -> u32 { DEFAULT_MIN_FULL_TURNS }
fn default_max_turns() -> u32 { DEFAULT_MAX_FULL_TURNS }

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            duration_ms:        DEFAULT_SPIN_DURATION_MS,
            reveal_delay_ms:    DEFAULT_REVEAL_DELAY_MS,
            min_full_turns:     DEFAULT_MIN_FULL_TURNS,
            max_full_turns:     DEFAULT_MAX_FULL_TURNS,
            max_jitter_degrees: None,
        }
    }
}

impl SpinConfig {
    /// Check timing and turn bounds against a wheel of `sector_count` sectors.
    pub fn validate(&self, sector_count: usize) -> WheelResult<()> {
        if self.duration_ms == 0 {
            return Err(WheelError::InvalidSpinConfig(
                "duration_ms must be positive".into(),
            ));
        }
        if self.min_full_turns == 0 {
            return Err(WheelError::InvalidSpinConfig(
                "min_full_turns must be at least 1".into(),
            ));
        }
        if self.min_full_turns > self.max_full_turns {
            return Err(WheelError::InvalidSpinConfig(format!(
                "min_full_turns {} exceeds max_full_turns {}",
                self.min_full_turns, self.max_full_turns
            )));
        }
        if sector_count == 0 {
            return Err(WheelError::NoOutcomes);
        }
        if let Some(max) = self.max_jitter_degrees {
            let half_sector = half_sector(sector_count);
            if !max.is_finite() || max < 0.0 || max >= half_sector {
                return Err(WheelError::InvalidSpinConfig(format!(
                    "max_jitter_degrees {max} must be in [0, {half_sector}) for {sector_count} sectors"
                )));
            }
        }
        Ok(())
    }

    /// Jitter bound actually used on a wheel of `sector_count` sectors.
    /// An unset bound never exceeds a quarter sector.
    pub fn effective_jitter(&self, sector_count: usize) -> Degrees {
        match self.max_jitter_degrees {
            Some(max) => max,
            None if sector_count == 0 => 0.0,
            None => DEFAULT_MAX_JITTER_DEGREES.min(half_sector(sector_count) / 2.0),
        }
    }
}

fn half_sector(sector_count: usize) -> Degrees {
    FULL_TURN / sector_count as f64 / 2.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelConfig {
    pub outcomes: Vec<Outcome>,
    #[serde(default)]
    pub spin: SpinConfig,
}

impl WheelConfig {
    /// Read and validate a JSON wheel config from `path`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: WheelConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid wheel config {path}: {e}"))?;
        log::debug!(
            "Loaded wheel config {path}: {} outcomes, {} ms spin",
            config.outcomes.len(),
            config.spin.duration_ms
        );
        Ok(config)
    }

    pub fn validate(&self) -> WheelResult<()> {
        if self.outcomes.is_empty() {
            return Err(WheelError::NoOutcomes);
        }
        if self.outcomes.iter().all(|o| o.weight == 0) {
            return Err(WheelError::ZeroTotalWeight);
        }
        self.spin.validate(self.outcomes.len())
    }

    /// The promotional wheel shipped by default.
    /// The last prize is a decoy: shown on the wheel, never drawn.
    pub fn default_promo() -> Self {
        Self {
            outcomes: vec![
                Outcome::new("5 Rupees Off", 25),
                Outcome::new("10 Rupees Off", 25),
                Outcome::new("15 Rupees Off", 20),
                Outcome::new("2 Games @49", 15),
                Outcome::new("1 + 1 Off", 15),
                Outcome::new("90% DISCOUNT", 0),
            ],
            spin: SpinConfig::default(),
        }
    }

    /// Config with hardcoded values for use in tests.
    pub fn default_test() -> Self {
        Self {
            outcomes: vec![
                Outcome::new("A", 25),
                Outcome::new("B", 25),
                Outcome::new("C", 20),
                Outcome::new("D", 15),
                Outcome::new("E", 15),
                Outcome::new("F", 0),
            ],
            spin: SpinConfig::default(),
        }
    }
}
