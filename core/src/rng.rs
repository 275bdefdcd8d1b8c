//! Random number sources for the wheel.
//!
//! RULE: Nothing in the core may call a global RNG.
//! Every draw goes through a WheelRng handed in by the caller.
//!
//! Two kinds of stream:
//!   - Seeded: a PCG stream, fully reproducible from a u64 seed.
//!     Used by tests and batch simulation.
//!   - Entropy: the operating system's cryptographic generator.
//!     Falls back to a time-seeded PCG stream when the OS source is
//!     unavailable. Only unpredictability differs, never the distribution.

use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

enum Source {
    Seeded(Pcg64Mcg),
    Os,
    /// Time-seeded PCG used when the OS source fails. Not replayable.
    Fallback(Pcg64Mcg),
}

/// A named random stream for one wheel session.
pub struct WheelRng {
    pub name: &'static str,
    source: Source,
}

impl WheelRng {
    /// A reproducible stream from a single seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            name: "seeded",
            source: Source::Seeded(Pcg64Mcg::seed_from_u64(seed)),
        }
    }

    /// A reproducible stream for session `session_index` of a run.
    /// Each session gets its own stream so sessions stay independent
    /// of how many draws earlier sessions made.
    pub fn for_session(master_seed: u64, session_index: u64) -> Self {
        let derived_seed = master_seed ^ session_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self::seeded(derived_seed).with_name("session")
    }

    /// OS randomness when available, otherwise a time-seeded PCG stream.
    pub fn from_entropy() -> Self {
        let mut probe = [0u8; 8];
        match OsRng.try_fill_bytes(&mut probe) {
            Ok(()) => Self {
                name: "os",
                source: Source::Os,
            },
            Err(e) => {
                log::warn!("OS randomness unavailable ({e}), falling back to seeded PCG");
                Self::fallback()
            }
        }
    }

    fn fallback() -> Self {
        Self {
            name: "fallback",
            source: Source::Fallback(Pcg64Mcg::seed_from_u64(fallback_seed())),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// True when the stream can be replayed from its seed.
    pub fn is_reproducible(&self) -> bool {
        matches!(self.source, Source::Seeded(_))
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        match &mut self.source {
            Source::Seeded(inner) | Source::Fallback(inner) => inner.next_u64(),
            Source::Os => OsRng.next_u64(),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n), without modulo bias.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.gen_range(0..n)
    }

    /// Roll a u32 in [lo, hi].
    pub fn between_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        self.gen_range(lo..=hi)
    }

    /// Roll a float uniformly in [-max, max]. Zero when max is zero.
    pub fn symmetric(&mut self, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        (self.next_f64() * 2.0 - 1.0) * max
    }
}

impl RngCore for WheelRng {
    fn next_u32(&mut self) -> u32 {
        (WheelRng::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        WheelRng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match &mut self.source {
            Source::Seeded(inner) | Source::Fallback(inner) => inner.fill_bytes(dest),
            Source::Os => OsRng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match &mut self.source {
            Source::Seeded(inner) | Source::Fallback(inner) => inner.try_fill_bytes(dest),
            Source::Os => OsRng.try_fill_bytes(dest),
        }
    }
}

fn fallback_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed_5eed_5eed_5eed)
}
