//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call a platform RNG.
//! All randomness flows through ScenarioRng instances derived
//! from the single master seed held by the engine.
//!
//! Each regime gets its own RNG stream, seeded from
//! (master_seed, regime slot, generation epoch). This means:
//!   - The baseline and engine-active tables never share mutable state.
//!   - Each regime's table is fully reproducible in isolation.
//!   - A regeneration after cache expiry draws from a fresh stream.

use crate::types::RegimeKind;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, Exp1, Normal};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for one generation run.
pub struct ScenarioRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl ScenarioRng {
    /// Seed directly. Tests and one-off callers use this.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform float in [low, high).
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform integer in [low, high). Returns `low` when the range is empty.
    pub fn int_below(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        low + self.next_u64_below(high - low)
    }

    /// Uniform integer in [low, high], both ends inclusive.
    pub fn int_inclusive(&mut self, low: u8, high: u8) -> u8 {
        self.int_below(low as u64, high as u64 + 1) as u8
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sample from N(mean, std). A negative or NaN `std` returns `mean`;
    /// regime validation rejects those before generation.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        match Normal::new(mean, std) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mean,
        }
    }

    /// Sample from Exp(1). Normalised draws give a flat Dirichlet.
    pub fn exponential(&mut self) -> f64 {
        Exp1.sample(&mut self.inner)
    }
}

/// Derives the per-regime streams for one engine.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Stream for the first generation of a regime.
    pub fn for_regime(&self, kind: RegimeKind) -> ScenarioRng {
        self.for_regime_at_epoch(kind, 0)
    }

    /// Stream for the `epoch`-th generation of a regime.
    pub fn for_regime_at_epoch(&self, kind: RegimeKind, epoch: u64) -> ScenarioRng {
        let slot = RegimeSlot::from(kind);
        let derived_seed = self.master_seed
            ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ epoch.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        ScenarioRng::from_seed(derived_seed).with_name(slot.name())
    }

    /// Stream for the planner's forecast and allocation draws.
    pub fn for_planner(&self) -> ScenarioRng {
        let slot = RegimeSlot::Planner;
        ScenarioRng::from_seed(self.master_seed ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15))
            .with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every regime's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RegimeSlot {
    Baseline = 1,
    EngineActive = 2,
    Planner = 3,
}

impl RegimeSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Baseline     => "baseline",
            Self::EngineActive => "engine_active",
            Self::Planner      => "planner",
        }
    }
}

impl From<RegimeKind> for RegimeSlot {
    fn from(kind: RegimeKind) -> Self {
        match kind {
            RegimeKind::Baseline     => Self::Baseline,
            RegimeKind::EngineActive => Self::EngineActive,
        }
    }
}
