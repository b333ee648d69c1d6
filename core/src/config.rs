use crate::{
    clock::{check_window_days, DEFAULT_WINDOW_DAYS},
    error::{ScenarioError, ScenarioResult},
    types::RegimeKind,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_CONTENT_AUDIT_THRESHOLD: u8 = 8;

/// Statistical parameters for one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub roas_mean:           f64,
    pub roas_std:            f64,
    pub oos_probability:     f64,
    /// Multiplicative uplift on the base conversion rate (0.15 = +15%).
    pub conversion_lift:     f64,
    /// Inclusive bounds for the integer content score.
    pub content_score_range: (u8, u8),
}

impl RegimeConfig {
    pub fn baseline() -> Self {
        Self {
            roas_mean:           1.8,
            roas_std:            0.8,
            oos_probability:     0.10,
            conversion_lift:     0.0,
            content_score_range: (4, 6),
        }
    }

    pub fn engine_active() -> Self {
        Self {
            roas_mean:           2.8,
            roas_std:            0.4,
            oos_probability:     0.005,
            conversion_lift:     0.15,
            content_score_range: (8, 10),
        }
    }

    /// Reject parameter sets the generator cannot honour.
    /// `regime` is only used to label the error.
    pub fn validate(&self, regime: &str) -> ScenarioResult<()> {
        let bad = |field: &'static str, reason: String| ScenarioError::InvalidRegimeParameter {
            regime: regime.to_string(),
            field,
            reason,
        };

        if !self.roas_mean.is_finite() {
            return Err(bad("roas_mean", format!("must be finite, got {}", self.roas_mean)));
        }
        if !self.roas_std.is_finite() || self.roas_std < 0.0 {
            return Err(bad("roas_std", format!("must be finite and >= 0, got {}", self.roas_std)));
        }
        if !(0.0..=1.0).contains(&self.oos_probability) {
            return Err(bad(
                "oos_probability",
                format!("must be within [0, 1], got {}", self.oos_probability),
            ));
        }
        if !self.conversion_lift.is_finite() || self.conversion_lift <= -1.0 {
            return Err(bad(
                "conversion_lift",
                format!("must be finite and > -1, got {}", self.conversion_lift),
            ));
        }
        let (lo, hi) = self.content_score_range;
        if lo > hi {
            return Err(bad("content_score_range", format!("lower bound {lo} exceeds upper bound {hi}")));
        }
        Ok(())
    }
}

/// Full scenario configuration. Built-in values via `Default`,
/// overrides from a JSON file via `load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed:                    u64,
    pub window_days:             u32,
    pub cache_ttl_secs:          u64,
    pub content_audit_threshold: u8,
    pub baseline:                RegimeConfig,
    pub engine_active:           RegimeConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed:                    DEFAULT_SEED,
            window_days:             DEFAULT_WINDOW_DAYS,
            cache_ttl_secs:          DEFAULT_CACHE_TTL_SECS,
            content_audit_threshold: DEFAULT_CONTENT_AUDIT_THRESHOLD,
            baseline:                RegimeConfig::baseline(),
            engine_active:           RegimeConfig::engine_active(),
        }
    }
}

impl ScenarioConfig {
    /// Load from a JSON file. Missing keys fall back to the built-in values.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        log::info!("loaded scenario config from {path} (seed={})", config.seed);
        Ok(config)
    }

    pub fn from_json(content: &str) -> ScenarioResult<Self> {
        let config: ScenarioConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScenarioResult<()> {
        self.baseline.validate(RegimeKind::Baseline.name())?;
        self.engine_active.validate(RegimeKind::EngineActive.name())?;
        check_window_days(self.window_days)
    }

    pub fn regime(&self, kind: RegimeKind) -> &RegimeConfig {
        match kind {
            RegimeKind::Baseline     => &self.baseline,
            RegimeKind::EngineActive => &self.engine_active,
        }
    }

    pub fn regime_mut(&mut self, kind: RegimeKind) -> &mut RegimeConfig {
        match kind {
            RegimeKind::Baseline     => &mut self.baseline,
            RegimeKind::EngineActive => &mut self.engine_active,
        }
    }
}
