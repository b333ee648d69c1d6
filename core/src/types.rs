//! Shared primitive types used across the scenario core.

use crate::error::{ScenarioError, ScenarioResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of one generated fact table.
pub type TableId = uuid::Uuid;

/// Which statistical regime a fact table was generated under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RegimeKind {
    /// Manual operations.
    Baseline,
    /// Automated engine switched on.
    EngineActive,
}

impl RegimeKind {
    pub const ALL: [RegimeKind; 2] = [RegimeKind::Baseline, RegimeKind::EngineActive];

    /// The presentation layer's toggle: `true` selects the engine-active regime.
    pub fn from_flag(engine_active: bool) -> Self {
        if engine_active {
            Self::EngineActive
        } else {
            Self::Baseline
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Baseline     => "baseline",
            Self::EngineActive => "engine_active",
        }
    }
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegimeKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> ScenarioResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "active" | "engine_active" => Ok(Self::EngineActive),
            _ => Err(ScenarioError::InvalidRegime { name: s.to_string() }),
        }
    }
}

/// Named segment of the day. Declaration order is the canonical order
/// used by every rollup and pivot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Daypart {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl Daypart {
    pub const ALL: [Daypart; 4] = [
        Daypart::Breakfast,
        Daypart::Lunch,
        Daypart::Snacks,
        Daypart::Dinner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch     => "Lunch",
            Self::Snacks    => "Snacks",
            Self::Dinner    => "Dinner",
        }
    }
}

impl fmt::Display for Daypart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
