//! Campaign planner arithmetic: revenue forecast, spend pacing and
//! platform split. The planner's form flow lives in the presentation layer.

use crate::{
    error::{ScenarioError, ScenarioResult},
    rng::ScenarioRng,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const FORECAST_BASE_ROAS: f64 = 2.85;
pub const FORECAST_NOISE: f64 = 0.15;
/// Pacing curve spans exp(-x²) for x in [-PACING_SPAN, PACING_SPAN].
pub const PACING_SPAN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskTolerance {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Conservative => 0.9,
            Self::Balanced     => 1.0,
            Self::Aggressive   => 1.15,
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = ScenarioError;

    fn from_str(s: &str) -> ScenarioResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "balanced"     => Ok(Self::Balanced),
            "aggressive"   => Ok(Self::Aggressive),
            other => Err(ScenarioError::Other(anyhow::anyhow!("unknown risk tolerance '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub budget:            f64,
    pub projected_roas:    f64,
    pub projected_revenue: f64,
}

pub fn forecast(budget: f64, risk: RiskTolerance, rng: &mut ScenarioRng) -> Forecast {
    let noise = rng.uniform(-FORECAST_NOISE, FORECAST_NOISE);
    let projected_roas = (FORECAST_BASE_ROAS + noise) * risk.multiplier();
    Forecast {
        budget,
        projected_roas,
        projected_revenue: budget * projected_roas,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingDay {
    pub date:  NaiveDate,
    pub spend: f64,
}

/// Bell-shaped daily spend from `start` to `end` inclusive, summing to
/// `budget`. Empty unless `end` is after `start`.
pub fn spend_pacing(budget: f64, start: NaiveDate, end: NaiveDate) -> Vec<PacingDay> {
    if end <= start {
        return Vec::new();
    }
    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let n = days.len();
    let weights: Vec<f64> = (0..n)
        .map(|i| {
            let x = -PACING_SPAN + 2.0 * PACING_SPAN * i as f64 / (n - 1) as f64;
            (-x * x).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();

    days.into_iter()
        .zip(weights)
        .map(|(date, w)| PacingDay {
            date,
            spend: w / total * budget,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    pub platform: String,
    /// Percentage of budget, 0–100.
    pub share:    f64,
}

/// Random split of the budget across `platforms` (flat Dirichlet),
/// in the order given. Shares sum to 100.
pub fn platform_allocation(platforms: &[&str], rng: &mut ScenarioRng) -> Vec<PlatformShare> {
    let draws: Vec<f64> = platforms.iter().map(|_| rng.exponential()).collect();
    let total: f64 = draws.iter().sum();

    platforms
        .iter()
        .zip(draws)
        .map(|(platform, d)| PlatformShare {
            platform: platform.to_string(),
            share: if total > 0.0 {
                d / total * 100.0
            } else {
                100.0 / platforms.len() as f64
            },
        })
        .collect()
}
