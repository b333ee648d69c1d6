//! Scenario data generator.
//!
//! Produces the full Cartesian product
//!   date × (brand, sku) × platform × city × daypart
//! with one record per combination, all values drawn from the
//! regime's distributions through the caller's RNG.

use crate::{
    catalog::{Catalog, CITIES, DAYPARTS, PLATFORMS},
    config::RegimeConfig,
    error::ScenarioResult,
    record::{FactTable, PerformanceRecord},
    rng::ScenarioRng,
    types::RegimeKind,
};
use chrono::NaiveDate;

pub const DAILY_VOLATILITY_RANGE: (f64, f64) = (0.85, 1.15);
pub const SPEND_RANGE: (f64, f64) = (500.0, 5000.0);
pub const BASE_CONVERSION_RATE_RANGE: (f64, f64) = (0.02, 0.10);
/// Half-open: upper bound never drawn.
pub const IMPRESSIONS_RANGE: (u64, u64) = (2500, 40_000);
pub const CLICK_THROUGH_RANGE: (f64, f64) = (0.005, 0.05);
pub const ROAS_NOISE_STD: f64 = 0.15;
pub const ROAS_FLOOR: f64 = 0.5;

pub struct ScenarioGenerator<'a> {
    kind:   RegimeKind,
    regime: &'a RegimeConfig,
}

impl<'a> ScenarioGenerator<'a> {
    /// Fails if the regime's parameters are unusable.
    pub fn new(kind: RegimeKind, regime: &'a RegimeConfig) -> ScenarioResult<Self> {
        regime.validate(kind.name())?;
        Ok(Self { kind, regime })
    }

    /// Generate one fact table over `window`.
    pub fn generate(&self, window: &[NaiveDate], rng: &mut ScenarioRng) -> ScenarioResult<FactTable> {
        let mut records = Vec::with_capacity(window.len() * Catalog::rows_per_day());

        for &date in window {
            // One draw per day, shared by every row of that day.
            let daily_volatility = rng.uniform(DAILY_VOLATILITY_RANGE.0, DAILY_VOLATILITY_RANGE.1);

            for (brand, sku) in Catalog::brand_skus() {
                for platform in PLATFORMS {
                    for city in CITIES {
                        for &daypart in DAYPARTS {
                            let draw = self.draw(rng, daily_volatility);
                            records.push(PerformanceRecord {
                                date,
                                brand: brand.to_string(),
                                sku: sku.to_string(),
                                platform: platform.to_string(),
                                city: city.to_string(),
                                daypart,
                                spend: draw.spend,
                                impressions: draw.impressions,
                                clicks: draw.clicks,
                                conversions: draw.conversions,
                                direct_sales: draw.direct_sales,
                                roas: draw.roas,
                                is_out_of_stock: draw.is_out_of_stock,
                                content_score: draw.content_score,
                            });
                        }
                    }
                }
            }
        }

        log::debug!(
            "generator[{}]: {} records over {} days (rng={})",
            self.kind,
            records.len(),
            window.len(),
            rng.name
        );

        Ok(FactTable::new(self.kind, records))
    }

    /// Draw the measures for a single record. Draw order is part of the
    /// reproducibility contract: changing it changes every seeded table.
    fn draw(&self, rng: &mut ScenarioRng, daily_volatility: f64) -> MeasureDraw {
        let regime = self.regime;

        let base_roas = rng.normal(regime.roas_mean, regime.roas_std);
        let spend = rng.uniform(SPEND_RANGE.0, SPEND_RANGE.1) * daily_volatility;
        let base_rate = rng.uniform(BASE_CONVERSION_RATE_RANGE.0, BASE_CONVERSION_RATE_RANGE.1);
        let effective_rate = base_rate * (1.0 + regime.conversion_lift);
        let impressions = rng.int_below(IMPRESSIONS_RANGE.0, IMPRESSIONS_RANGE.1);
        let ctr = rng.uniform(CLICK_THROUGH_RANGE.0, CLICK_THROUGH_RANGE.1);
        let clicks = (impressions as f64 * ctr).floor() as u64;
        // Large lifts could push the rate past 1; conversions never exceed clicks.
        let conversions = ((clicks as f64 * effective_rate).floor() as u64).min(clicks);
        let noise = rng.normal(0.0, ROAS_NOISE_STD);
        let roas = (base_roas + noise).max(ROAS_FLOOR);
        let is_out_of_stock = rng.chance(regime.oos_probability);
        let (lo, hi) = regime.content_score_range;
        let content_score = rng.int_inclusive(lo, hi);

        MeasureDraw {
            spend,
            impressions,
            clicks,
            conversions,
            direct_sales: spend * roas,
            roas,
            is_out_of_stock,
            content_score,
        }
    }
}

struct MeasureDraw {
    spend:           f64,
    impressions:     u64,
    clicks:          u64,
    conversions:     u64,
    direct_sales:    f64,
    roas:            f64,
    is_out_of_stock: bool,
    content_score:   u8,
}

/// Convenience wrapper: validate, then generate.
pub fn generate(
    kind: RegimeKind,
    regime: &RegimeConfig,
    window: &[NaiveDate],
    rng: &mut ScenarioRng,
) -> ScenarioResult<FactTable> {
    ScenarioGenerator::new(kind, regime)?.generate(window, rng)
}
