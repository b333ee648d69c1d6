//! Derived views for the action center and SKU deep-dive:
//! out-of-stock waste, content audit, per-SKU content profile and
//! the brand × daypart ROAS heatmap.

use crate::{
    aggregator::DimensionFilters,
    catalog::{Catalog, Competitor},
    record::{FactTable, PerformanceRecord},
    types::Daypart,
};
use serde::Serialize;
use std::cmp::Ordering;

/// Mean content score above which a SKU counts as optimized.
pub const CONTENT_OPTIMIZED_ABOVE: f64 = 8.0;

#[derive(Debug, Clone, Serialize)]
pub struct OosReport<'a> {
    /// Out-of-stock rows, highest spend first.
    pub rows:         Vec<&'a PerformanceRecord>,
    /// Spend placed behind SKUs nobody could buy.
    pub wasted_spend: f64,
}

pub fn oos_alerts<'a>(table: &'a FactTable, filters: &DimensionFilters) -> OosReport<'a> {
    let mut rows: Vec<&PerformanceRecord> = table
        .records()
        .iter()
        .filter(|r| r.is_out_of_stock && filters.matches(r))
        .collect();
    rows.sort_by(|a, b| b.spend.partial_cmp(&a.spend).unwrap_or(Ordering::Equal));
    let wasted_spend = rows.iter().map(|r| r.spend).sum();
    OosReport { rows, wasted_spend }
}

/// Rows scoring below `threshold`, worst first. Ties keep table order.
pub fn content_audit(table: &FactTable, threshold: u8) -> Vec<&PerformanceRecord> {
    let mut rows: Vec<&PerformanceRecord> = table
        .records()
        .iter()
        .filter(|r| r.content_score < threshold)
        .collect();
    rows.sort_by_key(|r| r.content_score);
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct SkuContentProfile {
    pub sku:                String,
    pub brand:              Option<&'static str>,
    pub mean_content_score: f64,
    pub optimized:          bool,
    pub competitor:         Competitor,
    pub rows:               usize,
}

/// None when the SKU has no rows in the table.
pub fn sku_content_profile(table: &FactTable, sku: &str) -> Option<SkuContentProfile> {
    let scores: Vec<f64> = table
        .records()
        .iter()
        .filter(|r| r.sku == sku)
        .map(|r| f64::from(r.content_score))
        .collect();
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let brand = Catalog::brand_of(sku);

    Some(SkuContentProfile {
        sku: sku.to_string(),
        brand,
        mean_content_score: mean,
        optimized: mean > CONTENT_OPTIMIZED_ABOVE,
        competitor: Catalog::competitor_for(brand.unwrap_or_default()),
        rows: scores.len(),
    })
}

/// Mean ROAS pivot: one row per daypart (canonical order), one column
/// per requested brand. Empty cells are 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoasHeatmap {
    pub brands:   Vec<String>,
    pub dayparts: Vec<Daypart>,
    /// `cells[daypart][brand]`
    pub cells:    Vec<Vec<f64>>,
}

impl RoasHeatmap {
    pub fn cell(&self, daypart: Daypart, brand: &str) -> Option<f64> {
        let row = self.dayparts.iter().position(|d| *d == daypart)?;
        let col = self.brands.iter().position(|b| b == brand)?;
        Some(self.cells[row][col])
    }
}

pub fn roas_heatmap(table: &FactTable, filters: &DimensionFilters, brands: &[&str]) -> RoasHeatmap {
    let dayparts = Daypart::ALL.to_vec();
    let mut sums = vec![vec![(0.0_f64, 0_usize); brands.len()]; dayparts.len()];

    for record in table.records().iter().filter(|r| filters.matches(r)) {
        let Some(col) = brands.iter().position(|b| *b == record.brand) else {
            continue;
        };
        let row = record.daypart as usize;
        let cell = &mut sums[row][col];
        cell.0 += record.roas;
        cell.1 += 1;
    }

    let cells = sums
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(total, n)| if n == 0 { 0.0 } else { total / n as f64 })
                .collect()
        })
        .collect();

    RoasHeatmap {
        brands: brands.iter().map(|b| b.to_string()).collect(),
        dayparts,
        cells,
    }
}
