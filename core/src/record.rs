//! Fact-table row shape. Field names and units are a stable contract
//! for whatever renders these rows.

use crate::types::{Daypart, RegimeKind, TableId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub date:            NaiveDate,
    pub brand:           String,
    pub sku:             String,
    pub platform:        String,
    pub city:            String,
    pub daypart:         Daypart,
    pub spend:           f64,
    pub impressions:     u64,
    pub clicks:          u64,
    pub conversions:     u64,
    pub direct_sales:    f64,
    pub roas:            f64,
    pub is_out_of_stock: bool,
    pub content_score:   u8,
}

/// All records generated under one regime. Read-only once built;
/// the engine hands it out behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactTable {
    pub id:           TableId,
    pub regime:       RegimeKind,
    pub generated_at: DateTime<Utc>,
    records:          Vec<PerformanceRecord>,
}

impl FactTable {
    pub fn new(regime: RegimeKind, records: Vec<PerformanceRecord>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            regime,
            generated_at: Utc::now(),
            records,
        }
    }

    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct dates, oldest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}
