//! Metric aggregation over a fact table.
//!
//! Everything here is a pure function of `(table, filters)`. An empty
//! selection is not an error: it yields zero-valued sums and KPIs.

use crate::{
    error::{ScenarioError, ScenarioResult},
    record::{FactTable, PerformanceRecord},
    types::Daypart,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Independent optional predicates, combined with AND.
/// Deserialized values go through the same "All …" rule as the builders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionFilters {
    #[serde(deserialize_with = "deserialize_selection")]
    pub city:     Option<String>,
    #[serde(deserialize_with = "deserialize_selection")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "deserialize_selection")]
    pub brand:    Option<String>,
    #[serde(deserialize_with = "deserialize_selection")]
    pub sku:      Option<String>,
}

impl DimensionFilters {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = selection(city.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = selection(platform.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = selection(brand.into());
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = selection(sku.into());
        self
    }

    /// Apply the "All …" convention to values set directly on the fields.
    pub fn normalized(self) -> Self {
        Self {
            city:     self.city.and_then(selection),
            platform: self.platform.and_then(selection),
            brand:    self.brand.and_then(selection),
            sku:      self.sku.and_then(selection),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.city.is_none() && self.platform.is_none() && self.brand.is_none() && self.sku.is_none()
    }

    pub fn matches(&self, record: &PerformanceRecord) -> bool {
        fn ok(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f == value)
        }
        ok(&self.city, &record.city)
            && ok(&self.platform, &record.platform)
            && ok(&self.brand, &record.brand)
            && ok(&self.sku, &record.sku)
    }
}

/// "All", "all" and "All Cities"-style dropdown values mean no restriction.
fn selection(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed.starts_with("All ") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn deserialize_selection<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(selection))
}

/// Headline KPIs over a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_sales:       f64,
    pub total_spend:       f64,
    pub total_conversions: u64,
    /// total_sales / total_spend, 0 when nothing was spent.
    pub roas:              f64,
    /// total_spend / total_conversions, 0 when nothing converted.
    pub cpa:               f64,
}

impl KpiSummary {
    pub fn from_totals(total_sales: f64, total_spend: f64, total_conversions: u64) -> Self {
        Self {
            total_sales,
            total_spend,
            total_conversions,
            roas: if total_spend > 0.0 { total_sales / total_spend } else { 0.0 },
            cpa: if total_conversions > 0 {
                total_spend / total_conversions as f64
            } else {
                0.0
            },
        }
    }
}

/// Running sums for one group of a rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSums {
    pub spend:       f64,
    pub sales:       f64,
    pub conversions: u64,
    pub impressions: u64,
    pub clicks:      u64,
    /// Sum of per-row ROAS, for unweighted means.
    pub roas_sum:    f64,
    pub rows:        usize,
}

impl PartialSums {
    pub fn add(&mut self, record: &PerformanceRecord) {
        self.spend += record.spend;
        self.sales += record.direct_sales;
        self.conversions += record.conversions;
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.roas_sum += record.roas;
        self.rows += 1;
    }

    pub fn summary(&self) -> KpiSummary {
        KpiSummary::from_totals(self.sales, self.spend, self.conversions)
    }

    /// Unweighted mean of row ROAS; what the per-platform and heatmap
    /// views colour by. 0 for an empty group.
    pub fn mean_roas(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.roas_sum / self.rows as f64
        }
    }
}

/// Dimension a rollup groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Date,
    Platform,
    City,
    Brand,
    Daypart,
    Sku,
}

impl FromStr for GroupKey {
    type Err = ScenarioError;

    fn from_str(s: &str) -> ScenarioResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date"     => Ok(Self::Date),
            "platform" => Ok(Self::Platform),
            "city"     => Ok(Self::City),
            "brand"    => Ok(Self::Brand),
            "daypart"  => Ok(Self::Daypart),
            "sku"      => Ok(Self::Sku),
            _ => Err(ScenarioError::InvalidGroupKey { name: s.to_string() }),
        }
    }
}

/// Value of the grouped dimension for one rollup row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupValue {
    Date(NaiveDate),
    Daypart(Daypart),
    Label(String),
}

impl GroupValue {
    fn of(key: GroupKey, record: &PerformanceRecord) -> Self {
        match key {
            GroupKey::Date     => Self::Date(record.date),
            GroupKey::Daypart  => Self::Daypart(record.daypart),
            GroupKey::Platform => Self::Label(record.platform.clone()),
            GroupKey::City     => Self::Label(record.city.clone()),
            GroupKey::Brand    => Self::Label(record.brand.clone()),
            GroupKey::Sku      => Self::Label(record.sku.clone()),
        }
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d)    => write!(f, "{d}"),
            Self::Daypart(d) => write!(f, "{d}"),
            Self::Label(s)   => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub key:  GroupValue,
    pub sums: PartialSums,
}

/// Totals over every record matching `filters`.
pub fn summarize(table: &FactTable, filters: &DimensionFilters) -> KpiSummary {
    let mut sums = PartialSums::default();
    for record in table.records().iter().filter(|r| filters.matches(r)) {
        sums.add(record);
    }
    sums.summary()
}

/// Group every record by `key`.
pub fn rollup(table: &FactTable, key: GroupKey) -> Vec<RollupRow> {
    rollup_filtered(table, &DimensionFilters::all(), key)
}

/// Group the filtered records by `key`.
///
/// Dates come back chronological and dayparts in canonical order
/// (Breakfast, Lunch, Snacks, Dinner); labels keep encounter order,
/// which for generated tables is catalog order.
pub fn rollup_filtered(table: &FactTable, filters: &DimensionFilters, key: GroupKey) -> Vec<RollupRow> {
    let mut index: HashMap<GroupValue, usize> = HashMap::new();
    let mut rows: Vec<RollupRow> = Vec::new();

    for record in table.records().iter().filter(|r| filters.matches(r)) {
        let value = GroupValue::of(key, record);
        let slot = match index.get(&value) {
            Some(&i) => i,
            None => {
                index.insert(value.clone(), rows.len());
                rows.push(RollupRow {
                    key: value,
                    sums: PartialSums::default(),
                });
                rows.len() - 1
            }
        };
        rows[slot].sums.add(record);
    }

    if matches!(key, GroupKey::Date | GroupKey::Daypart) {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
    }
    rows
}

/// Signed differences, active minus baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiDeltas {
    pub sales:       f64,
    pub spend:       f64,
    pub conversions: i64,
    pub roas:        f64,
    pub cpa:         f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// (active.roas / baseline.roas - 1) × 100; 0 when baseline ROAS is 0.
    pub uplift_pct:       f64,
    /// (active.sales / baseline.sales - 1) × 100; 100 when baseline sold nothing.
    pub sales_uplift_pct: f64,
    pub deltas:           KpiDeltas,
}

pub fn compare(active: &KpiSummary, baseline: &KpiSummary) -> Comparison {
    let uplift_pct = if baseline.roas > 0.0 {
        (active.roas / baseline.roas - 1.0) * 100.0
    } else {
        0.0
    };
    let sales_uplift_pct = if baseline.total_sales > 0.0 {
        (active.total_sales / baseline.total_sales - 1.0) * 100.0
    } else {
        100.0
    };

    Comparison {
        uplift_pct,
        sales_uplift_pct,
        deltas: KpiDeltas {
            sales:       active.total_sales - baseline.total_sales,
            spend:       active.total_spend - baseline.total_spend,
            conversions: active.total_conversions as i64 - baseline.total_conversions as i64,
            roas:        active.roas - baseline.roas,
            cpa:         active.cpa - baseline.cpa,
        },
    }
}

/// Daily sales of both regimes side by side, aligned on date.
/// Dates present in only one table carry 0 for the other.
pub fn daily_sales_pair(
    active: &FactTable,
    baseline: &FactTable,
    filters: &DimensionFilters,
) -> Vec<(NaiveDate, f64, f64)> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for row in rollup_filtered(active, filters, GroupKey::Date) {
        if let GroupValue::Date(d) = row.key {
            by_date.entry(d).or_default().0 = row.sums.sales;
        }
    }
    for row in rollup_filtered(baseline, filters, GroupKey::Date) {
        if let GroupValue::Date(d) = row.key {
            by_date.entry(d).or_default().1 = row.sums.sales;
        }
    }
    by_date.into_iter().map(|(d, (a, b))| (d, a, b)).collect()
}
