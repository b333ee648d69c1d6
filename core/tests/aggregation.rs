//! KPI summaries, filters, rollups and the baseline-vs-active comparison.

use chrono::NaiveDate;
use scenario_core::{
    aggregator::{
        self, compare, summarize, DimensionFilters, GroupKey, GroupValue, KpiSummary,
    },
    catalog::PLATFORMS,
    engine::ScenarioEngine,
    record::{FactTable, PerformanceRecord},
    types::{Daypart, RegimeKind},
};
use std::str::FromStr;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn active_table(seed: u64) -> std::sync::Arc<FactTable> {
    let mut engine = ScenarioEngine::build_test(seed, today()).unwrap();
    engine.generate(true).unwrap()
}

fn record(city: &str, spend: f64, roas: f64, conversions: u64) -> PerformanceRecord {
    PerformanceRecord {
        date: today(),
        brand: "Sunfeast".into(),
        sku: "Marie Light".into(),
        platform: "Zepto".into(),
        city: city.into(),
        daypart: Daypart::Lunch,
        spend,
        impressions: 10_000,
        clicks: 200,
        conversions,
        direct_sales: spend * roas,
        roas,
        is_out_of_stock: false,
        content_score: 9,
    }
}

#[test]
fn unfiltered_summary_matches_raw_sums_exactly() {
    let table = active_table(42);
    let kpis = summarize(&table, &DimensionFilters::all());

    let mut sales = 0.0;
    let mut spend = 0.0;
    let mut conversions = 0u64;
    for r in table.records() {
        sales += r.direct_sales;
        spend += r.spend;
        conversions += r.conversions;
    }

    assert_eq!(kpis.total_sales, sales);
    assert_eq!(kpis.total_spend, spend);
    assert_eq!(kpis.total_conversions, conversions);
    assert_eq!(kpis.roas, sales / spend);
    assert_eq!(kpis.cpa, spend / conversions as f64);
}

#[test]
fn city_filter_matches_only_that_city() {
    let table = active_table(8);
    let kpis = summarize(&table, &DimensionFilters::all().city("Delhi"));

    let mut sales = 0.0;
    let mut spend = 0.0;
    for r in table.records().iter().filter(|r| r.city == "Delhi") {
        sales += r.direct_sales;
        spend += r.spend;
    }
    assert_eq!(kpis.total_sales, sales);
    assert_eq!(kpis.total_spend, spend);

    let everything = summarize(&table, &DimensionFilters::all());
    assert!(kpis.total_sales < everything.total_sales, "filter leaked other cities");
}

#[test]
fn filters_combine_with_and() {
    let table = active_table(9);
    let filters = DimensionFilters::all()
        .city("Mumbai")
        .platform("Blinkit")
        .brand("Bingo!");
    let kpis = summarize(&table, &filters);

    let expected_spend: f64 = table
        .records()
        .iter()
        .filter(|r| r.city == "Mumbai" && r.platform == "Blinkit" && r.brand == "Bingo!")
        .map(|r| r.spend)
        .sum();
    assert!((kpis.total_spend - expected_spend).abs() < 1e-6);
}

#[test]
fn all_sentinels_mean_no_restriction() {
    let filters = DimensionFilters::all()
        .city("All Cities")
        .platform("all")
        .brand("All Brands");
    assert!(filters.is_unrestricted());

    let raw = DimensionFilters {
        city: Some("All Cities".into()),
        platform: Some("Zepto".into()),
        ..Default::default()
    };
    let normalized = raw.normalized();
    assert_eq!(normalized.city, None);
    assert_eq!(normalized.platform.as_deref(), Some("Zepto"));
}

#[test]
fn deserialized_all_filters_match_unfiltered_totals() {
    let table = active_table(12);
    let filters: DimensionFilters =
        serde_json::from_str(r#"{"city":"All Cities","platform":"all","brand":"","sku":null}"#).unwrap();
    assert!(filters.is_unrestricted());
    assert_eq!(
        summarize(&table, &filters),
        summarize(&table, &DimensionFilters::all())
    );

    let filters: DimensionFilters =
        serde_json::from_str(r#"{"city":"All Cities","platform":"Zepto"}"#).unwrap();
    assert_eq!(filters, DimensionFilters::all().platform("Zepto"));
    let zepto = summarize(&table, &filters);
    assert!(zepto.total_spend > 0.0);
    assert!(zepto.total_spend < summarize(&table, &DimensionFilters::all()).total_spend);
}

#[test]
fn empty_selection_returns_zero_summary() {
    let table = active_table(10);
    let kpis = summarize(&table, &DimensionFilters::all().city("Atlantis"));
    assert_eq!(kpis, KpiSummary::default());
}

#[test]
fn zero_spend_gives_zero_roas_and_zero_conversions_give_zero_cpa() {
    let table = FactTable::new(
        RegimeKind::Baseline,
        vec![record("Mumbai", 0.0, 2.0, 0), record("Delhi", 0.0, 1.0, 0)],
    );
    let kpis = summarize(&table, &DimensionFilters::all());
    assert_eq!(kpis.total_spend, 0.0);
    assert_eq!(kpis.roas, 0.0);
    assert_eq!(kpis.cpa, 0.0);
}

#[test]
fn hand_built_table_summarizes_as_expected() {
    let table = FactTable::new(
        RegimeKind::EngineActive,
        vec![record("Mumbai", 100.0, 2.0, 4), record("Mumbai", 300.0, 3.0, 6)],
    );
    let kpis = summarize(&table, &DimensionFilters::all());
    assert_eq!(kpis.total_sales, 1100.0);
    assert_eq!(kpis.total_spend, 400.0);
    assert_eq!(kpis.total_conversions, 10);
    assert_eq!(kpis.roas, 2.75);
    assert_eq!(kpis.cpa, 40.0);
}

#[test]
fn date_rollup_is_chronological_and_complete() {
    let table = active_table(12);
    let rows = aggregator::rollup(&table, GroupKey::Date);

    assert_eq!(rows.len(), 30);
    let dates: Vec<NaiveDate> = rows
        .iter()
        .map(|r| match r.key {
            GroupValue::Date(d) => d,
            ref other => panic!("unexpected key {other:?}"),
        })
        .collect();
    assert_eq!(dates, table.dates());
}

#[test]
fn daypart_rollup_uses_canonical_order() {
    let table = active_table(13);
    let keys: Vec<GroupValue> = aggregator::rollup(&table, GroupKey::Daypart)
        .into_iter()
        .map(|r| r.key)
        .collect();

    assert_eq!(
        keys,
        vec![
            GroupValue::Daypart(Daypart::Breakfast),
            GroupValue::Daypart(Daypart::Lunch),
            GroupValue::Daypart(Daypart::Snacks),
            GroupValue::Daypart(Daypart::Dinner),
        ]
    );
}

#[test]
fn platform_rollup_keeps_catalog_order_and_partitions_totals() {
    let table = active_table(14);
    let rows = aggregator::rollup(&table, GroupKey::Platform);

    let labels: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(labels, PLATFORMS.iter().map(|p| p.to_string()).collect::<Vec<_>>());

    let total = summarize(&table, &DimensionFilters::all());
    let rolled_sales: f64 = rows.iter().map(|r| r.sums.sales).sum();
    let rolled_rows: usize = rows.iter().map(|r| r.sums.rows).sum();
    assert_eq!(rolled_rows, table.len());
    assert!((rolled_sales - total.total_sales).abs() / total.total_sales < 1e-9);

    for row in &rows {
        let mean = row.sums.mean_roas();
        assert!(mean > 2.0 && mean < 3.6, "implausible mean ROAS {mean} for {}", row.key);
    }
}

#[test]
fn filtered_rollup_respects_filters() {
    let table = active_table(15);
    let rows = aggregator::rollup_filtered(
        &table,
        &DimensionFilters::all().brand("YiPPee!"),
        GroupKey::Sku,
    );
    let labels: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(labels, vec!["Magic Masala Noodles", "Power Up Atta Noodles", "Creamy Pasta"]);
}

#[test]
fn unknown_group_key_is_rejected() {
    assert_eq!(GroupKey::from_str("Daypart").unwrap(), GroupKey::Daypart);
    assert!(GroupKey::from_str("weekday").is_err());
}

#[test]
fn comparison_reports_uplift_and_deltas() {
    let baseline = KpiSummary::from_totals(2000.0, 1000.0, 50);
    let active = KpiSummary::from_totals(3000.0, 1000.0, 80);
    let cmp = compare(&active, &baseline);

    assert!((cmp.uplift_pct - 50.0).abs() < 1e-9);
    assert!((cmp.sales_uplift_pct - 50.0).abs() < 1e-9);
    assert_eq!(cmp.deltas.sales, 1000.0);
    assert_eq!(cmp.deltas.spend, 0.0);
    assert_eq!(cmp.deltas.conversions, 30);
    assert!((cmp.deltas.roas - 1.0).abs() < 1e-12);
    assert!((cmp.deltas.cpa - (12.5 - 20.0)).abs() < 1e-12);
}

#[test]
fn comparison_against_empty_baseline_does_not_divide_by_zero() {
    let active = KpiSummary::from_totals(3000.0, 1000.0, 80);
    let cmp = compare(&active, &KpiSummary::default());
    assert_eq!(cmp.uplift_pct, 0.0);
    assert_eq!(cmp.sales_uplift_pct, 100.0);
    assert_eq!(cmp.deltas.conversions, 80);
}

#[test]
fn daily_sales_pair_aligns_dates() {
    let mut engine = ScenarioEngine::build_test(16, today()).unwrap();
    let (baseline, active) = engine.generate_pair().unwrap();
    let filters = DimensionFilters::all().city("Kolkata");

    let series = aggregator::daily_sales_pair(&active, &baseline, &filters);
    assert_eq!(series.len(), 30);
    assert!(series.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(series.iter().all(|(_, a, b)| *a > 0.0 && *b > 0.0));
}
