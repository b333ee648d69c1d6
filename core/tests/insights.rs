//! Out-of-stock alerts, content audit, SKU profile and ROAS heatmap.

use chrono::NaiveDate;
use scenario_core::{
    aggregator::DimensionFilters,
    config::DEFAULT_CONTENT_AUDIT_THRESHOLD,
    engine::ScenarioEngine,
    insights::{content_audit, oos_alerts, roas_heatmap, sku_content_profile},
    types::Daypart,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn oos_alerts_list_only_out_of_stock_rows_by_spend() {
    let mut engine = ScenarioEngine::build_test(42, today()).unwrap();
    let baseline = engine.generate(false).unwrap();

    let report = oos_alerts(&baseline, &DimensionFilters::all());
    assert!(!report.rows.is_empty(), "baseline should have OOS rows");
    assert!(report.rows.iter().all(|r| r.is_out_of_stock));
    assert!(report.rows.windows(2).all(|w| w[0].spend >= w[1].spend));

    let wasted: f64 = report.rows.iter().map(|r| r.spend).sum();
    assert!((report.wasted_spend - wasted).abs() < 1e-6);

    let expected = baseline.records().iter().filter(|r| r.is_out_of_stock).count();
    assert_eq!(report.rows.len(), expected);
}

#[test]
fn oos_alerts_respect_filters() {
    let mut engine = ScenarioEngine::build_test(43, today()).unwrap();
    let baseline = engine.generate(false).unwrap();

    let report = oos_alerts(&baseline, &DimensionFilters::all().city("Hyderabad"));
    assert!(report.rows.iter().all(|r| r.city == "Hyderabad"));
}

#[test]
fn engine_active_wastes_less_on_out_of_stock() {
    let mut engine = ScenarioEngine::build_test(44, today()).unwrap();
    let (baseline, active) = engine.generate_pair().unwrap();

    let base = oos_alerts(&baseline, &DimensionFilters::all());
    let act = oos_alerts(&active, &DimensionFilters::all());
    assert!(act.wasted_spend < base.wasted_spend);
}

#[test]
fn content_audit_separates_the_regimes() {
    let mut engine = ScenarioEngine::build_test(45, today()).unwrap();
    let (baseline, active) = engine.generate_pair().unwrap();

    let flagged = content_audit(&baseline, DEFAULT_CONTENT_AUDIT_THRESHOLD);
    assert_eq!(flagged.len(), baseline.len(), "every baseline score is below 8");
    assert!(flagged.windows(2).all(|w| w[0].content_score <= w[1].content_score));

    assert!(content_audit(&active, DEFAULT_CONTENT_AUDIT_THRESHOLD).is_empty());
    assert!(!content_audit(&active, 10).is_empty(), "scores of 8 and 9 fall under 10");
}

#[test]
fn sku_profile_reports_score_and_competitor() {
    let mut engine = ScenarioEngine::build_test(46, today()).unwrap();
    let (baseline, active) = engine.generate_pair().unwrap();

    let act = sku_content_profile(&active, "Dark Fantasy Choco Fills").unwrap();
    assert_eq!(act.brand, Some("Sunfeast"));
    assert_eq!(act.competitor.name, "Britannia");
    assert_eq!(act.competitor.sku, "Bourbon");
    assert!(act.optimized, "mean score {} should be above 8", act.mean_content_score);
    assert_eq!(act.rows, 30 * 5 * 5 * 4);

    let base = sku_content_profile(&baseline, "Dark Fantasy Choco Fills").unwrap();
    assert!(!base.optimized);
    assert!(base.mean_content_score >= 4.0 && base.mean_content_score <= 6.0);

    assert!(sku_content_profile(&active, "Not A Product").is_none());
}

#[test]
fn heatmap_rows_follow_canonical_daypart_order() {
    let mut engine = ScenarioEngine::build_test(47, today()).unwrap();
    let active = engine.generate(true).unwrap();
    let brands = ["Aashirvaad", "Bingo!", "Sunfeast", "YiPPee!"];

    let heatmap = roas_heatmap(&active, &DimensionFilters::all(), &brands);
    assert_eq!(heatmap.dayparts, Daypart::ALL.to_vec());
    assert_eq!(heatmap.cells.len(), 4);
    assert!(heatmap.cells.iter().all(|row| row.len() == brands.len()));

    let (sum, n) = active
        .records()
        .iter()
        .filter(|r| r.daypart == Daypart::Snacks && r.brand == "Bingo!")
        .fold((0.0, 0usize), |(s, n), r| (s + r.roas, n + 1));
    let cell = heatmap.cell(Daypart::Snacks, "Bingo!").unwrap();
    assert!((cell - sum / n as f64).abs() < 1e-9);
}

#[test]
fn heatmap_fills_missing_cells_with_zero() {
    let mut engine = ScenarioEngine::build_test(48, today()).unwrap();
    let active = engine.generate(true).unwrap();

    let heatmap = roas_heatmap(
        &active,
        &DimensionFilters::all().brand("Sunfeast"),
        &["Sunfeast", "Bingo!"],
    );
    for daypart in Daypart::ALL {
        assert!(heatmap.cell(daypart, "Sunfeast").unwrap() > 0.0);
        assert_eq!(heatmap.cell(daypart, "Bingo!").unwrap(), 0.0);
    }
    assert!(heatmap.cell(Daypart::Lunch, "Maggi").is_none());
}
