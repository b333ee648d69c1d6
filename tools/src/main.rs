//! scenario-runner: headless driver for the scenario analytics core.
//!
//! Usage:
//!   scenario-runner --seed 12345 --city Mumbai --platform Blinkit
//!   scenario-runner --config data/scenario.json --group-by daypart
//!   scenario-runner --seed 12345 --ipc-mode

use anyhow::Result;
use scenario_core::{
    aggregator::{self, Comparison, DimensionFilters, GroupKey, KpiSummary, RollupRow},
    config::ScenarioConfig,
    engine::ScenarioEngine,
    insights,
    types::RegimeKind,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Summarize {
        #[serde(default)]
        regime: Option<String>,
        #[serde(default)]
        filters: DimensionFilters,
    },
    Rollup {
        regime: String,
        group_by: String,
        #[serde(default)]
        filters: DimensionFilters,
    },
    Compare {
        #[serde(default)]
        filters: DimensionFilters,
    },
    OosAlerts {
        regime: String,
        #[serde(default)]
        filters: DimensionFilters,
        #[serde(default = "default_alert_limit")]
        limit: usize,
    },
    Invalidate {
        regime: String,
    },
    Quit,
}

fn default_alert_limit() -> usize {
    20
}

#[derive(serde::Serialize)]
struct ComparisonState {
    baseline: KpiSummary,
    active: KpiSummary,
    comparison: Comparison,
}

#[derive(serde::Serialize)]
struct OosState {
    regime: RegimeKind,
    count: usize,
    wasted_spend: f64,
    rows: Vec<scenario_core::record::PerformanceRecord>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);

    let filters = DimensionFilters::all()
        .city(string_arg(&args, "--city").unwrap_or("all"))
        .platform(string_arg(&args, "--platform").unwrap_or("all"))
        .brand(string_arg(&args, "--brand").unwrap_or("all"))
        .sku(string_arg(&args, "--sku").unwrap_or("all"));
    let group_by: Option<GroupKey> = string_arg(&args, "--group-by")
        .map(str::parse::<GroupKey>)
        .transpose()?;

    let seed = config.seed;
    let mut engine = ScenarioEngine::build(config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        println!("Scenario analytics — scenario-runner");
        println!("  seed:      {seed}");
        println!("  window:    {} days ending {}", engine.clock.window_days, engine.clock.today);
        println!("  filters:   {}", describe_filters(&filters));
        println!();
        print_summary(&mut engine, &filters, group_by)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut ScenarioEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    log::info!("ipc: ready (seed={})", engine.rng_bank.master_seed());

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("ipc: unparseable command: {e}");
                reply_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(engine, cmd) {
            Ok(reply) => writeln!(stdout, "{reply}")?,
            Err(e) => {
                log::warn!("ipc: command failed: {e}");
                reply_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(engine: &mut ScenarioEngine, cmd: IpcCommand) -> Result<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::Summarize { regime, filters } => {
            let kind: RegimeKind = match regime {
                Some(name) => name.parse()?,
                None => RegimeKind::EngineActive,
            };
            let table = engine.generate_kind(kind)?;
            serde_json::to_value(aggregator::summarize(&table, &filters))?
        }
        IpcCommand::Rollup { regime, group_by, filters } => {
            let kind: RegimeKind = regime.parse()?;
            let key: GroupKey = group_by.parse()?;
            let table = engine.generate_kind(kind)?;
            let rows: Vec<RollupRow> = aggregator::rollup_filtered(&table, &filters, key);
            serde_json::to_value(rows)?
        }
        IpcCommand::Compare { filters } => {
            serde_json::to_value(compare_regimes(engine, &filters)?)?
        }
        IpcCommand::OosAlerts { regime, filters, limit } => {
            let kind: RegimeKind = regime.parse()?;
            let table = engine.generate_kind(kind)?;
            let report = insights::oos_alerts(&table, &filters);
            serde_json::to_value(OosState {
                regime: kind,
                count: report.rows.len(),
                wasted_spend: report.wasted_spend,
                rows: report.rows.into_iter().take(limit).cloned().collect(),
            })?
        }
        IpcCommand::Invalidate { regime } => {
            let kind: RegimeKind = regime.parse()?;
            serde_json::json!({ "invalidated": engine.invalidate(kind) })
        }
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(reply)
}

fn compare_regimes(engine: &mut ScenarioEngine, filters: &DimensionFilters) -> Result<ComparisonState> {
    let (baseline_table, active_table) = engine.generate_pair()?;
    let baseline = aggregator::summarize(&baseline_table, filters);
    let active = aggregator::summarize(&active_table, filters);
    Ok(ComparisonState {
        comparison: aggregator::compare(&active, &baseline),
        baseline,
        active,
    })
}

fn reply_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(
    engine: &mut ScenarioEngine,
    filters: &DimensionFilters,
    group_by: Option<GroupKey>,
) -> Result<()> {
    let state = compare_regimes(engine, filters)?;

    println!("=== KPI SUMMARY ===");
    println!("  {:<22} {:>16} {:>16}", "metric", "baseline", "engine active");
    println!("  {:<22} {:>16.0} {:>16.0}", "direct sales", state.baseline.total_sales, state.active.total_sales);
    println!("  {:<22} {:>16.0} {:>16.0}", "spend", state.baseline.total_spend, state.active.total_spend);
    println!("  {:<22} {:>16} {:>16}", "conversions", state.baseline.total_conversions, state.active.total_conversions);
    println!("  {:<22} {:>15.2}x {:>15.2}x", "blended ROAS", state.baseline.roas, state.active.roas);
    println!("  {:<22} {:>16.2} {:>16.2}", "CPA", state.baseline.cpa, state.active.cpa);

    println!();
    println!("=== IMPACT ===");
    println!("  ROAS uplift:      {:+.1}%", state.comparison.uplift_pct);
    println!("  sales uplift:     {:+.1}%", state.comparison.sales_uplift_pct);
    println!("  incremental sales {:+.0}", state.comparison.deltas.sales);
    println!("  extra conversions {:+}", state.comparison.deltas.conversions);

    let (baseline_table, active_table) = engine.generate_pair()?;
    let oos_base = insights::oos_alerts(&baseline_table, filters);
    let oos_active = insights::oos_alerts(&active_table, filters);
    println!();
    println!("=== OUT OF STOCK ===");
    println!("  baseline:      {} rows, {:.0} wasted spend", oos_base.rows.len(), oos_base.wasted_spend);
    println!("  engine active: {} rows, {:.0} wasted spend", oos_active.rows.len(), oos_active.wasted_spend);

    let threshold = engine.config.content_audit_threshold;
    println!();
    println!("=== CONTENT AUDIT (score < {threshold}) ===");
    println!("  baseline:      {} rows", insights::content_audit(&baseline_table, threshold).len());
    println!("  engine active: {} rows", insights::content_audit(&active_table, threshold).len());

    if let Some(key) = group_by {
        println!();
        println!("=== ROLLUP BY {key:?} (engine active) ===");
        for row in aggregator::rollup_filtered(&active_table, filters, key) {
            let kpis = row.sums.summary();
            println!(
                "  {:<28} sales {:>14.0} | ROAS {:.2}x | conv {:>8}",
                row.key.to_string(),
                kpis.total_sales,
                kpis.roas,
                kpis.total_conversions
            );
        }
    }
    Ok(())
}

fn describe_filters(filters: &DimensionFilters) -> String {
    if filters.is_unrestricted() {
        return "none".into();
    }
    [
        ("city", &filters.city),
        ("platform", &filters.platform),
        ("brand", &filters.brand),
        ("sku", &filters.sku),
    ]
    .iter()
    .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}={v}")))
    .collect::<Vec<_>>()
    .join(", ")
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
