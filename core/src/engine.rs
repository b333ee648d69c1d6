//! The scenario engine: application context for the analytics core.
//!
//! Owns everything that would otherwise be process-global:
//!   - the configuration (both regimes),
//!   - the RNG bank (one stream per regime and generation epoch),
//!   - the reporting clock ("today" and the trailing window),
//!   - the fact-table cache.
//!
//! RULES:
//!   - Tables are generated only through `generate_at`.
//!   - A cache hit hands back the same `Arc<FactTable>`; nobody mutates it.
//!   - Each regeneration of a regime advances that regime's epoch.

use crate::{
    cache::FactTableCache,
    clock::ReportingClock,
    config::ScenarioConfig,
    error::ScenarioResult,
    generator::ScenarioGenerator,
    record::FactTable,
    rng::{RngBank, ScenarioRng},
    types::RegimeKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct ScenarioEngine {
    pub config:   ScenarioConfig,
    pub clock:    ReportingClock,
    pub rng_bank: RngBank,
    cache:        FactTableCache,
    epochs:       HashMap<RegimeKind, u64>,
}

impl ScenarioEngine {
    /// Fails on invalid regime parameters; nothing is generated yet.
    pub fn new(config: ScenarioConfig, clock: ReportingClock) -> ScenarioResult<Self> {
        config.validate()?;
        clock.validate()?;
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            cache:    FactTableCache::new(Duration::from_secs(config.cache_ttl_secs)),
            epochs:   HashMap::new(),
            clock,
            config,
        })
    }

    /// Engine over the system date with the given config.
    pub fn build(config: ScenarioConfig) -> ScenarioResult<Self> {
        let clock = ReportingClock::system(config.window_days);
        Self::new(config, clock)
    }

    /// Built-in regimes, a caller seed and a pinned "today".
    pub fn build_test(seed: u64, today: chrono::NaiveDate) -> ScenarioResult<Self> {
        let config = ScenarioConfig {
            seed,
            ..ScenarioConfig::default()
        };
        let clock = ReportingClock::pinned(today, config.window_days);
        Self::new(config, clock)
    }

    /// `engine_active` selects the regime, exactly as the dashboard toggle does.
    pub fn generate(&mut self, engine_active: bool) -> ScenarioResult<Arc<FactTable>> {
        self.generate_kind(RegimeKind::from_flag(engine_active))
    }

    pub fn generate_kind(&mut self, kind: RegimeKind) -> ScenarioResult<Arc<FactTable>> {
        self.generate_at(kind, Instant::now())
    }

    /// Cached table for `kind` as of `now`, generating it on a miss.
    pub fn generate_at(&mut self, kind: RegimeKind, now: Instant) -> ScenarioResult<Arc<FactTable>> {
        if let Some(table) = self.cache.get(kind, now) {
            log::debug!("engine: cache hit for {kind} (table {})", table.id);
            return Ok(table);
        }

        // A rejected regime must not use up an epoch.
        self.config.regime(kind).validate(kind.name())?;
        self.clock.refresh();
        let window = self.clock.window();
        let mut rng = self.next_stream(kind);
        let table = ScenarioGenerator::new(kind, self.config.regime(kind))?
            .generate(&window, &mut rng)?;
        let table = Arc::new(table);

        log::info!(
            "engine: generated {kind} table {} ({} rows, {} → {})",
            table.id,
            table.len(),
            window.first().map(|d| d.to_string()).unwrap_or_default(),
            window.last().map(|d| d.to_string()).unwrap_or_default(),
        );

        self.cache.put(Arc::clone(&table), now);
        Ok(table)
    }

    /// Both tables, baseline first.
    pub fn generate_pair(&mut self) -> ScenarioResult<(Arc<FactTable>, Arc<FactTable>)> {
        let now = Instant::now();
        let baseline = self.generate_at(RegimeKind::Baseline, now)?;
        let active = self.generate_at(RegimeKind::EngineActive, now)?;
        Ok((baseline, active))
    }

    /// Drop a regime's table so the next call regenerates it.
    pub fn invalidate(&mut self, kind: RegimeKind) -> bool {
        self.cache.invalidate(kind)
    }

    pub fn evict_expired(&mut self, now: Instant) -> usize {
        self.cache.evict_expired(now)
    }

    pub fn cached_regimes(&self) -> usize {
        self.cache.len()
    }

    /// How many tables have been generated for `kind` so far.
    pub fn epoch(&self, kind: RegimeKind) -> u64 {
        self.epochs.get(&kind).copied().unwrap_or(0)
    }

    /// Stream for the planner's draws.
    pub fn planner_rng(&self) -> ScenarioRng {
        self.rng_bank.for_planner()
    }

    fn next_stream(&mut self, kind: RegimeKind) -> ScenarioRng {
        let epoch = self.epochs.entry(kind).or_insert(0);
        let rng = self.rng_bank.for_regime_at_epoch(kind, *epoch);
        *epoch += 1;
        rng
    }
}
