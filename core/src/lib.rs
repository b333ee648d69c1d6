//! Scenario analytics core: a seeded synthetic fact-table generator for
//! a baseline and an engine-active marketing regime, plus the KPI
//! aggregation that compares them.

pub mod aggregator;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod insights;
pub mod planner;
pub mod record;
pub mod rng;
pub mod types;
