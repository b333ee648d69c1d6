//! Reporting clock. Owns "today" and the trailing date window.

use crate::error::{ScenarioError, ScenarioResult};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// One leap year of daily rows.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Rejects windows outside `1..=MAX_WINDOW_DAYS`.
pub fn check_window_days(days: u32) -> ScenarioResult<()> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(ScenarioError::InvalidWindow { days, max: MAX_WINDOW_DAYS });
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportingClock {
    pub today:       NaiveDate,
    pub window_days: u32,
    /// Pinned clocks never follow the system date.
    pub pinned:      bool,
}

impl ReportingClock {
    /// Follows the system's local date.
    pub fn system(window_days: u32) -> Self {
        Self {
            today: Local::now().date_naive(),
            window_days,
            pinned: false,
        }
    }

    /// Fixed "today". Tests use this so windows are reproducible.
    pub fn pinned(today: NaiveDate, window_days: u32) -> Self {
        Self {
            today,
            window_days,
            pinned: true,
        }
    }

    /// Re-read the system date unless pinned.
    pub fn refresh(&mut self) {
        if !self.pinned {
            self.today = Local::now().date_naive();
        }
    }

    pub fn validate(&self) -> ScenarioResult<()> {
        check_window_days(self.window_days)
    }

    /// Trailing window ending today, inclusive, oldest first.
    /// Dates before the calendar's lower limit are skipped.
    pub fn window(&self) -> Vec<NaiveDate> {
        let days = u64::from(self.window_days.min(MAX_WINDOW_DAYS));
        (0..days)
            .rev()
            .filter_map(|back| self.today.checked_sub_days(Days::new(back)))
            .collect()
    }
}
