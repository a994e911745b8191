//! Shopping trip schedule
//!
//! Counts the shopping trips left in the current calendar month. Trips fall
//! on fixed weekdays; once the cutoff hour has passed on a shopping day,
//! that day's trip counts as already taken.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Datelike, Local, Months, NaiveDate, Timelike, Weekday};

use crate::config::ScheduleConfig;

/// Hour of day after which today's trip counts as taken
pub const DEFAULT_CUTOFF_HOUR: u32 = 17;

/// Which weekdays shopping happens on, and when a day stops counting
#[derive(Debug, Clone)]
pub struct TripSchedule {
    weekdays: Vec<Weekday>,
    cutoff_hour: u32,
}

impl Default for TripSchedule {
    fn default() -> Self {
        Self {
            weekdays: vec![Weekday::Wed, Weekday::Sat],
            cutoff_hour: DEFAULT_CUTOFF_HOUR,
        }
    }
}

impl TripSchedule {
    pub fn new(weekdays: Vec<Weekday>, cutoff_hour: u32) -> Self {
        Self { weekdays, cutoff_hour }
    }

    /// Build a schedule from the `[schedule]` config section
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        if config.shopping_weekdays.is_empty() {
            bail!("At least one shopping weekday must be configured");
        }
        if config.cutoff_hour > 23 {
            bail!("Cutoff hour {} is out of range (0-23)", config.cutoff_hour);
        }

        let weekdays = config
            .shopping_weekdays
            .iter()
            .map(|name| {
                name.parse::<Weekday>()
                    .map_err(|_| anyhow!("Invalid shopping weekday '{}'", name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(weekdays, config.cutoff_hour))
    }

    pub fn is_shopping_day(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// Count the shopping trips left between `now` and the end of the month
    pub fn remaining_trips(&self, now: DateTime<Local>) -> u32 {
        self.remaining_trips_on(now.date_naive(), now.hour())
    }

    /// Date/hour form of [`remaining_trips`](Self::remaining_trips)
    ///
    /// Counts from today inclusive, except when today is a shopping weekday
    /// and `hour` has reached the cutoff; then counting starts tomorrow.
    pub fn remaining_trips_on(&self, today: NaiveDate, hour: u32) -> u32 {
        let last_day = last_day_of_month(today);

        let start = if self.is_shopping_day(today.weekday()) && hour >= self.cutoff_hour {
            match today.succ_opt() {
                Some(tomorrow) => tomorrow,
                None => return 0,
            }
        } else {
            today
        };

        let mut trips = 0;
        let mut day = start;
        while day <= last_day {
            if self.is_shopping_day(day.weekday()) {
                trips += 1;
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        trips
    }
}

impl std::fmt::Display for TripSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days = self
            .weekdays
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} (cutoff {:02}:00)", days, self.cutoff_hour)
    }
}

/// Last calendar day of the month `date` falls in
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .unwrap_or(date)
}
