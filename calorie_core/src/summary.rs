//! Daily intake summary against the calorie target.

use crate::FoodEntry;
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

/// Totals for a single calendar day
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DailySummary {
    pub day: Option<NaiveDate>,
    pub entry_count: usize,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub target: Option<f64>,
}

impl DailySummary {
    /// Calories left before reaching the target (negative when over)
    pub fn remaining(&self) -> Option<f64> {
        self.target.map(|t| t - self.calories)
    }

    /// Fraction of the target consumed so far
    pub fn progress(&self) -> Option<f64> {
        self.target.filter(|t| *t > 0.0).map(|t| self.calories / t)
    }

    pub fn is_over_target(&self) -> bool {
        self.remaining().map(|r| r < 0.0).unwrap_or(false)
    }
}

/// Sum the entries logged on `day` (in `tz`)
pub fn summarize<'a, Tz, I>(entries: I, target: Option<f64>, day: NaiveDate, tz: &Tz) -> DailySummary
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a FoodEntry>,
{
    let mut summary = DailySummary {
        day: Some(day),
        target,
        ..Default::default()
    };

    for entry in entries {
        if !entry.is_on(day, tz) {
            continue;
        }
        summary.entry_count += 1;
        summary.calories += entry.calories;
        summary.protein += entry.protein;
        summary.carbs += entry.carbs;
        summary.fats += entry.fats;
    }

    summary
}
