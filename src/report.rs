use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::FoodEntry;

/// All entries for one date, with the daily calorie total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub entries: Vec<FoodEntry>,
    pub total_calories: u64,
}

/// The full log grouped by date, ascending, with the grand total across
/// all dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    pub days: Vec<DaySummary>,
    pub grand_total: u64,
}

impl LogSummary {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Groups entries by date and computes daily and grand totals. Dates come
/// out ascending; insertion order within a date is preserved.
pub fn summarize(entries: &[FoodEntry]) -> LogSummary {
    let mut by_date: BTreeMap<NaiveDate, Vec<FoodEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry.clone());
    }

    let mut days = Vec::with_capacity(by_date.len());
    let mut grand_total = 0u64;
    for (date, entries) in by_date {
        let total_calories: u64 = entries.iter().map(|e| u64::from(e.calories)).sum();
        grand_total += total_calories;
        days.push(DaySummary {
            date,
            entries,
            total_calories,
        });
    }

    LogSummary { days, grand_total }
}

impl fmt::Display for LogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in &self.days {
            writeln!(f, "{} - Total: {} Cal", day.date, day.total_calories)?;
            for entry in &day.entries {
                writeln!(f, "  - {}: {} Cal", entry.food_item, entry.calories)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "Grand Total: {} Cal", self.grand_total)?;

        Ok(())
    }
}
