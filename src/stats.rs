use crate::models::{StatsResponse, TrackerData};
use std::collections::{BTreeMap, BTreeSet};

pub fn build_stats(data: &TrackerData) -> StatsResponse {
    StatsResponse {
        habit_totals: habit_totals(data),
        daily_scores: daily_scores(data),
        completion_rates: completion_rates(data),
        months: months(data),
    }
}

/// Number of days on which each currently existing habit was completed.
/// Names in the history whose habit has since been deleted are skipped, and
/// a day counts once no matter how often it lists the name.
pub fn habit_totals(data: &TrackerData) -> BTreeMap<String, u64> {
    data.habits
        .keys()
        .map(|name| {
            let count = data
                .checked
                .values()
                .filter(|names| names.contains(name))
                .count() as u64;
            (name.clone(), count)
        })
        .collect()
}

/// Points earned per recorded day, valued at the habits' *current* point
/// values. A deleted habit therefore contributes 0 to every past day.
pub fn daily_scores(data: &TrackerData) -> BTreeMap<String, i64> {
    data.checked
        .iter()
        .map(|(date, names)| {
            let total: i64 = names
                .iter()
                .filter_map(|name| data.habits.get(name))
                .map(|points| i64::from(*points))
                .sum();
            (date.clone(), total)
        })
        .collect()
}

/// Percentage of recorded days on which each habit was completed. The
/// denominator is every date key in `checked`, including days with an empty
/// completion list.
pub fn completion_rates(data: &TrackerData) -> BTreeMap<String, f64> {
    let total_days = data.checked.len();
    habit_totals(data)
        .into_iter()
        .map(|(name, count)| {
            let rate = if total_days == 0 {
                0.0
            } else {
                count as f64 / total_days as f64 * 100.0
            };
            (name, rate)
        })
        .collect()
}

/// Completion lists for every recorded day in the given `YYYY-MM` month.
pub fn calendar_view(data: &TrackerData, month: &str) -> BTreeMap<String, Vec<String>> {
    data.checked
        .iter()
        .filter(|(date, _)| date.starts_with(month))
        .map(|(date, names)| (date.clone(), names.clone()))
        .collect()
}

/// Distinct `YYYY-MM` prefixes of the recorded days, newest first.
pub fn months(data: &TrackerData) -> Vec<String> {
    let months: BTreeSet<String> = data
        .checked
        .keys()
        .filter_map(|date| date.get(..7))
        .map(str::to_string)
        .collect();
    months.into_iter().rev().collect()
}
