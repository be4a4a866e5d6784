//! Summary statistics over a link's click history.
//!
//! Pure computation over a borrowed slice: no I/O and no failure modes. Callers pass
//! clicks newest first and the summary's `recent_clicks` keeps that order.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::collections::HashMap;

use crate::domain::entities::Click;

/// Entries kept in each top-N ranking.
pub const TOP_N: usize = 5;

/// Clicks kept in `recent_clicks`.
pub const RECENT_LIMIT: usize = 10;

const ROLLING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct ClickSummary {
    pub total_clicks: u64,
    pub today_clicks: u64,
    pub last_7_days_clicks: u64,
    pub top_referrers: Vec<(String, u64)>,
    pub top_countries: Vec<(String, u64)>,
    pub recent_clicks: Vec<Click>,
}

/// Summarizes clicks using the process-local calendar for "today".
pub fn summarize(clicks: &[Click], as_of: DateTime<Utc>) -> ClickSummary {
    summarize_in(clicks, as_of, &Local)
}

/// Summarizes clicks using the calendar of `tz` for "today".
///
/// "Last 7 days" is a rolling window: `clicked_at >= as_of - 7 days`.
pub fn summarize_in<Tz: TimeZone>(clicks: &[Click], as_of: DateTime<Utc>, tz: &Tz) -> ClickSummary {
    let today = as_of.with_timezone(tz).date_naive();
    let week_start = as_of - chrono::Duration::days(ROLLING_WINDOW_DAYS);

    let today_clicks = clicks
        .iter()
        .filter(|c| c.clicked_at.with_timezone(tz).date_naive() == today)
        .count() as u64;
    let last_7_days_clicks = clicks.iter().filter(|c| c.clicked_at >= week_start).count() as u64;

    ClickSummary {
        total_clicks: clicks.len() as u64,
        today_clicks,
        last_7_days_clicks,
        top_referrers: top_values(clicks.iter().map(|c| c.referer.as_deref()), TOP_N),
        top_countries: top_values(clicks.iter().map(|c| c.country.as_deref()), TOP_N),
        recent_clicks: clicks.iter().take(RECENT_LIMIT).cloned().collect(),
    }
}

/// Counts non-empty values and returns the `n` most frequent.
///
/// Ties keep the order in which each value first appeared.
fn top_values<'a>(values: impl Iterator<Item = Option<&'a str>>, n: usize) -> Vec<(String, u64)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, u64)> = Vec::new();

    for value in values.flatten().filter(|v| !v.is_empty()) {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}
