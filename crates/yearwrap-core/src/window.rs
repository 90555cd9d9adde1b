//! Calendar-year window filtering.
//!
//! Both data sources are restricted to the same inclusive window
//! `[year-01-01, year-12-31]`, judged on each record's own calendar day,
//! so cross-source ratios are computed over identical ranges.

use crate::{CommitRecord, UsageDayRecord};
use chrono::NaiveDate;

/// True iff `date` falls within the inclusive calendar-year window.
pub fn in_year(date: NaiveDate, year: i32) -> bool {
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return false;
    };
    date >= start && date <= end
}

pub fn commits_in_year(commits: Vec<CommitRecord>, year: i32) -> Vec<CommitRecord> {
    commits
        .into_iter()
        .filter(|c| in_year(c.timestamp.date(), year))
        .collect()
}

pub fn usage_days_in_year(days: Vec<UsageDayRecord>, year: i32) -> Vec<UsageDayRecord> {
    days.into_iter().filter(|d| in_year(d.date, year)).collect()
}
