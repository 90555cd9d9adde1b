//! Tolerant conversion of raw collector output into typed records.
//!
//! Malformed rows are dropped, never fatal. Numeric fields that fail to
//! parse default to 0; a row without a parseable date cannot be bucketed
//! and is dropped.

use crate::{CommitRecord, UsageDayRecord, UsageLog};
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;

/// Record separator emitted by the git collector's pretty format.
pub const RECORD_SEP: char = '\u{1e}';
/// Field separator emitted by the git collector's pretty format.
pub const FIELD_SEP: char = '\u{1f}';

/// Parse the raw text of a single `git log` invocation into commit records.
///
/// Expected layout per record (see `collect::git`):
/// `\x1e<author date, ISO 8601>\x1f<full message>\x1f` followed by numstat
/// lines (`added<TAB>deleted<TAB>path`). Binary-file counts (`-`) become 0.
pub fn parse_commit_log(raw: &str) -> Vec<CommitRecord> {
    let mut commits = Vec::new();

    for chunk in raw.split(RECORD_SEP) {
        if chunk.trim().is_empty() {
            continue;
        }

        let mut fields = chunk.splitn(3, FIELD_SEP);
        let (Some(date_raw), Some(message), Some(tail)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        let Ok(timestamp) = DateTime::parse_from_rfc3339(date_raw.trim()) else {
            continue;
        };

        let mut lines_added = 0i64;
        let mut lines_deleted = 0i64;
        let mut files_touched = Vec::new();

        for line in tail.lines() {
            let mut cols = line.splitn(3, '\t');
            let (Some(added), Some(deleted), Some(path)) =
                (cols.next(), cols.next(), cols.next())
            else {
                continue;
            };
            if path.is_empty() {
                continue;
            }

            lines_added += parse_count(added);
            lines_deleted += parse_count(deleted);
            files_touched.push(file_basename(path));
        }

        let message = message.trim().to_string();
        let assisted = message.to_lowercase().contains("co-authored-by:");

        commits.push(CommitRecord {
            timestamp: timestamp.naive_local(),
            assisted,
            message,
            lines_added,
            lines_deleted,
            files_touched,
        });
    }

    commits
}

/// Merge the two raw usage-log row sets into per-day records.
///
/// Activity rows establish the days; per-model token rows are joined on the
/// same calendar date. Token rows for days without activity still count
/// (a day can burn tokens without a logged message).
pub fn parse_usage_days(log: &UsageLog) -> Vec<UsageDayRecord> {
    let mut days: BTreeMap<NaiveDate, UsageDayRecord> = BTreeMap::new();

    for row in &log.daily_activity {
        let Some(date) = row.date.as_deref().and_then(parse_day) else {
            continue;
        };
        let entry = days.entry(date).or_insert_with(|| empty_day(date));
        entry.message_count += row.message_count.unwrap_or(0).max(0);
        entry.tool_call_count += row.tool_call_count.unwrap_or(0).max(0);
        entry.session_count += row.session_count.unwrap_or(0).max(0);
    }

    for row in &log.daily_model_tokens {
        let Some(date) = row.date.as_deref().and_then(parse_day) else {
            continue;
        };
        let entry = days.entry(date).or_insert_with(|| empty_day(date));
        for (model, tokens) in &row.tokens_by_model {
            *entry.tokens_by_model.entry(model.clone()).or_insert(0) += (*tokens).max(0);
        }
    }

    days.into_values().collect()
}

fn empty_day(date: NaiveDate) -> UsageDayRecord {
    UsageDayRecord {
        date,
        message_count: 0,
        tool_call_count: 0,
        session_count: 0,
        tokens_by_model: BTreeMap::new(),
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // Tolerate full timestamps by keeping only the date part.
    let day = trimmed.get(..10).unwrap_or(trimmed);
    day.parse::<NaiveDate>().ok()
}

fn parse_count(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0).max(0)
}

fn file_basename(path: &str) -> String {
    let cleaned = path.trim();
    cleaned
        .rsplit('/')
        .next()
        .unwrap_or(cleaned)
        .trim_end_matches('}')
        .to_string()
}
