//! Derivation of aggregate metrics from filtered records.
//!
//! All functions are pure; both metric blocks are independently computable
//! and a zero-activity input is a valid, fully-computed state.

use crate::{CommitRecord, UsageDayRecord};
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::BTreeMap;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MonthCount {
    pub month: u32,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DayOfWeekCount {
    pub day: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FileCount {
    pub file: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CommitSummary {
    pub date: NaiveDate,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistoryMetrics {
    pub total_commits: i64,
    pub lines_added: i64,
    pub lines_deleted: i64,
    pub net_lines: i64,
    /// Sparse: only months with at least one commit, in calendar order.
    pub monthly_counts: Vec<MonthCount>,
    /// Always 7 entries, Monday through Sunday, zeros included.
    pub day_of_week_counts: Vec<DayOfWeekCount>,
    /// At most 5, count descending, ties broken by ascending hour.
    pub top_hours: Vec<HourCount>,
    pub bug_fix_count: i64,
    pub feature_count: i64,
    pub assisted_commit_count: i64,
    /// Percentage of assisted commits, one decimal; 0.0 when no commits.
    pub assisted_percentage: f64,
    /// At most 5, edit count descending, ties broken by filename.
    pub top_files: Vec<FileCount>,
    /// At most 5, commit count descending, ties broken by ascending date.
    pub top_days: Vec<DayCount>,
    pub unique_active_days: i64,
    pub first_commit: Option<CommitSummary>,
    pub last_commit: Option<CommitSummary>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ModelTokens {
    pub model: String,
    pub tokens: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MostActiveDay {
    pub date: NaiveDate,
    pub message_count: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UsageMetrics {
    pub total_tokens: i64,
    pub total_messages: i64,
    pub total_tool_calls: i64,
    pub total_sessions: i64,
    /// Display name of the last model seen with nonzero tokens while
    /// iterating days chronologically. Not the token-ranked maximum.
    pub dominant_model: String,
    /// Per-model token totals, descending, ties broken by model name.
    pub tokens_by_model: Vec<ModelTokens>,
    pub most_active_day: Option<MostActiveDay>,
}

pub fn aggregate_history(commits: &[CommitRecord]) -> HistoryMetrics {
    let mut monthly = [0i64; 12];
    let mut weekdays = [0i64; 7];
    let mut hours = [0i64; 24];
    let mut file_counts: BTreeMap<String, i64> = BTreeMap::new();
    let mut day_counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();

    let mut lines_added = 0i64;
    let mut lines_deleted = 0i64;
    let mut bug_fix_count = 0i64;
    let mut feature_count = 0i64;
    let mut assisted_commit_count = 0i64;
    let mut first: Option<&CommitRecord> = None;
    let mut last: Option<&CommitRecord> = None;

    for commit in commits {
        let date = commit.timestamp.date();
        monthly[date.month0() as usize] += 1;
        weekdays[date.weekday().num_days_from_monday() as usize] += 1;
        hours[commit.timestamp.hour() as usize] += 1;
        *day_counts.entry(date).or_insert(0) += 1;

        for file in &commit.files_touched {
            *file_counts.entry(file.clone()).or_insert(0) += 1;
        }

        lines_added += commit.lines_added.max(0);
        lines_deleted += commit.lines_deleted.max(0);

        let subject = commit.subject().to_lowercase();
        if subject.contains("fix") || subject.contains("bug") {
            bug_fix_count += 1;
        }
        if subject.contains("feat") || subject.contains("add") || subject.contains("implement") {
            feature_count += 1;
        }
        if commit.assisted {
            assisted_commit_count += 1;
        }

        if first.is_none_or(|f| commit.timestamp < f.timestamp) {
            first = Some(commit);
        }
        if last.is_none_or(|l| commit.timestamp > l.timestamp) {
            last = Some(commit);
        }
    }

    let total_commits = commits.len() as i64;
    let assisted_percentage = if total_commits > 0 {
        let raw = assisted_commit_count as f64 / total_commits as f64 * 100.0;
        (raw * 10.0).round() / 10.0
    } else {
        0.0
    };

    let monthly_counts = monthly
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(index, &count)| MonthCount {
            month: index as u32 + 1,
            count,
        })
        .collect();

    let day_of_week_counts = WEEKDAY_NAMES
        .iter()
        .zip(weekdays.iter())
        .map(|(day, &count)| DayOfWeekCount {
            day: (*day).to_string(),
            count,
        })
        .collect();

    let mut top_hours: Vec<HourCount> = hours
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(hour, &count)| HourCount {
            hour: hour as u32,
            count,
        })
        .collect();
    top_hours.sort_by(|a, b| b.count.cmp(&a.count).then(a.hour.cmp(&b.hour)));
    top_hours.truncate(TOP_N);

    let mut top_files: Vec<FileCount> = file_counts
        .into_iter()
        .map(|(file, count)| FileCount { file, count })
        .collect();
    top_files.sort_by(|a, b| b.count.cmp(&a.count).then(a.file.cmp(&b.file)));
    top_files.truncate(TOP_N);

    let unique_active_days = day_counts.len() as i64;
    let mut top_days: Vec<DayCount> = day_counts
        .into_iter()
        .map(|(date, count)| DayCount { date, count })
        .collect();
    top_days.sort_by(|a, b| b.count.cmp(&a.count).then(a.date.cmp(&b.date)));
    top_days.truncate(TOP_N);

    HistoryMetrics {
        total_commits,
        lines_added,
        lines_deleted,
        net_lines: lines_added - lines_deleted,
        monthly_counts,
        day_of_week_counts,
        top_hours,
        bug_fix_count,
        feature_count,
        assisted_commit_count,
        assisted_percentage,
        top_files,
        top_days,
        unique_active_days,
        first_commit: first.map(summary_of),
        last_commit: last.map(summary_of),
    }
}

fn summary_of(commit: &CommitRecord) -> CommitSummary {
    CommitSummary {
        date: commit.timestamp.date(),
        subject: commit.subject().to_string(),
    }
}

pub fn aggregate_usage(days: &[UsageDayRecord]) -> UsageMetrics {
    let mut sorted: Vec<&UsageDayRecord> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let mut total_tokens = 0i64;
    let mut total_messages = 0i64;
    let mut total_tool_calls = 0i64;
    let mut total_sessions = 0i64;
    let mut model_totals: BTreeMap<String, i64> = BTreeMap::new();
    let mut dominant_raw: Option<&str> = None;
    let mut most_active: Option<MostActiveDay> = None;

    for day in &sorted {
        total_messages += day.message_count.max(0);
        total_tool_calls += day.tool_call_count.max(0);
        total_sessions += day.session_count.max(0);

        for (model, &tokens) in &day.tokens_by_model {
            let tokens = tokens.max(0);
            total_tokens += tokens;
            *model_totals.entry(model.clone()).or_insert(0) += tokens;
            if tokens > 0 {
                dominant_raw = Some(model);
            }
        }

        let is_strictly_greater = most_active
            .as_ref()
            .is_none_or(|best| day.message_count > best.message_count);
        if day.message_count > 0 && is_strictly_greater {
            most_active = Some(MostActiveDay {
                date: day.date,
                message_count: day.message_count,
            });
        }
    }

    let mut tokens_by_model: Vec<ModelTokens> = model_totals
        .into_iter()
        .map(|(model, tokens)| ModelTokens { model, tokens })
        .collect();
    tokens_by_model.sort_by(|a, b| b.tokens.cmp(&a.tokens).then(a.model.cmp(&b.model)));

    UsageMetrics {
        total_tokens,
        total_messages,
        total_tool_calls,
        total_sessions,
        dominant_model: dominant_raw
            .map(display_model_name)
            .unwrap_or_else(|| "Unknown".to_string()),
        tokens_by_model,
        most_active_day: most_active,
    }
}

/// Normalize a raw model identifier for display: one trailing `-<digits>`
/// version/date suffix is stripped and the vendor prefix is expanded.
pub fn display_model_name(model: &str) -> String {
    let base = strip_version_suffix(model);
    let lower = base.to_lowercase();

    if let Some(rest) = lower.strip_prefix("claude-") {
        return format!("Claude {}", title_words(rest));
    }
    if let Some(rest) = lower.strip_prefix("gpt-") {
        return format!("GPT-{}", rest);
    }
    if let Some(rest) = lower.strip_prefix("gemini-") {
        return format!("Gemini {}", title_words(rest));
    }

    title_words(&lower)
}

fn strip_version_suffix(model: &str) -> &str {
    if let Some(last_dash) = model.rfind('-') {
        let tail = &model[last_dash + 1..];
        if !tail.is_empty() && tail.chars().all(|ch| ch.is_ascii_digit()) {
            return &model[..last_dash];
        }
    }
    model
}

fn title_words(s: &str) -> String {
    s.split(['-', '_', '.', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut result = String::new();
    result.extend(first.to_uppercase());
    result.push_str(chars.as_str());
    result
}
