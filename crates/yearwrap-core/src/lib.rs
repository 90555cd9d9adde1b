#![deny(clippy::all)]

mod achievements;
mod aggregator;
mod parser;
mod report;
pub mod collect;
pub mod window;

pub use achievements::*;
pub use aggregator::*;
pub use parser::*;
pub use report::*;

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use thiserror::Error;

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Debug, Error)]
pub enum WrapError {
    #[error("git history required but unavailable: {0}")]
    HistoryRequired(String),
    #[error("usage log required but unavailable: {0}")]
    UsageRequired(String),
    #[error("no git history or usage data found for {year}")]
    NoData { year: i32 },
    #[error("collector failed: {0}")]
    Collector(String),
}

/// Which data sources the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    Full,
    HistoryOnly,
    UsageOnly,
}

/// One commit inside the requested window. Produced by the history
/// collector, consumed immediately by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub timestamp: NaiveDateTime,
    pub assisted: bool,
    pub message: String,
    pub lines_added: i64,
    pub lines_deleted: i64,
    pub files_touched: Vec<String>,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}

/// One day of assistant usage, already merged from the raw activity and
/// per-model token rows.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageDayRecord {
    pub date: NaiveDate,
    pub message_count: i64,
    pub tool_call_count: i64,
    pub session_count: i64,
    pub tokens_by_model: BTreeMap<String, i64>,
}

/// Raw usage-log rows as the collector hands them over. Field-level
/// absence is preserved; the parser decides what is usable.
#[derive(Debug, Clone, Default)]
pub struct UsageLog {
    pub daily_activity: Vec<RawActivityRow>,
    pub daily_model_tokens: Vec<RawModelTokensRow>,
}

#[derive(Debug, Clone, Default)]
pub struct RawActivityRow {
    pub date: Option<String>,
    pub message_count: Option<i64>,
    pub tool_call_count: Option<i64>,
    pub session_count: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct RawModelTokensRow {
    pub date: Option<String>,
    pub tokens_by_model: BTreeMap<String, i64>,
}

/// Pipeline stages, reported to an optional progress sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Filtering,
    Aggregating,
    Scoring,
    Building,
}

/// Injectable progress reporting. The pipeline notifies stage changes;
/// correctness never depends on an implementation listening.
pub trait ProgressSink {
    fn on_stage(&self, _stage: Stage) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub year: i32,
    pub mode: ReportMode,
    pub title: Option<String>,
    pub repo_name: Option<String>,
}

/// Run the full pipeline: window filter, usage parsing, aggregation,
/// achievement scoring, report assembly.
///
/// `history` is `None` when the caller is not inside a tracked repository
/// (or the mode excludes history); `usage` is `None` when no usage log was
/// found. An empty-after-filtering source yields an absent metrics block,
/// not an error, unless the mode requires that source.
pub fn generate_report(
    history: Option<Vec<CommitRecord>>,
    usage: Option<UsageLog>,
    request: &ReportRequest,
    progress: &dyn ProgressSink,
) -> Result<ReportModel, WrapError> {
    progress.on_stage(Stage::Filtering);

    let commits = history.map(|c| window::commits_in_year(c, request.year));
    let days = usage.map(|log| {
        let records = parser::parse_usage_days(&log);
        window::usage_days_in_year(records, request.year)
    });

    progress.on_stage(Stage::Aggregating);

    let history_metrics = commits
        .filter(|c| !c.is_empty())
        .map(|c| aggregator::aggregate_history(&c));
    let usage_metrics = days
        .filter(|d| !d.is_empty())
        .map(|d| aggregator::aggregate_usage(&d));

    progress.on_stage(Stage::Scoring);

    let achievements =
        achievements::evaluate_achievements(history_metrics.as_ref(), usage_metrics.as_ref());

    progress.on_stage(Stage::Building);

    report::build_report_model(
        request.year,
        request.mode,
        request.title.as_deref(),
        request.repo_name.as_deref(),
        history_metrics,
        usage_metrics,
        achievements,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn commit(date: &str, hour: u32, message: &str) -> CommitRecord {
        CommitRecord {
            timestamp: date
                .parse::<NaiveDate>()
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            assisted: message.contains("Co-Authored-By"),
            message: message.to_string(),
            lines_added: 10,
            lines_deleted: 2,
            files_touched: vec!["main.rs".to_string()],
        }
    }

    fn request(mode: ReportMode) -> ReportRequest {
        ReportRequest {
            year: 2025,
            mode,
            title: None,
            repo_name: Some("demo".to_string()),
        }
    }

    #[test]
    fn test_generate_report_history_only() {
        let commits = vec![
            commit("2025-01-10", 9, "feat: add parser"),
            commit("2025-02-11", 14, "fix: off by one"),
        ];
        let model = generate_report(
            Some(commits),
            None,
            &request(ReportMode::HistoryOnly),
            &NoProgress,
        )
        .unwrap();

        assert_eq!(model.year, 2025);
        assert!(model.history.is_some());
        assert!(model.usage.is_none());
        assert!(!model.achievements.is_empty());
    }

    #[test]
    fn test_generate_report_no_data_is_error() {
        let err = generate_report(None, None, &request(ReportMode::Full), &NoProgress)
            .unwrap_err();
        assert!(matches!(err, WrapError::NoData { year: 2025 }));
    }

    #[test]
    fn test_generate_report_empty_history_with_usage_is_ok() {
        let mut log = UsageLog::default();
        log.daily_activity.push(RawActivityRow {
            date: Some("2025-03-01".to_string()),
            message_count: Some(12),
            tool_call_count: Some(3),
            session_count: Some(1),
        });

        let model = generate_report(
            Some(Vec::new()),
            Some(log),
            &request(ReportMode::Full),
            &NoProgress,
        )
        .unwrap();

        assert!(model.history.is_none());
        assert!(model.usage.is_some());
    }

    #[test]
    fn test_generate_report_out_of_window_commits_are_absent() {
        let commits = vec![commit("2024-12-31", 23, "late commit")];
        let err = generate_report(
            Some(commits),
            None,
            &request(ReportMode::HistoryOnly),
            &NoProgress,
        )
        .unwrap_err();
        assert!(matches!(err, WrapError::HistoryRequired(_)));
    }

    #[test]
    fn test_generate_report_is_idempotent() {
        let commits = vec![
            commit("2025-01-10", 9, "feat: add parser"),
            commit("2025-01-10", 23, "fix: bug in parser\n\nCo-Authored-By: Assistant"),
        ];
        let a = generate_report(
            Some(commits.clone()),
            None,
            &request(ReportMode::HistoryOnly),
            &NoProgress,
        )
        .unwrap();
        let b = generate_report(
            Some(commits),
            None,
            &request(ReportMode::HistoryOnly),
            &NoProgress,
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
