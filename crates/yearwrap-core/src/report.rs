//! Assembly of the final render-ready report model.

use crate::aggregator::capitalize_word;
use crate::{AchievementRecord, HistoryMetrics, ReportMode, UsageMetrics, WrapError};

/// Short tokens that render fully uppercased in titles.
const ACRONYMS: [&str; 14] = [
    "ai", "api", "cli", "css", "db", "html", "http", "id", "io", "json", "sdk", "sql", "ui",
    "url",
];

/// Everything a renderer needs. Immutable once built; absent metric blocks
/// stay `None` so renderers can omit whole sections.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReportModel {
    pub year: i32,
    pub title: String,
    pub mode: ReportMode,
    pub history: Option<HistoryMetrics>,
    pub usage: Option<UsageMetrics>,
    pub achievements: Vec<AchievementRecord>,
}

pub(crate) fn build_report_model(
    year: i32,
    mode: ReportMode,
    title_override: Option<&str>,
    repo_name: Option<&str>,
    history: Option<HistoryMetrics>,
    usage: Option<UsageMetrics>,
    achievements: Vec<AchievementRecord>,
) -> Result<ReportModel, WrapError> {
    if mode == ReportMode::HistoryOnly && history.is_none() {
        return Err(WrapError::HistoryRequired(format!(
            "no commits found for {}",
            year
        )));
    }
    if mode == ReportMode::UsageOnly && usage.is_none() {
        return Err(WrapError::UsageRequired(format!(
            "no usage activity found for {}",
            year
        )));
    }
    if history.is_none() && usage.is_none() {
        return Err(WrapError::NoData { year });
    }

    let title = match (title_override, mode) {
        (Some(t), _) => t.to_string(),
        (None, ReportMode::UsageOnly) => "Claude Code".to_string(),
        (None, _) => repo_name
            .map(humanize_title)
            .unwrap_or_else(|| "Your Code".to_string()),
    };

    Ok(ReportModel {
        year,
        title,
        mode,
        history,
        usage,
        achievements,
    })
}

/// Turn a repository directory name into a display title: kebab, snake,
/// dot and camelCase boundaries all become word breaks; known acronyms
/// are uppercased, other words capitalized.
pub fn humanize_title(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();

    for chunk in name.split(['-', '_', '.', ' ']) {
        if chunk.is_empty() {
            continue;
        }
        for word in split_camel(chunk) {
            let lower = word.to_lowercase();
            if ACRONYMS.contains(&lower.as_str()) {
                words.push(lower.to_uppercase());
            } else {
                words.push(capitalize_word(&lower));
            }
        }
    }

    words.join(" ")
}

fn split_camel(chunk: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in chunk.chars() {
        let boundary = ch.is_uppercase()
            && current
                .chars()
                .next_back()
                .is_some_and(|prev| prev.is_lowercase());
        if boundary {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_badge() -> Vec<AchievementRecord> {
        vec![AchievementRecord {
            icon: "🚀".to_string(),
            title: "Builder".to_string(),
            description: "Shipped code this year!".to_string(),
        }]
    }

    fn empty_history() -> HistoryMetrics {
        crate::aggregator::aggregate_history(&[])
    }

    fn empty_usage() -> UsageMetrics {
        crate::aggregator::aggregate_usage(&[])
    }

    // ========== build_report_model tests ==========

    #[test]
    fn test_history_only_without_history_fails() {
        let err = build_report_model(
            2025,
            ReportMode::HistoryOnly,
            None,
            Some("demo"),
            None,
            Some(empty_usage()),
            builder_badge(),
        )
        .unwrap_err();
        assert!(matches!(err, WrapError::HistoryRequired(_)));
    }

    #[test]
    fn test_usage_only_without_usage_fails() {
        let err = build_report_model(
            2025,
            ReportMode::UsageOnly,
            None,
            None,
            Some(empty_history()),
            None,
            builder_badge(),
        )
        .unwrap_err();
        assert!(matches!(err, WrapError::UsageRequired(_)));
    }

    #[test]
    fn test_both_absent_is_no_data() {
        let err = build_report_model(
            2025,
            ReportMode::Full,
            None,
            None,
            None,
            None,
            builder_badge(),
        )
        .unwrap_err();
        assert!(matches!(err, WrapError::NoData { year: 2025 }));
    }

    #[test]
    fn test_title_override_wins() {
        let model = build_report_model(
            2025,
            ReportMode::UsageOnly,
            Some("My Year"),
            Some("some-repo"),
            None,
            Some(empty_usage()),
            builder_badge(),
        )
        .unwrap();
        assert_eq!(model.title, "My Year");
    }

    #[test]
    fn test_usage_only_default_title() {
        let model = build_report_model(
            2025,
            ReportMode::UsageOnly,
            None,
            Some("ignored-repo"),
            None,
            Some(empty_usage()),
            builder_badge(),
        )
        .unwrap();
        assert_eq!(model.title, "Claude Code");
    }

    #[test]
    fn test_title_from_repo_name() {
        let model = build_report_model(
            2025,
            ReportMode::Full,
            None,
            Some("my-api-server"),
            Some(empty_history()),
            None,
            builder_badge(),
        )
        .unwrap();
        assert_eq!(model.title, "My API Server");
    }

    #[test]
    fn test_title_fallback_without_repo_name() {
        let model = build_report_model(
            2025,
            ReportMode::Full,
            None,
            None,
            Some(empty_history()),
            None,
            builder_badge(),
        )
        .unwrap();
        assert_eq!(model.title, "Your Code");
    }

    #[test]
    fn test_report_model_serializes_mode_kebab_case() {
        let model = build_report_model(
            2025,
            ReportMode::HistoryOnly,
            None,
            Some("demo"),
            Some(empty_history()),
            None,
            builder_badge(),
        )
        .unwrap();

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["mode"], "history-only");
        assert_eq!(json["year"], 2025);
        assert!(json["usage"].is_null());
        assert_eq!(json["achievements"][0]["title"], "Builder");
    }

    // ========== humanize_title tests ==========

    #[test]
    fn test_humanize_title_separators() {
        assert_eq!(humanize_title("my-cool-project"), "My Cool Project");
        assert_eq!(humanize_title("my_cool_project"), "My Cool Project");
        assert_eq!(humanize_title("my.cool.project"), "My Cool Project");
    }

    #[test]
    fn test_humanize_title_camel_case() {
        assert_eq!(humanize_title("myCoolProject"), "My Cool Project");
        assert_eq!(humanize_title("parserCombinator"), "Parser Combinator");
    }

    #[test]
    fn test_humanize_title_acronyms() {
        assert_eq!(humanize_title("json-api-cli"), "JSON API CLI");
        assert_eq!(humanize_title("html_renderer"), "HTML Renderer");
        assert_eq!(humanize_title("ai-sdk"), "AI SDK");
    }

    #[test]
    fn test_humanize_title_mixed() {
        assert_eq!(humanize_title("webUI-toolkit"), "Web UI Toolkit");
    }
}
