//! Rule-based achievement scoring over the aggregated metrics.
//!
//! Rules are evaluated in a fixed order against whichever metric blocks
//! are present; a rule whose inputs are absent is skipped. The fallback
//! guarantees the list is never empty.

use crate::{HistoryMetrics, UsageMetrics};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AchievementRecord {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl AchievementRecord {
    fn new(icon: &str, title: &str, description: String) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            description,
        }
    }
}

pub fn evaluate_achievements(
    history: Option<&HistoryMetrics>,
    usage: Option<&UsageMetrics>,
) -> Vec<AchievementRecord> {
    let mut earned = Vec::new();

    if let Some(u) = usage {
        if u.total_tokens >= 1_000_000_000 {
            earned.push(AchievementRecord::new(
                "🔥",
                "Token Titan",
                format!("Used over {} tokens", format_compact(u.total_tokens)),
            ));
        } else if u.total_tokens >= 1_000_000 {
            earned.push(AchievementRecord::new(
                "⚡",
                "Token Master",
                format!("Used over {} tokens", format_compact(u.total_tokens)),
            ));
        }

        if u.total_messages >= 10_000 {
            earned.push(AchievementRecord::new(
                "💬",
                "Conversation King",
                format!("{} messages exchanged", format_compact(u.total_messages)),
            ));
        }

        if u.total_tool_calls >= 5_000 {
            earned.push(AchievementRecord::new(
                "🛠️",
                "Tool Wielder",
                format!("{} tool calls made", format_compact(u.total_tool_calls)),
            ));
        }
    }

    if let Some(h) = history {
        if h.total_commits >= 500 {
            earned.push(AchievementRecord::new(
                "💯",
                "Commit Machine",
                format!("{} commits this year", format_compact(h.total_commits)),
            ));
        } else if h.total_commits >= 100 {
            earned.push(AchievementRecord::new(
                "🎯",
                "Century Club",
                format!("{} commits this year", format_compact(h.total_commits)),
            ));
        }

        if h.bug_fix_count >= 100 {
            earned.push(AchievementRecord::new(
                "🐛",
                "Bug Exterminator",
                format!("Squashed {} bugs", format_compact(h.bug_fix_count)),
            ));
        }

        if h.assisted_commit_count > 0 && h.assisted_percentage >= 50.0 {
            earned.push(AchievementRecord::new(
                "🤝",
                "Dynamic Duo",
                format!("{}% of commits were AI-assisted", h.assisted_percentage),
            ));
        }

        let night_commits: i64 = h
            .top_hours
            .iter()
            .filter(|hc| hc.hour >= 22 || hc.hour <= 4)
            .map(|hc| hc.count)
            .sum();
        if night_commits >= 20 {
            earned.push(AchievementRecord::new(
                "🌙",
                "Night Owl",
                format!("{} commits after dark", format_compact(night_commits)),
            ));
        }
    }

    if earned.is_empty() {
        earned.push(AchievementRecord::new(
            "🚀",
            "Builder",
            "Shipped code this year!".to_string(),
        ));
    }

    earned
}

/// Compact human form for large counts: 1.5B, 2.3M, 45K, else comma-grouped.
pub fn format_compact(n: i64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.0}K", n as f64 / 1e3)
    } else {
        format_with_commas(n)
    }
}

/// Thousands separators for exact counts, e.g. 1234567 -> "1,234,567".
pub fn format_with_commas(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
