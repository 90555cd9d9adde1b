//! Usage collection from the Claude Code stats cache.
//!
//! The cache lives at `~/.claude/stats-cache.json`. A missing file is data
//! absence; a file that exists but fails to parse is logged and also
//! treated as absence, since a half-written cache should never sink the
//! whole report.

use super::UsageCollector;
use crate::{RawActivityRow, RawModelTokensRow, UsageLog, WrapError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

const STATS_CACHE_RELATIVE: &str = ".claude/stats-cache.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsCacheFile {
    #[serde(default)]
    daily_activity: Vec<ActivityEntry>,
    #[serde(default)]
    daily_model_tokens: Vec<ModelTokensEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityEntry {
    date: Option<String>,
    message_count: Option<i64>,
    tool_call_count: Option<i64>,
    session_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelTokensEntry {
    date: Option<String>,
    #[serde(default)]
    tokens_by_model: BTreeMap<String, i64>,
}

/// Reads the stats cache from a home directory.
pub struct StatsCache {
    home_dir: Option<String>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self { home_dir: None }
    }

    /// Override the home directory, mainly for tests.
    pub fn with_home_dir(home_dir: impl Into<String>) -> Self {
        Self {
            home_dir: Some(home_dir.into()),
        }
    }

    fn cache_path(&self) -> Option<PathBuf> {
        let home = match &self.home_dir {
            Some(h) => PathBuf::from(h),
            None => match std::env::var("HOME") {
                Ok(h) if !h.is_empty() => PathBuf::from(h),
                _ => dirs::home_dir()?,
            },
        };
        Some(home.join(STATS_CACHE_RELATIVE))
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageCollector for StatsCache {
    fn usage_for_year(&self, _year: i32) -> Result<Option<UsageLog>, WrapError> {
        let Some(path) = self.cache_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let mut bytes = std::fs::read(&path)
            .map_err(|e| WrapError::Collector(format!("failed to read {}: {}", path.display(), e)))?;

        let cache: StatsCacheFile = match simd_json::from_slice(&mut bytes) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable stats cache, skipping usage");
                return Ok(None);
            }
        };

        Ok(Some(UsageLog {
            daily_activity: cache
                .daily_activity
                .into_iter()
                .map(|e| RawActivityRow {
                    date: e.date,
                    message_count: e.message_count,
                    tool_call_count: e.tool_call_count,
                    session_count: e.session_count,
                })
                .collect(),
            daily_model_tokens: cache
                .daily_model_tokens
                .into_iter()
                .map(|e| RawModelTokensRow {
                    date: e.date,
                    tokens_by_model: e.tokens_by_model,
                })
                .collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_cache(dir: &std::path::Path, body: &str) {
        let claude_dir = dir.join(".claude");
        std::fs::create_dir_all(&claude_dir).unwrap();
        std::fs::write(claude_dir.join("stats-cache.json"), body).unwrap();
    }

    #[test]
    fn test_missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let collector = StatsCache::with_home_dir(tmp.path().to_string_lossy());
        assert!(collector.usage_for_year(2025).unwrap().is_none());
    }

    #[test]
    fn test_reads_activity_and_tokens() {
        let tmp = tempfile::tempdir().unwrap();
        write_cache(
            tmp.path(),
            r#"{
                "dailyActivity": [
                    {"date": "2025-01-03", "messageCount": 12, "toolCallCount": 4, "sessionCount": 1}
                ],
                "dailyModelTokens": [
                    {"date": "2025-01-03", "tokensByModel": {"claude-sonnet-4": 5000}}
                ]
            }"#,
        );

        let collector = StatsCache::with_home_dir(tmp.path().to_string_lossy());
        let log = collector.usage_for_year(2025).unwrap().unwrap();

        assert_eq!(log.daily_activity.len(), 1);
        assert_eq!(log.daily_activity[0].message_count, Some(12));
        assert_eq!(
            log.daily_model_tokens[0].tokens_by_model["claude-sonnet-4"],
            5000
        );
    }

    #[test]
    fn test_malformed_cache_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        write_cache(tmp.path(), "{ this is not json");

        let collector = StatsCache::with_home_dir(tmp.path().to_string_lossy());
        assert!(collector.usage_for_year(2025).unwrap().is_none());
    }

    #[test]
    fn test_partial_rows_survive() {
        let tmp = tempfile::tempdir().unwrap();
        write_cache(
            tmp.path(),
            r#"{"dailyActivity": [{"date": "2025-02-01"}]}"#,
        );

        let collector = StatsCache::with_home_dir(tmp.path().to_string_lossy());
        let log = collector.usage_for_year(2025).unwrap().unwrap();
        assert_eq!(log.daily_activity[0].message_count, None);
        assert!(log.daily_model_tokens.is_empty());
    }
}
