//! Data collectors.
//!
//! Collectors gather raw material for the pipeline and are the only part
//! of the core that touches the outside world. Both return `Ok(None)` when
//! their source simply is not there, and reserve `Err` for sources that
//! exist but cannot be read.

mod claude;
mod git;

pub use claude::StatsCache;
pub use git::GitCli;

use crate::{CommitRecord, UsageLog, WrapError};

/// Source of commit history for a given calendar year.
pub trait HistoryCollector {
    /// `Ok(None)` means "not inside a tracked repository".
    fn history_for_year(&self, year: i32) -> Result<Option<Vec<CommitRecord>>, WrapError>;
}

/// Source of assistant usage rows.
pub trait UsageCollector {
    /// `Ok(None)` means "no usage log found".
    fn usage_for_year(&self, year: i32) -> Result<Option<UsageLog>, WrapError>;
}
