use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use yearwrap_core::collect::{GitCli, HistoryCollector, StatsCache, UsageCollector};
use yearwrap_core::{
    generate_report, NoProgress, ProgressSink, ReportMode, ReportRequest, Stage,
};

use crate::render;

pub struct WrappedOptions {
    pub year: i32,
    pub git_only: bool,
    pub usage_only: bool,
    pub output: String,
    pub title: Option<String>,
    pub no_open: bool,
    pub json: bool,
    pub no_spinner: bool,
}

struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for SpinnerProgress {
    fn on_stage(&self, stage: Stage) {
        let message = match stage {
            Stage::Filtering => "Filtering records...",
            Stage::Aggregating => "Crunching numbers...",
            Stage::Scoring => "Scoring achievements...",
            Stage::Building => "Assembling report...",
        };
        self.bar.set_message(message);
    }
}

pub fn run_wrapped_command(opts: WrappedOptions) -> Result<()> {
    let mode = if opts.git_only {
        ReportMode::HistoryOnly
    } else if opts.usage_only {
        ReportMode::UsageOnly
    } else {
        ReportMode::Full
    };

    if !opts.json {
        println!("{}", format!("\n  Yearwrap {}\n", opts.year).cyan());
    }

    let quiet = opts.no_spinner || opts.json;
    let spinner = if quiet { None } else { Some(SpinnerProgress::new()) };
    if let Some(s) = &spinner {
        s.bar.set_message("Collecting data...");
    }

    let git = GitCli::new(".");
    let usage_cache = StatsCache::new();

    // Both sources are independent; collect them in parallel.
    let (history, usage) = rayon::join(
        || {
            if mode == ReportMode::UsageOnly {
                Ok(None)
            } else {
                git.history_for_year(opts.year)
            }
        },
        || {
            if mode == ReportMode::HistoryOnly {
                Ok(None)
            } else {
                usage_cache.usage_for_year(opts.year)
            }
        },
    );
    let history = history?;
    let usage = usage?;

    if !opts.json {
        if mode == ReportMode::Full && history.is_none() {
            println!(
                "{}",
                "  Not a git repository, skipping commit history".bright_black()
            );
        }
        if mode == ReportMode::Full && usage.is_none() {
            println!(
                "{}",
                "  No Claude Code stats cache found, skipping usage".bright_black()
            );
        }
    }

    let request = ReportRequest {
        year: opts.year,
        mode,
        title: opts.title,
        repo_name: git.repo_name(),
    };

    let model = {
        let progress: &dyn ProgressSink = match &spinner {
            Some(s) => s,
            None => &NoProgress,
        };
        generate_report(history, usage, &request, progress)
    };

    if let Some(s) = &spinner {
        s.finish();
    }

    let model = model?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    let html = render::render_html(&model);
    std::fs::write(&opts.output, html)
        .with_context(|| format!("failed to write {}", opts.output))?;

    let path = std::fs::canonicalize(&opts.output)
        .unwrap_or_else(|_| std::path::PathBuf::from(&opts.output));
    println!(
        "{}",
        format!("  ✓ Report written to {}\n", path.display()).green()
    );

    if !opts.no_open {
        if let Err(e) = open::that(&path) {
            println!(
                "{}",
                format!("  Could not open a browser ({}), open the file manually", e)
                    .bright_black()
            );
        }
    }

    Ok(())
}
