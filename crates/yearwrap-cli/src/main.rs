mod commands;
mod render;

use anyhow::Result;
use chrono::Datelike;
use clap::Parser;
use commands::wrapped::{run_wrapped_command, WrappedOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "yearwrap")]
#[command(author, version, about = "Year-in-review for your code and Claude Code usage")]
struct Cli {
    #[arg(long, help = "Only include git commit history")]
    git_only: bool,

    #[arg(long, conflicts_with = "git_only", help = "Only include Claude Code usage")]
    usage_only: bool,

    #[arg(short, long, help = "Year to report on (default: current year)")]
    year: Option<i32>,

    #[arg(short, long, default_value = "wrapped.html", help = "Output HTML file path")]
    output: String,

    #[arg(long, help = "Override the report title")]
    title: Option<String>,

    #[arg(long, help = "Do not open the report in a browser")]
    no_open: bool,

    #[arg(long, help = "Print the report model as JSON instead of writing HTML")]
    json: bool,

    #[arg(long, help = "Disable loading spinner (for scripting)")]
    no_spinner: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());

    run_wrapped_command(WrappedOptions {
        year,
        git_only: cli.git_only,
        usage_only: cli.usage_only,
        output: cli.output,
        title: cli.title,
        no_open: cli.no_open,
        json: cli.json,
        no_spinner: cli.no_spinner,
    })
}
