//! Static HTML rendering of a report model.
//!
//! The output is a single self-contained page. All user-controlled text
//! (titles, commit subjects, model names) is escaped before insertion.

use yearwrap_core::{
    format_compact, format_with_commas, HistoryMetrics, ReportMode, ReportModel, UsageMetrics,
};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const BAR_COLORS: [&str; 5] = ["purple", "pink", "blue", "orange", "green"];

const STYLE: &str = r#"
        @import url('https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700;800;900&display=swap');

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
            min-height: 100vh;
            color: #fff;
            padding: 40px 20px;
        }

        .container { max-width: 800px; margin: 0 auto; }

        .header { text-align: center; margin-bottom: 50px; }
        .header h1 {
            font-size: 3.5rem;
            font-weight: 900;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 50%, #f093fb 100%);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
            margin-bottom: 10px;
        }
        .header .year {
            font-size: 5rem;
            font-weight: 900;
            color: #fff;
            text-shadow: 0 0 40px rgba(102, 126, 234, 0.5);
        }
        .header .subtitle { font-size: 1.2rem; color: #a0aec0; margin-top: 10px; }

        .card {
            background: rgba(255, 255, 255, 0.05);
            backdrop-filter: blur(10px);
            border-radius: 24px;
            padding: 30px;
            margin-bottom: 24px;
            border: 1px solid rgba(255, 255, 255, 0.1);
        }
        .card h2 { font-size: 1.5rem; margin-bottom: 20px; color: #f093fb; }

        .big-stats { display: grid; grid-template-columns: repeat(2, 1fr); gap: 20px; }
        @media (min-width: 600px) { .big-stats { grid-template-columns: repeat(4, 1fr); } }

        .stat-box {
            background: linear-gradient(135deg, rgba(102, 126, 234, 0.2) 0%, rgba(118, 75, 162, 0.2) 100%);
            border-radius: 16px;
            padding: 24px;
            text-align: center;
        }
        .stat-box .number {
            font-size: 2rem;
            font-weight: 800;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
        }
        .stat-box .label { font-size: 0.9rem; color: #a0aec0; margin-top: 5px; }

        .bar-chart { margin: 15px 0; }
        .bar-row { display: flex; align-items: center; margin-bottom: 12px; }
        .bar-label { width: 100px; font-size: 0.9rem; color: #a0aec0; }
        .bar-container {
            flex: 1;
            height: 24px;
            background: rgba(255, 255, 255, 0.1);
            border-radius: 12px;
            overflow: hidden;
            margin: 0 15px;
        }
        .bar {
            height: 100%;
            border-radius: 12px;
            display: flex;
            align-items: center;
            padding-left: 10px;
            font-size: 0.8rem;
            font-weight: 600;
        }
        .bar.purple { background: linear-gradient(90deg, #667eea 0%, #764ba2 100%); }
        .bar.pink { background: linear-gradient(90deg, #f093fb 0%, #f5576c 100%); }
        .bar.blue { background: linear-gradient(90deg, #4facfe 0%, #00f2fe 100%); }
        .bar.green { background: linear-gradient(90deg, #38f9d7 0%, #43e97b 100%); }
        .bar.orange { background: linear-gradient(90deg, #fa709a 0%, #fee140 100%); }
        .bar-value { font-size: 0.9rem; color: #fff; min-width: 50px; text-align: right; }

        .highlight-box {
            background: linear-gradient(135deg, rgba(240, 147, 251, 0.2) 0%, rgba(245, 87, 108, 0.2) 100%);
            border-radius: 16px;
            padding: 20px;
            text-align: center;
            margin-top: 20px;
        }
        .highlight-box .label { color: #a0aec0; font-size: 0.9rem; }
        .highlight-box .value { font-size: 1.5rem; font-weight: 700; color: #f093fb; margin-top: 5px; }

        .achievements { display: grid; grid-template-columns: repeat(2, 1fr); gap: 15px; }
        .achievement {
            background: rgba(255, 255, 255, 0.05);
            border-radius: 12px;
            padding: 15px;
            display: flex;
            align-items: center;
            gap: 12px;
        }
        .achievement .emoji { font-size: 1.8rem; }
        .achievement .text { font-size: 0.85rem; }
        .achievement .title { font-weight: 700; color: #fff; }
        .achievement .desc { color: #a0aec0; font-size: 0.8rem; }

        .footer { text-align: center; margin-top: 50px; padding: 30px; }
        .footer .message { font-size: 1.1rem; color: #a0aec0; margin-bottom: 10px; }
        .footer .cta {
            font-size: 2rem;
            font-weight: 800;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 50%, #f093fb 100%);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
        }

        @media print {
            body { background: #1a1a2e; -webkit-print-color-adjust: exact; print-color-adjust: exact; }
        }
"#;

pub fn render_html(model: &ReportModel) -> String {
    let title = escape_html(&model.title);
    let subtitle = match model.mode {
        ReportMode::UsageOnly => "Your Claude Code Usage",
        _ => "Your Year in Code",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} {year} Wrapped</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{title}</h1>
            <div class="year">{year}</div>
            <div class="subtitle">{subtitle}</div>
        </div>
{big_numbers}{history}{usage}{achievements}
        <div class="footer">
            <div class="message">{footer}</div>
            <div class="cta">Here's to {next_year}!</div>
        </div>
    </div>
</body>
</html>"#,
        title = title,
        year = model.year,
        style = STYLE,
        subtitle = subtitle,
        big_numbers = big_numbers_card(model),
        history = model
            .history
            .as_ref()
            .map(history_cards)
            .unwrap_or_default(),
        usage = model.usage.as_ref().map(usage_card).unwrap_or_default(),
        achievements = achievements_card(model),
        footer = footer_message(model),
        next_year = model.year + 1,
    )
}

fn big_numbers_card(model: &ReportModel) -> String {
    let mut stats: Vec<(String, &str)> = Vec::new();

    if let Some(u) = &model.usage {
        stats.push((format_compact(u.total_tokens), "Tokens Used"));
        stats.push((format_compact(u.total_messages), "Messages Sent"));
        stats.push((format_compact(u.total_tool_calls), "Tool Calls"));
    }
    if let Some(h) = &model.history {
        stats.push((format_compact(h.total_commits), "Commits"));
    }
    if let Some(u) = &model.usage {
        stats.push((format_with_commas(u.total_sessions), "Sessions"));
    }
    if let Some(h) = &model.history {
        stats.push((format_compact(h.lines_added), "Lines Added"));
        stats.push((format_with_commas(h.unique_active_days), "Days Coding"));
    }

    stats.truncate(8);

    let boxes: String = stats
        .iter()
        .map(|(number, label)| {
            format!(
                r#"          <div class="stat-box">
            <div class="number">{}</div>
            <div class="label">{}</div>
          </div>
"#,
                number, label
            )
        })
        .collect();

    format!(
        r#"        <div class="card">
          <h2>The Big Numbers</h2>
          <div class="big-stats">
{}          </div>
        </div>
"#,
        boxes
    )
}

fn history_cards(h: &HistoryMetrics) -> String {
    let mut out = String::new();

    // Monthly activity, calendar order.
    let max_month = h.monthly_counts.iter().map(|m| m.count).max().unwrap_or(1);
    let month_rows: String = h
        .monthly_counts
        .iter()
        .enumerate()
        .map(|(i, m)| {
            bar_row(
                MONTH_ABBREV[(m.month as usize - 1).min(11)],
                m.count,
                max_month,
                BAR_COLORS[i % BAR_COLORS.len()],
            )
        })
        .collect();
    out.push_str(&card("Monthly Activity", &bar_chart(&month_rows)));

    // Days of the week, busiest first.
    let mut days: Vec<_> = h.day_of_week_counts.iter().collect();
    days.sort_by(|a, b| b.count.cmp(&a.count));
    let favorite = days.first().map(|d| d.day.as_str()).unwrap_or("N/A");
    let max_day = days.first().map(|d| d.count).unwrap_or(1).max(1);
    let day_rows: String = days
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, d)| {
            bar_row(
                &d.day[..3.min(d.day.len())],
                d.count,
                max_day,
                BAR_COLORS[i % BAR_COLORS.len()],
            )
        })
        .collect();
    out.push_str(&card(
        &format!("Favorite Day: {}", favorite),
        &bar_chart(&day_rows),
    ));

    // Top hours.
    if !h.top_hours.is_empty() {
        let max_hour = h.top_hours[0].count.max(1);
        let hour_rows: String = h
            .top_hours
            .iter()
            .take(3)
            .enumerate()
            .map(|(i, hc)| {
                bar_row(
                    &hour_label(hc.hour),
                    hc.count,
                    max_hour,
                    BAR_COLORS[i % BAR_COLORS.len()],
                )
            })
            .collect();
        let mut body = bar_chart(&hour_rows);
        let top_hour = h.top_hours[0].hour;
        if top_hour >= 22 || top_hour <= 4 {
            body.push_str(
                r#"          <div class="highlight-box"><div class="label">Night Owl Developer!</div></div>
"#,
            );
        }
        out.push_str(&card("Most Productive Hours", &body));
    }

    // Partnership card only when assisted commits exist.
    if h.assisted_commit_count > 0 {
        out.push_str(&format!(
            r#"        <div class="card">
          <h2>Claude Code Partnership</h2>
          <div style="display: flex; align-items: center; justify-content: center; gap: 20px; margin-top: 20px;">
            <div style="font-size: 3rem; font-weight: 900; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); -webkit-background-clip: text; -webkit-text-fill-color: transparent;">{}%</div>
            <div style="color: #a0aec0;">
              <strong style="color: #fff;">{} commits</strong><br>
              made with Claude Code
            </div>
          </div>
        </div>
"#,
            h.assisted_percentage,
            format_with_commas(h.assisted_commit_count)
        ));
    }

    out
}

fn usage_card(u: &UsageMetrics) -> String {
    let max_tokens = u
        .tokens_by_model
        .iter()
        .map(|m| m.tokens)
        .max()
        .unwrap_or(1)
        .max(1);

    let model_rows: String = u
        .tokens_by_model
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, m)| {
            bar_row(
                &escape_html(&m.model),
                m.tokens,
                max_tokens,
                BAR_COLORS[i % BAR_COLORS.len()],
            )
        })
        .collect();

    let mut body = bar_chart(&model_rows);

    if let Some(day) = &u.most_active_day {
        body.push_str(&format!(
            r#"          <div class="highlight-box">
            <div class="label">Most Active Day</div>
            <div class="value">{} - {} messages!</div>
          </div>
"#,
            day.date,
            format_compact(day.message_count)
        ));
    }

    body.push_str(&format!(
        r#"          <p style="text-align: center; color: #a0aec0; font-size: 0.9rem; margin-top: 15px;">Powered by {}</p>
"#,
        escape_html(&u.dominant_model)
    ));

    card("Tokens by Model", &body)
}

fn achievements_card(model: &ReportModel) -> String {
    let entries: String = model
        .achievements
        .iter()
        .map(|a| {
            format!(
                r#"          <div class="achievement">
            <div class="emoji">{}</div>
            <div class="text">
              <div class="title">{}</div>
              <div class="desc">{}</div>
            </div>
          </div>
"#,
                a.icon,
                escape_html(&a.title),
                escape_html(&a.description)
            )
        })
        .collect();

    format!(
        r#"        <div class="card">
          <h2>Achievements Unlocked</h2>
          <div class="achievements">
{}          </div>
        </div>
"#,
        entries
    )
}

fn footer_message(model: &ReportModel) -> String {
    match model.mode {
        ReportMode::UsageOnly => {
            let tokens = model.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0);
            format!(
                "{} tokens of AI-powered development",
                format_compact(tokens)
            )
        }
        ReportMode::HistoryOnly => {
            let commits = model
                .history
                .as_ref()
                .map(|h| h.total_commits)
                .unwrap_or(0);
            format!(
                "{} commits of building something great",
                format_with_commas(commits)
            )
        }
        ReportMode::Full => "From first commit to production - what a journey!".to_string(),
    }
}

fn card(heading: &str, body: &str) -> String {
    format!(
        r#"        <div class="card">
          <h2>{}</h2>
{}        </div>
"#,
        heading, body
    )
}

fn bar_chart(rows: &str) -> String {
    format!(
        r#"          <div class="bar-chart">
{}          </div>
"#,
        rows
    )
}

fn bar_row(label: &str, count: i64, max: i64, color: &str) -> String {
    let width = (count as f64 / max as f64 * 100.0).clamp(0.0, 100.0);
    format!(
        r#"            <div class="bar-row">
              <div class="bar-label">{}</div>
              <div class="bar-container">
                <div class="bar {}" style="width: {:.0}%;"></div>
              </div>
              <div class="bar-value">{}</div>
            </div>
"#,
        label,
        color,
        width,
        format_compact(count)
    )
}

fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use yearwrap_core::{
        aggregate_history, aggregate_usage, generate_report, CommitRecord, NoProgress,
        RawActivityRow, RawModelTokensRow, ReportRequest, UsageLog,
    };

    fn sample_model(mode: ReportMode) -> ReportModel {
        let commits: Vec<CommitRecord> = (0..30)
            .map(|i| CommitRecord {
                timestamp: NaiveDate::from_ymd_opt(2025, 1 + (i % 12) as u32, 10)
                    .unwrap()
                    .and_hms_opt(23, 0, 0)
                    .unwrap(),
                assisted: i % 2 == 0,
                message: "feat: keep shipping".to_string(),
                lines_added: 20,
                lines_deleted: 5,
                files_touched: vec!["main.rs".to_string()],
            })
            .collect();

        let mut log = UsageLog::default();
        log.daily_activity.push(RawActivityRow {
            date: Some("2025-04-01".to_string()),
            message_count: Some(250),
            tool_call_count: Some(80),
            session_count: Some(3),
        });
        log.daily_model_tokens.push(RawModelTokensRow {
            date: Some("2025-04-01".to_string()),
            tokens_by_model: std::collections::BTreeMap::from([(
                "claude-sonnet-4-20250514".to_string(),
                2_000_000,
            )]),
        });

        let history = match mode {
            ReportMode::UsageOnly => None,
            _ => Some(commits),
        };
        let usage = match mode {
            ReportMode::HistoryOnly => None,
            _ => Some(log),
        };

        generate_report(
            history,
            usage,
            &ReportRequest {
                year: 2025,
                mode,
                title: None,
                repo_name: Some("demo-project".to_string()),
            },
            &NoProgress,
        )
        .unwrap()
    }

    #[test]
    fn test_render_full_report_has_all_sections() {
        let html = render_html(&sample_model(ReportMode::Full));
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Demo Project"));
        assert!(html.contains("The Big Numbers"));
        assert!(html.contains("Monthly Activity"));
        assert!(html.contains("Favorite Day:"));
        assert!(html.contains("Tokens by Model"));
        assert!(html.contains("Achievements Unlocked"));
        assert!(html.contains("Here's to 2026!"));
    }

    #[test]
    fn test_render_history_only_omits_usage_sections() {
        let html = render_html(&sample_model(ReportMode::HistoryOnly));
        assert!(html.contains("Monthly Activity"));
        assert!(!html.contains("Tokens by Model"));
        assert!(html.contains("commits of building something great"));
    }

    #[test]
    fn test_render_usage_only_omits_history_sections() {
        let html = render_html(&sample_model(ReportMode::UsageOnly));
        assert!(!html.contains("Monthly Activity"));
        assert!(html.contains("Claude Code"));
        assert!(html.contains("Powered by Claude Sonnet 4"));
        assert!(html.contains("tokens of AI-powered development"));
    }

    #[test]
    fn test_render_partnership_card_requires_assisted_commits() {
        let model = sample_model(ReportMode::HistoryOnly);
        assert!(render_html(&model).contains("Claude Code Partnership"));

        let mut unassisted = model;
        if let Some(h) = unassisted.history.as_mut() {
            h.assisted_commit_count = 0;
        }
        assert!(!render_html(&unassisted).contains("Claude Code Partnership"));
    }

    #[test]
    fn test_render_escapes_title() {
        let mut model = sample_model(ReportMode::Full);
        model.title = "<script>alert(1)</script>".to_string();
        let html = render_html(&model);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_night_owl_highlight() {
        // All sample commits land at 23:00.
        let html = render_html(&sample_model(ReportMode::HistoryOnly));
        assert!(html.contains("Night Owl Developer!"));
    }

    #[test]
    fn test_hour_label() {
        assert_eq!(hour_label(0), "12 AM");
        assert_eq!(hour_label(9), "9 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(23), "11 PM");
    }

    #[test]
    fn test_render_zero_metrics_do_not_panic() {
        let model = ReportModel {
            year: 2025,
            title: "Your Code".to_string(),
            mode: ReportMode::Full,
            history: Some(aggregate_history(&[])),
            usage: Some(aggregate_usage(&[])),
            achievements: Vec::new(),
        };
        let html = render_html(&model);
        assert!(html.contains("The Big Numbers"));
    }
}
