//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use timedquiz_core::model::Verdict;
use timedquiz_core::report::{ExamReport, ReviewRecord};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a finished exam.
pub fn generate_html(report: &ExamReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>timedquiz result — {:.2}%</title>\n",
        report.percentage
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>timedquiz result</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Session <code>{}</code> | {} questions | {}</p>\n",
        report.id,
        report.total,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    let verdict_class = match report.verdict {
        Verdict::Pass => "pass",
        Verdict::Fail => "fail",
    };
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Percentage</th><th>Threshold</th><th>Verdict</th><th>Avg Time</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}/{}</td><td>{:.2}%</td><td>{:.2}%</td><td class=\"{}\">{}</td><td>{:.2}s</td></tr></tbody>\n",
        report.score,
        report.total,
        report.percentage,
        report.pass_threshold,
        verdict_class,
        report.verdict,
        report.avg_seconds_per_item,
    ));
    html.push_str("</table>\n");

    if !report.review.is_empty() {
        html.push_str(&generate_time_chart(&report.review));
    }

    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Review</h2>\n");
    html.push_str("<label><input type=\"checkbox\" id=\"missed-only\" onchange=\"toggleMissed(this.checked)\"> Missed only</label>\n");
    html.push_str("<table class=\"results-table\" id=\"review\">\n");
    html.push_str("<thead><tr><th>#</th><th>Question</th><th>Correct Answer</th><th>Your Answer</th><th>Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &report.review {
        let class = if r.is_correct { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}s</td></tr>\n",
            class,
            r.number,
            html_escape(&r.question_text),
            html_escape(&r.correct_choice_text),
            html_escape(r.user_choice_display()),
            r.seconds_used,
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ExamReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

/// Seconds used per question, green when answered correctly.
fn generate_time_chart(review: &[ReviewRecord]) -> String {
    let bar_height = 20;
    let max_width = 400;
    let padding = 6;
    let label_width = 60;

    let max_seconds = review
        .iter()
        .map(|r| r.seconds_used)
        .max()
        .unwrap_or(0)
        .max(1);

    let total_height = review.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, r) in review.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (r.seconds_used as usize * max_width) / max_seconds as usize;
        let color = if r.is_correct { "#22c55e" } else { "#ef4444" };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">Q{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            r.number
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"3\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}s</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            r.seconds_used
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function toggleMissed(only) {
  document.querySelectorAll('#review tbody tr').forEach(r => {
    r.style.display = only && r.classList.contains('pass') ? 'none' : '';
  });
}
"#;
