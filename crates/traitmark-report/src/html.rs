//! HTML result page generator.
//!
//! Produces a self-contained, printable HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use traitmark_core::interpretation::development_suggestions;
use traitmark_core::model::{Respondent, Score, TestResult};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render interpretation-style text: blank lines separate paragraphs,
/// lines starting with `- ` become list items, and `**bold**` spans become
/// `<strong>`.
fn render_text(text: &str) -> String {
    let mut html = String::new();
    for block in text.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        let lines: Vec<&str> = block.lines().collect();
        if lines.iter().all(|l| l.trim_start().starts_with("- ")) {
            html.push_str("<ul>\n");
            for line in lines {
                let item = line.trim_start().trim_start_matches("- ");
                html.push_str(&format!("<li>{}</li>\n", render_inline(item)));
            }
            html.push_str("</ul>\n");
        } else {
            html.push_str(&format!("<p>{}</p>\n", render_inline(block)));
        }
    }
    html
}

fn render_inline(text: &str) -> String {
    let escaped = html_escape(text);
    let mut out = String::with_capacity(escaped.len());
    let mut parts = escaped.split("**");
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    let rest: Vec<&str> = parts.collect();
    // An odd count means the final marker is unmatched and stays literal.
    let paired = rest.len() - rest.len() % 2;
    for (i, part) in rest.iter().enumerate() {
        if i >= paired {
            out.push_str("**");
            out.push_str(part);
        } else if i % 2 == 0 {
            out.push_str("<strong>");
            out.push_str(part);
        } else {
            out.push_str("</strong>");
            out.push_str(part);
        }
    }
    out
}

/// Generate an HTML page for one result.
pub fn generate_html(result: &TestResult, respondent: Option<&Respondent>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} results</title>\n",
        html_escape(&result.test_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&result.test_name)));
    let who = respondent
        .map(|r| format!("<strong>{}</strong> | ", html_escape(&r.full_name())))
        .unwrap_or_default();
    html.push_str(&format!(
        "<p class=\"meta\">{}Completed {}</p>\n",
        who,
        result.submitted_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</header>\n");

    // Scores
    html.push_str("<section class=\"scores\">\n");
    html.push_str("<h2>Scores</h2>\n");
    if result.scores.is_empty() {
        html.push_str("<p class=\"meta\">No profiles were scored.</p>\n");
    } else {
        html.push_str(&generate_bar_chart(&result.scores));
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>Profile</th><th>Score</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for score in &result.scores {
            html.push_str(&format!(
                "<tr><td><span class=\"swatch\" style=\"background:{}\"></span>{}</td><td>{:.1}%</td></tr>\n",
                html_escape(&score.color),
                html_escape(&score.name),
                score.score
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Interpretation
    html.push_str("<section class=\"interpretation\">\n");
    html.push_str("<h2>Interpretation</h2>\n");
    html.push_str(&render_text(&result.interpretation));
    html.push_str("</section>\n");

    if let Some(dominant) = result.dominant() {
        html.push_str("<section class=\"development\">\n");
        html.push_str("<h2>Development</h2>\n");
        html.push_str(&render_text(&development_suggestions(&dominant.name)));
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(result).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Write the HTML page for `result` to `path`.
pub fn write_html_report(
    result: &TestResult,
    respondent: Option<&Respondent>,
    path: &Path,
) -> Result<()> {
    let html = generate_html(result, respondent);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(scores: &[Score]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = scores.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, score) in scores.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (score.score.clamp(0.0, 100.0) / 100.0 * max_width as f64) as usize;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&score.name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            html_escape(&score.color)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score.score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --muted: #9ca3af; }
}
@media print {
  :root { --bg: #fff; --fg: #000; }
  details { display: none; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 56rem; padding: 2rem; background: var(--bg); color: var(--fg); line-height: 1.5; }
h1, h2 { margin-top: 2rem; }
.meta { color: var(--muted); }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.swatch { display: inline-block; width: 0.8rem; height: 0.8rem; border-radius: 2px; margin-right: 0.5rem; vertical-align: middle; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use traitmark_core::model::{ProfileKey, TestId};

    fn make_result() -> TestResult {
        TestResult {
            test_id: TestId::from("belbin"),
            test_name: "Belbin Team Roles".into(),
            scores: vec![
                Score {
                    id: ProfileKey::from("plant"),
                    name: "Plant".into(),
                    color: "#22c55e".into(),
                    score: 83.33,
                },
                Score {
                    id: ProfileKey::from("shaper"),
                    name: "Shaper <&>".into(),
                    color: "#ef4444".into(),
                    score: 40.0,
                },
            ],
            interpretation: "Your dominant profile is **Plant** (83%). Creative.\n\nThese results are a guide.".into(),
            submitted_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn html_contains_required_elements() {
        let mut respondent = Respondent::new("Ada", "Lovelace");
        respondent.id = uuid::Uuid::nil();
        let html = generate_html(&make_result(), Some(&respondent));

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Belbin Team Roles"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("fill=\"#22c55e\""));
        assert!(html.contains("<strong>Plant</strong> (83%)"));
        assert!(html.contains("Shaper &lt;&amp;&gt;"));
        assert!(!html.contains("Shaper <&>"));
        assert!(html.contains("<details>"));
        assert!(html.contains("Suggestions for developing your <strong>Plant</strong> profile"));
        assert!(html.contains("<li>"));
    }

    #[test]
    fn empty_scores_render_without_chart() {
        let mut result = make_result();
        result.scores.clear();
        let html = generate_html(&result, None);
        assert!(!html.contains("<svg"));
        assert!(html.contains("No profiles were scored."));
        assert!(!html.contains("Development"));
    }

    #[test]
    fn inline_bold_pairs() {
        assert_eq!(render_inline("a **b** c"), "a <strong>b</strong> c");
        assert_eq!(
            render_inline("**x** and **y**"),
            "<strong>x</strong> and <strong>y</strong>"
        );
        assert_eq!(render_inline("dangling **open"), "dangling **open");
        assert_eq!(render_inline("1 < 2"), "1 &lt; 2");
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.html");

        write_html_report(&make_result(), None, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
