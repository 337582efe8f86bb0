//! Text (terminal) reporter with colors and formatting

use crate::store::StoredAnalysis;

/// Score colors (ANSI escape codes)
fn score_color(score: f64) -> &'static str {
    match score {
        s if s >= 80.0 => "\x1b[32m", // Green
        s if s >= 60.0 => "\x1b[33m", // Yellow
        _ => "\x1b[31m",              // Red
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn format_score(score: f64) -> String {
    format!("{}{score:.0}/100{RESET}", score_color(score))
}

fn push_section(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{BOLD}{heading}{RESET}\n"));
    for item in items {
        out.push_str(&format!("  - {item}\n"));
    }
    out.push('\n');
}

/// Render a stored analysis as formatted terminal output
pub fn render(record: &StoredAnalysis) -> String {
    let report = &record.analysis.report;
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}{}{RESET}\n", record.analysis.title));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Language: {}  Quality: {}  Security: {}  Performance: {}\n",
        report.language,
        format_score(report.quality_score),
        format_score(report.security_score),
        format_score(report.performance_score),
    ));
    out.push_str(&format!(
        "{DIM}id: {}  created: {}{RESET}\n\n",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str(&format!("{BOLD}SUMMARY{RESET}\n  {}\n\n", report.summary));

    push_section(&mut out, "ISSUES", &report.issues);
    push_section(&mut out, "SUGGESTIONS", &report.suggestions);
    push_section(&mut out, "SECURITY", &report.security_issues);
    push_section(&mut out, "PERFORMANCE", &report.performance_issues);

    if !report.enhanced_code.is_empty() {
        out.push_str(&format!("{BOLD}ENHANCED CODE{RESET}\n"));
        out.push_str(&format!("```{}\n{}\n```\n\n", report.language, report.enhanced_code));
    }

    push_section(&mut out, "RECOMMENDATIONS", &report.recommendations);

    out
}
