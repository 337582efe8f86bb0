//! Model response normalization
//!
//! Turns raw completion text into a complete [`AnalysisReport`] no matter
//! what the model sent back. The strict path decodes the (possibly fenced)
//! JSON into [`ModelPayload`], a defined schema whose fields are
//! individually lenient. When the text is not JSON at all, a heuristic
//! fallback recovers what it can from bullet lines. Neither path can fail:
//! the caller always receives every field of the report.

use crate::models::{AnalysisReport, Provenance};
use crate::scoring;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Quality score used when the model omits one or the fallback path runs.
pub const DEFAULT_QUALITY_SCORE: f64 = 75.0;

const DEFAULT_SUMMARY: &str = "Code analysis completed";
const FALLBACK_SUMMARY: &str = "Analysis completed with text parsing";

/// Cap on issues/suggestions recovered by the text fallback, earliest-first.
const FALLBACK_ITEM_CAP: usize = 5;

const ISSUE_TOKENS: &[&str] = &["issue", "problem", "error", "bug"];
const SUGGESTION_TOKENS: &[&str] = &["suggest", "improve", "recommend"];

/// Schema for the JSON object the prompt asks the model to produce.
///
/// Every field is individually lenient: a missing or wrongly-typed value
/// decodes to its default instead of rejecting the document. Only a JSON
/// syntax error pushes the response onto the fallback path.
#[derive(Debug, Default, Deserialize)]
struct ModelPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    quality_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string_seq")]
    issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_seq")]
    suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_seq")]
    security_issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_seq")]
    performance_issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    enhanced_code: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// Accepts a number or a numeric string; anything else decodes to None.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts an array, keeping only its string elements.
fn lenient_string_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

/// A fenced block tagged as JSON. Only a tagged block is extracted; JSON
/// inside an untagged fence falls through to the text fallback.
fn json_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // (?s) so the block body may span lines
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*\n(.*?)\n```").expect("valid regex"))
}

fn code_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:\w+)?\s*\n(.*?)\n```").expect("valid regex"))
}

/// Normalize raw model output into a complete report.
///
/// Total over its input: any string, including garbage, yields a report
/// with every field present and every score in [0, 100]. The returned
/// [`Provenance`] records which path produced it; it is logged by the
/// orchestrator and never persisted.
pub fn normalize(raw: &str, language: &str) -> (AnalysisReport, Provenance) {
    let trimmed = raw.trim();

    // Models often wrap the object in a markdown fence despite the
    // JSON-only instruction; extract the tagged block when present.
    let candidate = if trimmed.contains("```json") {
        json_block_regex()
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(trimmed)
    } else {
        trimmed
    };

    match serde_json::from_str::<ModelPayload>(candidate) {
        Ok(payload) => {
            debug!(language, "model response decoded as JSON");
            (structured_report(payload, language), Provenance::StrictJson)
        }
        Err(err) => {
            warn!(language, error = %err, "JSON decode failed, falling back to text extraction");
            (
                text_fallback_report(candidate, language),
                Provenance::TextFallback,
            )
        }
    }
}

fn structured_report(payload: ModelPayload, language: &str) -> AnalysisReport {
    let quality_score =
        scoring::clamp_score(payload.quality_score.unwrap_or(DEFAULT_QUALITY_SCORE));
    let enhanced_code = payload
        .enhanced_code
        .map(|code| unfence(&code))
        .unwrap_or_default();
    let derived = scoring::derive_scores(
        quality_score,
        payload.security_issues.len(),
        payload.performance_issues.len(),
    );

    AnalysisReport {
        summary: payload
            .summary
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        issues: payload.issues,
        suggestions: payload.suggestions,
        security_issues: payload.security_issues,
        performance_issues: payload.performance_issues,
        enhanced_code,
        quality_score,
        security_score: derived.security_score,
        performance_score: derived.performance_score,
        language: language.to_string(),
        recommendations: scoring::recommendations(language),
    }
}

/// Strip one level of code fencing, returning the inner content.
fn unfence(code: &str) -> String {
    if !code.contains("```") {
        return code.to_string();
    }
    code_block_regex()
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Heuristic extraction for responses that are not valid JSON.
///
/// Bullet lines are classified by keyword: issue-flavored words win over
/// suggestion-flavored ones; everything else is discarded. A short label
/// before the marker ("Issue: - ...") still counts as a bullet.
fn text_fallback_report(text: &str, language: &str) -> AnalysisReport {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        let Some(idx) = line.find(['-', '•']) else {
            continue;
        };
        let rest = &line[idx..];
        let content = rest
            .strip_prefix('-')
            .or_else(|| rest.strip_prefix('•'))
            .unwrap_or(rest)
            .trim();
        let lower = content.to_lowercase();

        if ISSUE_TOKENS.iter().any(|t| lower.contains(t)) {
            issues.push(content.to_string());
        } else if SUGGESTION_TOKENS.iter().any(|t| lower.contains(t)) {
            suggestions.push(content.to_string());
        }
    }
    issues.truncate(FALLBACK_ITEM_CAP);
    suggestions.truncate(FALLBACK_ITEM_CAP);

    let derived = scoring::derive_scores(DEFAULT_QUALITY_SCORE, 0, 0);
    AnalysisReport {
        summary: FALLBACK_SUMMARY.to_string(),
        issues,
        suggestions,
        security_issues: Vec::new(),
        performance_issues: Vec::new(),
        enhanced_code: String::new(),
        quality_score: DEFAULT_QUALITY_SCORE,
        security_score: derived.security_score,
        performance_score: derived.performance_score,
        language: language.to_string(),
        recommendations: scoring::recommendations(language),
    }
}
