//! Core data models for Retrocode
//!
//! These models are used throughout the codebase for representing
//! analysis requests, normalized analysis reports, and their provenance.

use serde::{Deserialize, Serialize};

/// A code analysis request as received from the serving layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The source code to analyze.
    pub code: String,
    /// Requested language, or "auto" to detect from content/file name.
    #[serde(default = "default_language")]
    pub language: String,
    /// Original file name, if the code came from a file upload.
    #[serde(default)]
    pub file_name: Option<String>,
}

fn default_language() -> String {
    "auto".to_string()
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: default_language(),
            file_name: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A fully normalized analysis result.
///
/// Every field is always present and type-valid no matter how degraded the
/// upstream model output was; scores are clamped to [0, 100]. Constructed
/// fresh per request and immutable once returned; ownership passes to the
/// persistence layer, which assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub security_issues: Vec<String>,
    pub performance_issues: Vec<String>,
    /// Improved version of the submitted code (may be empty).
    pub enhanced_code: String,
    pub quality_score: f64,
    pub security_score: f64,
    pub performance_score: f64,
    /// Resolved language, never "auto".
    pub language: String,
    pub recommendations: Vec<String>,
}

/// Which path produced a report. Logged for observability, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Strict JSON decode of the model response succeeded.
    StrictJson,
    /// JSON decode failed; heuristic text extraction was used.
    TextFallback,
    /// The upstream call failed; the report is a failure placeholder.
    UpstreamFailure,
    /// Input exceeded the size limit; no model call was made.
    Oversized,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::StrictJson => "strict_json",
            Provenance::TextFallback => "text_fallback",
            Provenance::UpstreamFailure => "upstream_failure",
            Provenance::Oversized => "oversized",
        }
    }
}
