//! Analysis pipeline orchestration
//!
//! Wires the pipeline end to end: size check, language resolution, prompt,
//! model call, normalization. This is the only component that translates
//! upstream failures into data: AI unavailability degrades to a stored,
//! user-visible placeholder report, never an error escaping
//! [`CodeAnalyzer::analyze`].

use crate::ai::{normalize, prompts, AiError, AiResult, ChatCompletion, ModelClient};
use crate::config::{AnalysisLimits, Settings};
use crate::language::detect_language;
use crate::models::{AnalysisReport, AnalysisRequest, Provenance};
use crate::scoring;
use std::time::Instant;
use tracing::{info, warn};

/// The analysis pipeline.
///
/// Each [`analyze`](Self::analyze) call is independent and stateless; the
/// model call is the only suspension point, bounded by the transport's
/// configured timeout. Many analyses may run concurrently; bounding that
/// concurrency is the serving layer's job.
pub struct CodeAnalyzer {
    transport: Box<dyn ChatCompletion>,
    limits: AnalysisLimits,
}

impl CodeAnalyzer {
    pub fn new(transport: Box<dyn ChatCompletion>, limits: AnalysisLimits) -> Self {
        Self { transport, limits }
    }

    /// Build an analyzer over the real model client, keyed from the
    /// environment.
    pub fn from_settings(settings: &Settings) -> AiResult<Self> {
        let client = ModelClient::from_env(settings.model.clone())?;
        Ok(Self::new(Box::new(client), settings.limits))
    }

    /// Run the full pipeline for one request.
    ///
    /// Total: every outcome, including an oversized submission or an
    /// upstream failure, is a complete report the caller can persist.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let started = Instant::now();
        let language = resolve_language(request);

        if request.code.len() > self.limits.max_code_length {
            let err = AiError::CodeTooLong {
                limit: self.limits.max_code_length,
                actual: request.code.len(),
            };
            warn!(
                actual = request.code.len(),
                limit = self.limits.max_code_length,
                "rejecting oversized submission before model call"
            );
            let report = failure_report(&language, err.to_string());
            log_outcome(&report, Provenance::Oversized, started);
            return report;
        }

        let prompt =
            prompts::analysis_prompt(&request.code, &language, request.file_name.as_deref());

        let (report, provenance) =
            match self.transport.complete(prompts::ANALYSIS_SYSTEM_PROMPT, &prompt) {
                Ok(raw) => normalize(&raw, &language),
                Err(err) => {
                    warn!(error = %err, language = %language, "upstream call failed, degrading to placeholder");
                    (
                        failure_report(&language, err.to_string()),
                        Provenance::UpstreamFailure,
                    )
                }
            };

        log_outcome(&report, provenance, started);
        report
    }
}

fn log_outcome(report: &AnalysisReport, provenance: Provenance, started: Instant) {
    info!(
        language = %report.language,
        provenance = provenance.as_str(),
        quality = report.quality_score,
        issues = report.issues.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis finished"
    );
}

fn resolve_language(request: &AnalysisRequest) -> String {
    if request.language.is_empty() || request.language == "auto" {
        detect_language(&request.code, request.file_name.as_deref()).to_string()
    } else {
        request.language.clone()
    }
}

/// Placeholder report for a failed or skipped analysis.
///
/// Complete like every other report, with zeroed scores and the failure
/// message as its single issue, so persistence and the user-facing shape
/// never break.
fn failure_report(language: &str, message: String) -> AnalysisReport {
    AnalysisReport {
        summary: "Analysis failed due to an error".to_string(),
        issues: vec![message],
        suggestions: vec!["Please try again with different code".to_string()],
        security_issues: Vec::new(),
        performance_issues: Vec::new(),
        enhanced_code: String::new(),
        quality_score: 0.0,
        security_score: 0.0,
        performance_score: 0.0,
        language: language.to_string(),
        recommendations: scoring::recommendations(language),
    }
}
