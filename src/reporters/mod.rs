//! Output reporters for analysis records
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::store::StoredAnalysis;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a stored analysis in the specified format
pub fn render(record: &StoredAnalysis, format: &str) -> Result<String> {
    match OutputFormat::from_str(format)? {
        OutputFormat::Text => Ok(text::render(record)),
        OutputFormat::Json => json::render(record),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::AnalysisReport;
    use crate::scoring;
    use crate::store::{AnalysisStore, MemoryStore, NewAnalysis};

    pub(crate) fn test_record() -> StoredAnalysis {
        let analysis = NewAnalysis {
            title: "Sample analysis".to_string(),
            language: "python".to_string(),
            file_name: Some("app.py".to_string()),
            file_size: 64,
            lines_of_code: 4,
            model_used: Some("llama-3.1-70b-versatile".to_string()),
            analysis_duration: Some(0.8),
            report: AnalysisReport {
                summary: "Looks reasonable".to_string(),
                issues: vec!["bare except clause".to_string()],
                suggestions: vec!["add type hints".to_string()],
                security_issues: vec!["eval on user input".to_string()],
                performance_issues: Vec::new(),
                enhanced_code: "print('better')".to_string(),
                quality_score: 82.0,
                security_score: 72.0,
                performance_score: 82.0,
                language: "python".to_string(),
                recommendations: scoring::recommendations("python"),
            },
        };
        MemoryStore::new().save(analysis).expect("save sample")
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_render_dispatch() {
        let record = test_record();
        assert!(render(&record, "text").unwrap().contains("Sample analysis"));
        assert!(render(&record, "json").unwrap().contains("\"quality_score\""));
    }
}
