//! Score derivation for normalized analysis reports
//!
//! Sub-scores are derived from the overall quality score by penalizing each
//! reported issue, then clamping to the valid range:
//!
//! ```text
//! security    = clamp(quality - 10 × security_issues,    0, 100)
//! performance = clamp(quality -  5 × performance_issues, 0, 100)
//! ```
//!
//! The penalty weights are policy, kept for parity with earlier releases.
//! Tune them here, not at call sites.

/// Penalty per reported security issue.
pub const SECURITY_PENALTY: f64 = 10.0;

/// Penalty per reported performance issue.
pub const PERFORMANCE_PENALTY: f64 = 5.0;

/// Sub-scores derived from a report's quality score and issue counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScores {
    pub security_score: f64,
    pub performance_score: f64,
}

/// Derive security and performance scores.
pub fn derive_scores(
    quality_score: f64,
    security_issues: usize,
    performance_issues: usize,
) -> DerivedScores {
    DerivedScores {
        security_score: clamp_score(quality_score - SECURITY_PENALTY * security_issues as f64),
        performance_score: clamp_score(
            quality_score - PERFORMANCE_PENALTY * performance_issues as f64,
        ),
    }
}

/// Clamp a score into the valid [0, 100] range.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Fixed closing recommendations appended to every report.
///
/// The last entry is language-specific.
pub fn recommendations(language: &str) -> Vec<String> {
    vec![
        "Review the suggestions provided".to_string(),
        "Test the enhanced code thoroughly".to_string(),
        format!("Follow best practices for {language}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_penalty() {
        let scores = derive_scores(80.0, 2, 0);
        assert_eq!(scores.security_score, 60.0);
        assert_eq!(scores.performance_score, 80.0);
    }

    #[test]
    fn test_performance_penalty() {
        let scores = derive_scores(90.0, 0, 3);
        assert_eq!(scores.performance_score, 75.0);
    }

    #[test]
    fn test_clamped_at_zero() {
        let scores = derive_scores(30.0, 5, 10);
        assert_eq!(scores.security_score, 0.0);
        assert_eq!(scores.performance_score, 0.0);
    }

    #[test]
    fn test_clamp_upper_bound() {
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(55.5), 55.5);
    }

    #[test]
    fn test_recommendations_interpolate_language() {
        let recs = recommendations("rust");
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], "Review the suggestions provided");
        assert_eq!(recs[2], "Follow best practices for rust");
    }
}
