use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score at or above this is classified as safe
pub const SAFE_THRESHOLD: u8 = 80;
/// Score at or above this (but below SAFE_THRESHOLD) is classified as suspicious
pub const SUSPICIOUS_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Danger,
}

impl RiskLevel {
    /// Classify a final (already clamped) score. Thresholds are fixed;
    /// the level is never set independently of the score.
    pub fn from_score(score: u8) -> Self {
        if score >= SAFE_THRESHOLD {
            RiskLevel::Safe
        } else if score >= SUSPICIOUS_THRESHOLD {
            RiskLevel::Suspicious
        } else {
            RiskLevel::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Suspicious => "suspicious",
            RiskLevel::Danger => "danger",
        }
    }
}

/// A single rule violation with a human-readable rationale.
/// Flags are immutable once created; a run appends them in rule
/// evaluation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub category: String,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Flag {
    pub fn new(category: &str, severity: Severity, description: String) -> Self {
        Self {
            category: category.to_string(),
            severity,
            description,
            recommendation: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: &str) -> Self {
        self.recommendation = Some(recommendation.to_string());
        self
    }
}

/// Synthesized domain metadata for the URL path. The age and reputation
/// values are derived from the final score, not fetched from WHOIS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainInfo {
    pub domain: String,
    pub age: String,
    pub reputation: String,
    pub ssl: bool,
}

/// What was analyzed, used to pick the summary template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Email,
    Website,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u8,
    pub level: RiskLevel,
    pub flags: Vec<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_info: Option<DomainInfo>,
    pub analysis: String,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// Finalize a run: clamp the accumulated score into [0,100], derive
    /// the level from it, and render the summary template.
    pub fn finalize(raw_score: i32, flags: Vec<Flag>, kind: SubjectKind) -> Self {
        let score = raw_score.clamp(0, 100) as u8;
        let level = RiskLevel::from_score(score);
        let analysis = summary_text(kind, level, flags.len());
        AnalysisResult {
            score,
            level,
            flags,
            domain_info: None,
            analysis,
            timestamp: Utc::now(),
        }
    }
}

/// Deterministic summary keyed by (subject kind, level, flag count).
fn summary_text(kind: SubjectKind, level: RiskLevel, flag_count: usize) -> String {
    let (opening, noun) = match kind {
        SubjectKind::Email => ("Email analysis complete.", "red flag(s)"),
        SubjectKind::Website => ("Website analysis complete.", "security issue(s)"),
    };

    let findings = if flag_count > 0 {
        format!("Found {} {}.", flag_count, noun)
    } else {
        match kind {
            SubjectKind::Email => "No major issues detected.".to_string(),
            SubjectKind::Website => "No major red flags detected.".to_string(),
        }
    };

    let guidance = match (kind, level) {
        (SubjectKind::Email, RiskLevel::Safe) => "This appears to be legitimate communication.",
        (SubjectKind::Email, RiskLevel::Suspicious) => {
            "Exercise caution with this email and verify the sender independently."
        }
        (SubjectKind::Email, RiskLevel::Danger) => {
            "This email shows strong indicators of fraud. Do not respond or click any links."
        }
        (SubjectKind::Website, RiskLevel::Safe) => {
            "This website appears to be legitimate and safe."
        }
        (SubjectKind::Website, RiskLevel::Suspicious) => {
            "Exercise caution when visiting this website and verify its authenticity."
        }
        (SubjectKind::Website, RiskLevel::Danger) => {
            "This website shows strong indicators of being fraudulent. Avoid visiting or entering personal information."
        }
    };

    format!("{} {} {}", opening, findings, guidance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Danger);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Danger);
    }

    #[test]
    fn test_level_is_monotonic_in_score() {
        let mut last = RiskLevel::from_score(0);
        for score in 0..=100u8 {
            let level = RiskLevel::from_score(score);
            // danger -> suspicious -> safe, never backwards
            let rank = |l: RiskLevel| match l {
                RiskLevel::Danger => 0,
                RiskLevel::Suspicious => 1,
                RiskLevel::Safe => 2,
            };
            assert!(rank(level) >= rank(last));
            last = level;
        }
    }

    #[test]
    fn test_finalize_clamps_score() {
        let result = AnalysisResult::finalize(-120, Vec::new(), SubjectKind::Email);
        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Danger);

        let result = AnalysisResult::finalize(250, Vec::new(), SubjectKind::Website);
        assert_eq!(result.score, 100);
        assert_eq!(result.level, RiskLevel::Safe);
    }

    #[test]
    fn test_summary_mentions_flag_count() {
        let flags = vec![Flag::new(
            "Urgency Tactics",
            Severity::Medium,
            "test".to_string(),
        )];
        let result = AnalysisResult::finalize(75, flags, SubjectKind::Email);
        assert!(result.analysis.contains("Found 1 red flag(s)"));
        assert!(result.analysis.contains("Exercise caution"));
    }

    #[test]
    fn test_clean_summary() {
        let result = AnalysisResult::finalize(95, Vec::new(), SubjectKind::Email);
        assert!(result.analysis.contains("No major issues detected."));
        assert!(result.analysis.contains("legitimate communication"));
    }
}
