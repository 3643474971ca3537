pub mod config;
pub mod domain_utils;
pub mod email_analyzer;
pub mod history;
pub mod report;
pub mod url_analyzer;

pub use config::RuleConfig;
pub use email_analyzer::EmailAnalyzer;
pub use history::{AnalysisHistory, HistoryEntry};
pub use report::{AnalysisResult, DomainInfo, Flag, RiskLevel, Severity, SubjectKind};
pub use url_analyzer::UrlAnalyzer;

/// One-shot email analysis using the built-in rule tables.
pub fn analyze_email(content: &str) -> anyhow::Result<AnalysisResult> {
    let analyzer = EmailAnalyzer::new(RuleConfig::default())?;
    Ok(analyzer.analyze(content))
}

/// One-shot URL analysis using the built-in rule tables. Scheme-less
/// input is accepted and normalized internally.
pub fn analyze_url(input: &str) -> anyhow::Result<AnalysisResult> {
    let analyzer = UrlAnalyzer::new(RuleConfig::default())?;
    Ok(analyzer.analyze(input))
}
