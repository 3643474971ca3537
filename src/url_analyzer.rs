use crate::config::RuleConfig;
use crate::domain_utils::DomainUtils;
use crate::report::{AnalysisResult, DomainInfo, Flag, RiskLevel, Severity, SubjectKind};
use regex::Regex;
use url::Url;

const URL_BASE_SCORE: i32 = 90;
const MAX_DOMAIN_LENGTH: usize = 25;
const MAX_SUBDOMAIN_LEVELS: i32 = 2;

/// Scores a URL (scheme optional) against the configured rule tables and
/// synthesizes domain metadata from the final score.
pub struct UrlAnalyzer {
    config: RuleConfig,
    ipv4_literal: Regex,
    consecutive_digits: Regex,
    consecutive_hyphens: Regex,
}

impl UrlAnalyzer {
    pub fn new(config: RuleConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            ipv4_literal: Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$")?,
            consecutive_digits: Regex::new(r"\d{2}")?,
            consecutive_hyphens: Regex::new(r"--")?,
        })
    }

    /// Analyze a URL string. Parse failure is recovered internally as an
    /// "Invalid URL Format" flag with the score forced to the floor.
    pub fn analyze(&self, input: &str) -> AnalysisResult {
        let trimmed = input.trim();
        let normalized = normalize_scheme(trimmed);

        let parsed = match Url::parse(&normalized) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("url parse failed for {trimmed}: {e}");
                return self.invalid_result(trimmed);
            }
        };

        let host = match parsed.host_str() {
            Some(host) => host.to_lowercase(),
            None => return self.invalid_result(trimmed),
        };

        // The parser IDNA-maps non-ASCII hostnames to punycode, so the
        // character-level checks look at the hostname as written.
        let raw_host = raw_hostname(&normalized);

        let mut score = URL_BASE_SCORE;
        let mut flags = Vec::new();
        let deductions = &self.config.url_deductions;

        if let Some(fragment) = self.config.red_flag_domains.iter().find(|fragment| {
            host.ends_with(&format!(".{fragment}")) || host.contains(fragment.as_str())
        }) {
            flags.push(
                Flag::new(
                    "High-Risk Domain",
                    Severity::High,
                    format!("Domain uses high-risk TLD or contains suspicious pattern: {fragment}"),
                )
                .with_recommendation("Avoid entering credentials or payment details on this site."),
            );
            score -= deductions.high_risk_domain as i32;
        }

        let is_https = parsed.scheme() == "https";
        if parsed.scheme() == "http" {
            flags.push(Flag::new(
                "Insecure Connection",
                Severity::High,
                "Website does not use HTTPS encryption - transmitted data is not secure"
                    .to_string(),
            ));
            score -= deductions.insecure_connection as i32;
        }

        if let Some(pattern) = self
            .config
            .typosquat_patterns
            .iter()
            .find(|pattern| host.contains(pattern.as_str()))
        {
            flags.push(Flag::new(
                "Typosquatting Attempt",
                Severity::High,
                format!(
                    "Domain contains suspicious pattern \"{pattern}\" often used to mimic legitimate services"
                ),
            ));
            score -= deductions.typosquatting as i32;
        }

        if host.len() > MAX_DOMAIN_LENGTH {
            flags.push(Flag::new(
                "Suspicious Domain Length",
                Severity::Medium,
                format!(
                    "Unusually long domain name ({} characters) may indicate obfuscation",
                    host.len()
                ),
            ));
            score -= deductions.long_domain as i32;
        }

        let subdomain_levels = host.split('.').count() as i32 - 2;
        if subdomain_levels > MAX_SUBDOMAIN_LEVELS {
            flags.push(Flag::new(
                "Excessive Subdomains",
                Severity::Medium,
                format!("Domain has {subdomain_levels} subdomain levels, possibly to confuse users"),
            ));
            score -= deductions.excessive_subdomains as i32;
        }

        if self.consecutive_digits.is_match(raw_host)
            || self.consecutive_hyphens.is_match(raw_host)
        {
            flags.push(Flag::new(
                "Suspicious Domain Format",
                Severity::Low,
                "Domain contains unusual character patterns".to_string(),
            ));
            score -= deductions.suspicious_format as i32;
        }

        if contains_homograph_chars(raw_host) {
            flags.push(Flag::new(
                "Homograph Attack",
                Severity::High,
                "Domain contains non-Latin characters that may mimic a legitimate domain"
                    .to_string(),
            ));
            score -= deductions.homograph as i32;
        }

        if self.ipv4_literal.is_match(&host) {
            flags.push(Flag::new(
                "IP Address URL",
                Severity::High,
                "URL uses an IP address instead of a domain name".to_string(),
            ));
            score -= deductions.ip_address as i32;
        }

        if DomainUtils::matches_domain_list(&host, &self.config.url_shorteners) {
            flags.push(Flag::new(
                "URL Shortener",
                Severity::Medium,
                "URL shortener service hides the actual destination".to_string(),
            ));
            score -= deductions.url_shortener as i32;
        }

        log::debug!(
            "url analysis finished for {host}: raw score {score}, {} flag(s)",
            flags.len()
        );

        let mut result = AnalysisResult::finalize(score, flags, SubjectKind::Website);
        result.domain_info = Some(DomainInfo {
            domain: display_domain(trimmed),
            age: synthesized_age(result.score),
            reputation: reputation_for(result.level).to_string(),
            ssl: is_https,
        });
        result
    }

    fn invalid_result(&self, input: &str) -> AnalysisResult {
        let flags = vec![Flag::new(
            "Invalid URL Format",
            Severity::High,
            "URL format is invalid or malformed".to_string(),
        )];
        let mut result = AnalysisResult::finalize(0, flags, SubjectKind::Website);
        result.domain_info = Some(DomainInfo {
            domain: display_domain(input),
            age: "Unknown".to_string(),
            reputation: reputation_for(result.level).to_string(),
            ssl: false,
        });
        result
    }
}

/// Prepend https:// when the input carries no http(s) scheme.
fn normalize_scheme(input: &str) -> String {
    let lower = input.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// The hostname portion as written, before any IDNA mapping.
fn raw_hostname(normalized: &str) -> &str {
    let after_scheme = normalized
        .splitn(2, "://")
        .nth(1)
        .unwrap_or(normalized);
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme);
    let without_userinfo = authority.rsplit('@').next().unwrap_or(authority);
    without_userinfo
        .split(':')
        .next()
        .unwrap_or(without_userinfo)
}

/// Cyrillic and Greek codepoints, the ranges most used to fake Latin
/// lookalike domains.
fn contains_homograph_chars(host: &str) -> bool {
    host.chars().any(|c| {
        ('\u{0400}'..='\u{04FF}').contains(&c) || ('\u{0370}'..='\u{03FF}').contains(&c)
    })
}

/// What the caller typed, minus scheme and path.
fn display_domain(input: &str) -> String {
    let without_scheme = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

/// Simulated registration age keyed off the final score. Deterministic
/// and synthesized, not a WHOIS lookup.
fn synthesized_age(score: u8) -> String {
    if score < 40 {
        "Less than 1 week".to_string()
    } else if score < 60 {
        "Less than 1 month".to_string()
    } else if score < 75 {
        "2-6 months".to_string()
    } else {
        "Over 1 year".to_string()
    }
}

fn reputation_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => "Good",
        RiskLevel::Suspicious => "Unknown",
        RiskLevel::Danger => "Poor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> UrlAnalyzer {
        UrlAnalyzer::new(RuleConfig::default()).unwrap()
    }

    fn categories(result: &AnalysisResult) -> Vec<&str> {
        result.flags.iter().map(|f| f.category.as_str()).collect()
    }

    #[test]
    fn test_clean_https_url_is_safe() {
        let result = analyzer().analyze("https://example.com");
        assert!(result.flags.is_empty());
        assert_eq!(result.score, 90);
        assert_eq!(result.level, RiskLevel::Safe);

        let info = result.domain_info.unwrap();
        assert_eq!(info.domain, "example.com");
        assert_eq!(info.age, "Over 1 year");
        assert_eq!(info.reputation, "Good");
        assert!(info.ssl);
    }

    #[test]
    fn test_scheme_is_normalized_to_https() {
        let result = analyzer().analyze("example.com");
        assert!(result.flags.is_empty());
        assert_eq!(result.score, 90);
        assert!(result.domain_info.unwrap().ssl);
    }

    #[test]
    fn test_http_flags_insecure_connection() {
        let result = analyzer().analyze("http://example.com");
        assert_eq!(categories(&result), vec!["Insecure Connection"]);
        assert_eq!(result.score, 60);
        assert_eq!(result.level, RiskLevel::Suspicious);
        assert!(!result.domain_info.unwrap().ssl);
    }

    #[test]
    fn test_high_risk_tld_with_typosquatting() {
        let result = analyzer().analyze("https://paypal-verify.ml");
        let found = categories(&result);
        assert!(found.contains(&"High-Risk Domain"));
        assert!(found.contains(&"Typosquatting Attempt"));
        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Danger);

        let info = result.domain_info.unwrap();
        assert_eq!(info.age, "Less than 1 week");
        assert_eq!(info.reputation, "Poor");
    }

    #[test]
    fn test_high_risk_fragment_is_first_match_only() {
        // Matches both "tk" and "secure-bank.tk"; only one flag fires.
        let result = analyzer().analyze("https://secure-bank.tk");
        let count = result
            .flags
            .iter()
            .filter(|f| f.category == "High-Risk Domain")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_ip_address_url() {
        let result = analyzer().analyze("https://192.168.1.1");
        let found = categories(&result);
        assert!(found.contains(&"IP Address URL"));
        // Consecutive digits also fire per their own rule.
        assert!(found.contains(&"Suspicious Domain Format"));
        assert_eq!(result.score, 40);
        assert_eq!(result.level, RiskLevel::Danger);
    }

    #[test]
    fn test_invalid_url_yields_floor_score() {
        let result = analyzer().analyze("http://");
        assert_eq!(categories(&result), vec!["Invalid URL Format"]);
        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Danger);

        let info = result.domain_info.unwrap();
        assert_eq!(info.age, "Unknown");
        assert_eq!(info.reputation, "Poor");
        assert!(!info.ssl);
    }

    #[test]
    fn test_long_domain() {
        let result = analyzer().analyze("https://averyveryverylongdomainname.example.com");
        assert!(categories(&result).contains(&"Suspicious Domain Length"));
    }

    #[test]
    fn test_excessive_subdomains() {
        let result = analyzer().analyze("https://a.b.c.d.example.org");
        assert!(categories(&result).contains(&"Excessive Subdomains"));
    }

    #[test]
    fn test_suspicious_character_patterns() {
        let result = analyzer().analyze("https://promo44.example.org");
        assert!(categories(&result).contains(&"Suspicious Domain Format"));
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_homograph_detection() {
        // Cyrillic "а" in place of Latin "a".
        let result = analyzer().analyze("https://\u{0430}pple.com");
        assert!(categories(&result).contains(&"Homograph Attack"));
    }

    #[test]
    fn test_url_shortener() {
        let result = analyzer().analyze("https://bit.ly/3xYz");
        assert!(categories(&result).contains(&"URL Shortener"));
        assert_eq!(result.score, 65);
        assert_eq!(result.level, RiskLevel::Suspicious);
        assert_eq!(result.domain_info.unwrap().reputation, "Unknown");
    }

    #[test]
    fn test_display_domain_strips_scheme_and_path() {
        let result = analyzer().analyze("https://example.com/deep/path?q=1");
        assert_eq!(result.domain_info.unwrap().domain, "example.com");
    }

    #[test]
    fn test_score_never_leaves_bounds() {
        for input in [
            "https://paypal-verify.ml",
            "http://secure-bank.tk/a--b/99",
            "https://1.2.3.4",
            "http://",
            "not a url at all",
            "",
        ] {
            let result = analyzer().analyze(input);
            assert!(result.score <= 100);
        }
    }

    #[test]
    fn test_idempotence() {
        let engine = analyzer();
        let first = engine.analyze("http://paypal-login.xyz");
        let second = engine.analyze("http://paypal-login.xyz");
        assert_eq!(first.score, second.score);
        assert_eq!(first.level, second.level);
        assert_eq!(categories(&first), categories(&second));
    }
}
