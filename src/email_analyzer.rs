use crate::config::RuleConfig;
use crate::domain_utils::{ContentPatterns, DomainUtils};
use crate::report::{AnalysisResult, Flag, Severity, SubjectKind};
use regex::Regex;
use url::Url;

const EMAIL_BASE_SCORE: i32 = 95;

/// Scores raw email text (headers + body as one string) against the
/// configured rule tables.
pub struct EmailAnalyzer {
    config: RuleConfig,
    patterns: ContentPatterns,
    sensitive: Vec<(String, Regex)>,
}

impl EmailAnalyzer {
    /// All regexes are compiled here; a broken pattern in the config is
    /// a construction error, never an analysis-time failure.
    pub fn new(config: RuleConfig) -> anyhow::Result<Self> {
        let sensitive = config
            .sensitive_patterns
            .iter()
            .map(|entry| {
                let regex = Regex::new(&entry.pattern)?;
                Ok((entry.label.clone(), regex))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            patterns: ContentPatterns::new()?,
            sensitive,
            config,
        })
    }

    /// Analyze raw email text. Never fails: absent headers or links
    /// simply skip their rule groups.
    pub fn analyze(&self, content: &str) -> AnalysisResult {
        let mut score = EMAIL_BASE_SCORE;
        let mut flags = Vec::new();
        let deductions = &self.config.email_deductions;

        let sender = self.patterns.extract_sender(content);
        let sender_domain = sender.as_deref().and_then(DomainUtils::extract_domain);

        if let Some(sender) = &sender {
            log::debug!("extracted sender: {sender}");

            if self
                .config
                .known_malicious_senders
                .iter()
                .any(|known| known == sender)
            {
                flags.push(
                    Flag::new(
                        "Known Malicious Sender",
                        Severity::High,
                        format!("Sender {sender} is in the known fraud database"),
                    )
                    .with_recommendation(
                        "Delete this email and report it as phishing. Do not reply or click any links.",
                    ),
                );
                score -= deductions.known_malicious_sender as i32;
            } else if let Some(domain) = &sender_domain {
                // First matching fragment wins; impersonation is checked
                // per brand regardless.
                if let Some(fragment) = self
                    .config
                    .red_flag_domains
                    .iter()
                    .find(|fragment| domain.contains(fragment.as_str()))
                {
                    flags.push(Flag::new(
                        "High-Risk Domain",
                        Severity::High,
                        format!("Sender domain contains high-risk TLD or pattern: {fragment}"),
                    ));
                    score -= deductions.high_risk_domain as i32;
                }

                for brand in &self.config.legitimate_brands {
                    if domain.contains(&brand.name) && !domain.ends_with(&brand.canonical_domain) {
                        flags.push(
                            Flag::new(
                                "Domain Impersonation",
                                Severity::High,
                                format!(
                                    "Sender domain mimics {} but is not {}",
                                    brand.name, brand.canonical_domain
                                ),
                            )
                            .with_recommendation(
                                "Verify the sender through the brand's official website before acting.",
                            ),
                        );
                        score -= deductions.domain_impersonation as i32;
                    }
                }
            }
        }

        let lower_content = content.to_lowercase();

        let matched_keywords: Vec<&str> = self
            .config
            .phishing_keywords
            .iter()
            .filter(|keyword| lower_content.contains(&keyword.to_lowercase()))
            .map(|keyword| keyword.as_str())
            .collect();

        if matched_keywords.len() >= 3 {
            let sample = matched_keywords[..3].join("\", \"");
            flags.push(Flag::new(
                "Multiple Phishing Keywords",
                Severity::High,
                format!(
                    "Contains {} suspicious keywords (\"{}\") indicating a phishing attempt",
                    matched_keywords.len(),
                    sample
                ),
            ));
            score -= deductions.multiple_phishing_keywords as i32;
        } else if !matched_keywords.is_empty() {
            flags.push(Flag::new(
                "Urgency Tactics",
                Severity::Medium,
                format!(
                    "Uses pressure tactics with {} suspicious keyword(s)",
                    matched_keywords.len()
                ),
            ));
            score -= deductions.urgency_tactics as i32;
        }

        for (label, regex) in &self.sensitive {
            if regex.is_match(content) {
                flags.push(
                    Flag::new(
                        "Sensitive Data Request",
                        Severity::High,
                        format!("Requests or exposes a {label}"),
                    )
                    .with_recommendation(
                        "Legitimate organizations never ask for this over email.",
                    ),
                );
                score -= deductions.sensitive_data_request as i32;
            }
        }

        for link in self.patterns.extract_links(content) {
            let host = match Url::parse(link).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
                Some(host) => host,
                None => {
                    flags.push(Flag::new(
                        "Malformed URL",
                        Severity::Medium,
                        format!("Contains an invalid or suspicious URL: {link}"),
                    ));
                    score -= deductions.malformed_url as i32;
                    continue;
                }
            };

            if let Some(domain) = &sender_domain {
                if host != *domain && !host.contains(DomainUtils::root_label(domain)) {
                    flags.push(Flag::new(
                        "Mismatched Link Domain",
                        Severity::Medium,
                        format!("Link domain ({host}) does not match sender domain ({domain})"),
                    ));
                    score -= deductions.mismatched_link_domain as i32;
                }
            }

            if let Some(fragment) = self
                .config
                .red_flag_domains
                .iter()
                .find(|fragment| host.contains(fragment.as_str()))
            {
                flags.push(Flag::new(
                    "Malicious Link Domain",
                    Severity::High,
                    format!("Link points to a high-risk domain ({host}, pattern: {fragment})"),
                ));
                score -= deductions.malicious_link_domain as i32;
            }

            if DomainUtils::matches_domain_list(&host, &self.config.url_shorteners) {
                flags.push(Flag::new(
                    "Shortened URL",
                    Severity::Medium,
                    format!("Shortened URL ({host}) hides the real destination"),
                ));
                score -= deductions.shortened_url as i32;
            }
        }

        let misspelling_count: usize = self
            .config
            .common_misspellings
            .iter()
            .map(|word| lower_content.matches(word.as_str()).count())
            .sum();

        if misspelling_count > 2 {
            flags.push(Flag::new(
                "Poor Grammar/Spelling",
                Severity::Low,
                format!(
                    "{misspelling_count} spelling errors suggest a non-professional sender"
                ),
            ));
            score -= deductions.poor_grammar as i32;
        }

        log::debug!(
            "email analysis finished: raw score {score}, {} flag(s)",
            flags.len()
        );
        AnalysisResult::finalize(score, flags, SubjectKind::Email)
    }
}
