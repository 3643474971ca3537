use serde::{Deserialize, Serialize};

/// Rule tables and deduction weights for both analyzers.
///
/// Loaded once, shared read-only for the life of the process. The
/// defaults carry the built-in tables; a YAML file with the same shape
/// can replace any of them without touching analyzer code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub known_malicious_senders: Vec<String>,
    pub red_flag_domains: Vec<String>,
    pub phishing_keywords: Vec<String>,
    pub sensitive_patterns: Vec<SensitivePattern>,
    pub legitimate_brands: Vec<BrandDomain>,
    pub url_shorteners: Vec<String>,
    pub typosquat_patterns: Vec<String>,
    pub common_misspellings: Vec<String>,
    pub email_deductions: EmailDeductions,
    pub url_deductions: UrlDeductions,
}

/// A labeled regex matching a request for sensitive data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivePattern {
    pub label: String,
    pub pattern: String,
}

/// A brand name paired with its canonical domain, used for
/// impersonation checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandDomain {
    pub name: String,
    pub canonical_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDeductions {
    pub known_malicious_sender: u32,
    pub high_risk_domain: u32,
    pub domain_impersonation: u32,
    pub multiple_phishing_keywords: u32,
    pub urgency_tactics: u32,
    pub sensitive_data_request: u32,
    pub malformed_url: u32,
    pub mismatched_link_domain: u32,
    pub malicious_link_domain: u32,
    pub shortened_url: u32,
    pub poor_grammar: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlDeductions {
    pub high_risk_domain: u32,
    pub insecure_connection: u32,
    pub typosquatting: u32,
    pub long_domain: u32,
    pub excessive_subdomains: u32,
    pub suspicious_format: u32,
    pub homograph: u32,
    pub ip_address: u32,
    pub url_shortener: u32,
}

impl Default for EmailDeductions {
    fn default() -> Self {
        Self {
            known_malicious_sender: 45,
            high_risk_domain: 35,
            domain_impersonation: 45,
            multiple_phishing_keywords: 35,
            urgency_tactics: 15,
            sensitive_data_request: 40,
            malformed_url: 10,
            mismatched_link_domain: 20,
            malicious_link_domain: 35,
            shortened_url: 15,
            poor_grammar: 10,
        }
    }
}

impl Default for UrlDeductions {
    fn default() -> Self {
        Self {
            high_risk_domain: 50,
            insecure_connection: 30,
            typosquatting: 40,
            long_domain: 15,
            excessive_subdomains: 20,
            suspicious_format: 10,
            homograph: 35,
            ip_address: 40,
            url_shortener: 25,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

        RuleConfig {
            known_malicious_senders: strings(&[
                "support@paypal.verify.com",
                "admin@updatemybank.ru",
                "security@bankofamerica-update.com",
                "noreply@amazon.secure-verify.net",
                "account@microsoft-security.co",
                "service@apple-id-locked.org",
            ]),
            red_flag_domains: strings(&[
                "xyz",
                "tk",
                "ml",
                "ga",
                "cf",
                "phishing.com",
                "scamlink.net",
                "secure-bank.tk",
                "paypal-verify.ml",
                "amazon-security.xyz",
            ]),
            phishing_keywords: strings(&[
                "urgent",
                "verify account",
                "suspended",
                "click here",
                "act now",
                "limited time",
                "congratulations",
                "you've won",
                "claim now",
                "update payment",
                "confirm identity",
                "security alert",
                "unusual activity",
                "account locked",
                "expires today",
                "final notice",
            ]),
            sensitive_patterns: vec![
                SensitivePattern {
                    label: "credit card number".to_string(),
                    pattern: r"\b\d{4}[-\s]\d{4}[-\s]\d{4}[-\s]\d{4}\b".to_string(),
                },
                SensitivePattern {
                    label: "social security number".to_string(),
                    pattern: r"\b\d{3}[-\s]\d{2}[-\s]\d{4}\b".to_string(),
                },
                SensitivePattern {
                    label: "password".to_string(),
                    pattern: r"(?i)password\s*[:=]\s*\w+".to_string(),
                },
                SensitivePattern {
                    label: "PIN".to_string(),
                    pattern: r"(?i)pin\s*[:=]\s*\d+".to_string(),
                },
                SensitivePattern {
                    label: "routing number".to_string(),
                    pattern: r"(?i)routing\s+number".to_string(),
                },
                SensitivePattern {
                    label: "account number".to_string(),
                    pattern: r"(?i)account\s+number".to_string(),
                },
            ],
            legitimate_brands: vec![
                BrandDomain {
                    name: "paypal".to_string(),
                    canonical_domain: "paypal.com".to_string(),
                },
                BrandDomain {
                    name: "amazon".to_string(),
                    canonical_domain: "amazon.com".to_string(),
                },
                BrandDomain {
                    name: "microsoft".to_string(),
                    canonical_domain: "microsoft.com".to_string(),
                },
                BrandDomain {
                    name: "apple".to_string(),
                    canonical_domain: "apple.com".to_string(),
                },
                BrandDomain {
                    name: "google".to_string(),
                    canonical_domain: "google.com".to_string(),
                },
                BrandDomain {
                    name: "facebook".to_string(),
                    canonical_domain: "facebook.com".to_string(),
                },
            ],
            url_shorteners: strings(&[
                "bit.ly",
                "tinyurl.com",
                "t.co",
                "goo.gl",
                "ow.ly",
                "short.link",
                "is.gd",
                "v.gd",
                "tiny.cc",
            ]),
            typosquat_patterns: strings(&[
                "secure-",
                "-bank",
                "verify-",
                "-secure",
                "bank-",
                "-verify",
                "paypal-",
                "-paypal",
                "amazon-",
                "-amazon",
                "microsoft-",
                "-microsoft",
                "apple-",
                "-apple",
                "google-",
                "-google",
                "facebook-",
                "-facebook",
            ]),
            common_misspellings: strings(&[
                "recieve",
                "seperate",
                "definately",
                "occured",
                "accomodate",
                "necesary",
            ]),
            email_deductions: EmailDeductions::default(),
            url_deductions: UrlDeductions::default(),
        }
    }
}

impl RuleConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RuleConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_populated() {
        let config = RuleConfig::default();
        assert_eq!(config.known_malicious_senders.len(), 6);
        assert_eq!(config.phishing_keywords.len(), 16);
        assert_eq!(config.sensitive_patterns.len(), 6);
        assert_eq!(config.legitimate_brands.len(), 6);
        assert!(config.red_flag_domains.contains(&"ml".to_string()));
        assert!(config.url_shorteners.contains(&"bit.ly".to_string()));
    }

    #[test]
    fn test_default_patterns_compile() {
        let config = RuleConfig::default();
        for entry in &config.sensitive_patterns {
            assert!(
                regex::Regex::new(&entry.pattern).is_ok(),
                "pattern for {} should compile",
                entry.label
            );
        }
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = RuleConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: RuleConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            parsed.known_malicious_senders,
            config.known_malicious_senders
        );
        assert_eq!(
            parsed.email_deductions.known_malicious_sender,
            config.email_deductions.known_malicious_sender
        );
    }
}
