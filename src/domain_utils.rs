use regex::Regex;

/// Regex helpers shared by both analyzers, compiled once per analyzer.
pub struct ContentPatterns {
    sender_line: Regex,
    link: Regex,
}

impl ContentPatterns {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            sender_line: Regex::new(r"(?i)from:\s*([^\s@]+@[^\s@]+\.[^\s@]+)")?,
            link: Regex::new(r#"https?://[^\s<>"]+"#)?,
        })
    }

    /// Pull the sender address out of a `From:` line, lowercased.
    /// Returns None when the content carries no such line.
    pub fn extract_sender(&self, content: &str) -> Option<String> {
        self.sender_line
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }

    /// Collect every http(s) link in the content, in order of appearance.
    pub fn extract_links<'a>(&self, content: &'a str) -> Vec<&'a str> {
        self.link.find_iter(content).map(|m| m.as_str()).collect()
    }
}

/// Minimal domain hierarchy utilities
pub struct DomainUtils;

impl DomainUtils {
    /// Extract domain from email address
    pub fn extract_domain(email: &str) -> Option<String> {
        email.split('@').nth(1).map(|s| s.to_lowercase())
    }

    /// First dot-separated label of a domain, the part the link-mismatch
    /// rule compares against ("paypal" for "paypal.com").
    pub fn root_label(domain: &str) -> &str {
        domain.split('.').next().unwrap_or(domain)
    }

    /// Check whether a hostname sits under any domain in the list
    /// (exact match or suffix match on a label boundary).
    pub fn matches_domain_list(hostname: &str, domain_list: &[String]) -> bool {
        let host_lower = hostname.to_lowercase();

        for pattern in domain_list {
            let pattern_lower = pattern.to_lowercase();

            if host_lower == pattern_lower {
                return true;
            }

            if host_lower.ends_with(&format!(".{}", pattern_lower)) {
                return true;
            }
        }

        false
    }
}
