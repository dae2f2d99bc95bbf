//! Trusted download-link extraction from HTML.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::VaultError;

/// Finds `href` values that point at trusted download hosts.
///
/// A link qualifies when it is quoted (single or double), uses http or
/// https, and its host is a trusted domain or one subdomain label in front
/// of one. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    // `None` when no domain is trusted: nothing can match.
    pattern: Option<Regex>,
}

impl LinkExtractor {
    /// Builds an extractor for the given domains.
    ///
    /// # Errors
    /// `VaultError::InvalidPattern` if the combined pattern cannot be
    /// compiled (for example, an absurdly long domain list).
    pub fn new<I, S>(trusted_domains: I) -> Result<Self, VaultError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = trusted_domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_string())
            .filter(|d| !d.is_empty())
            .map(|d| regex::escape(&d))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = format!(
            r#"href=["'](https?://(?:[a-z0-9-]+\.)?(?:{})/[^"']+)["']"#,
            alternatives.join("|")
        );
        let pattern = RegexBuilder::new(&source).case_insensitive(true).build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Returns the distinct trusted URLs in `html`, in order of first
    /// appearance.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        pattern
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}
