//! Utility functions for domain processing and validation.
//!
//! This module contains helper functions for domain name normalization,
//! validation and TLD derivation used throughout the library.

use crate::error::DomainCheckError;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum length of a full domain name in its textual form.
const MAX_DOMAIN_LEN: usize = 253;

lazy_static! {
    /// Characters that cannot appear in a name placed in a query path.
    static ref FORBIDDEN_RE: Regex = Regex::new(r"[\s/]").expect("forbidden-character regex is valid");
}

/// Normalize a raw domain entry: trim surrounding whitespace, lower-case and
/// drop a single trailing root dot (`example.com.` -> `example.com`).
pub fn normalize_domain(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Validate an already normalized domain name.
///
/// Only names that cannot be queried at all are rejected: fewer than two
/// non-empty labels, whitespace or `/`, or more than 253 characters.
/// Internationalized labels, underscores and other characters pass through
/// to the registry and resolver unchanged.
pub fn validate_domain(domain: &str) -> Result<(), DomainCheckError> {
    if domain.is_empty() {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if domain.chars().count() > MAX_DOMAIN_LEN {
        return Err(DomainCheckError::invalid_domain(
            domain,
            format!("Domain name longer than {} characters", MAX_DOMAIN_LEN),
        ));
    }

    if FORBIDDEN_RE.is_match(domain) {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Domain contains whitespace or '/'",
        ));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Domain must contain at least two labels",
        ));
    }

    if labels.iter().any(|label| label.is_empty()) {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Domain contains an empty label",
        ));
    }

    Ok(())
}

/// Derive the TLD of a domain: everything after the first label.
///
/// `example.com` -> `com`, `example.co.uk` -> `co.uk`. Returns `None` for a
/// single-label name.
pub fn extract_tld(domain: &str) -> Option<&str> {
    domain
        .split_once('.')
        .map(|(_, tld)| tld)
        .filter(|tld| !tld.is_empty())
}
