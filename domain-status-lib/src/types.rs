//! Core data types for domain availability resolution.
//!
//! This module defines the main data structures used throughout the library:
//! validated domain names, per-domain results, batches and checker configuration.

use crate::error::DomainCheckError;
use crate::utils::{extract_tld, normalize_domain, validate_domain};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default IANA RDAP bootstrap index for DNS names.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Default DNS-over-HTTPS resolver speaking the JSON API.
pub const DEFAULT_DNS_RESOLVER_URL: &str = "https://dns.google/resolve";

/// Default bound for each individual network hop.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A normalized, validated domain name with at least two labels.
///
/// The only way to obtain one is [`DomainName::parse`], so holding a
/// `DomainName` means the name is checkable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Trim, lower-case and validate a raw domain entry.
    pub fn parse(raw: &str) -> Result<Self, DomainCheckError> {
        let normalized = normalize_domain(raw);
        validate_domain(&normalized)?;
        Ok(Self(normalized))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The TLD: everything after the first label.
    pub fn tld(&self) -> &str {
        // Validation guarantees at least two non-empty labels.
        extract_tld(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Availability classification of one domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// No registration record exists
    Available,
    /// A registration record exists (or the name resolves)
    Registered,
    /// Every method failed or the name could not be checked
    Unknown,
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Available => write!(f, "available"),
            DomainStatus::Registered => write!(f, "registered"),
            DomainStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which hop produced a classification. Diagnostic only, never sent on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMethod {
    /// Answered by the RDAP registry query
    Registry,
    /// Answered by the DNS-over-HTTPS probe
    Dns,
    /// No hop answered (invalid name or every hop failed)
    #[default]
    None,
}

impl fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckMethod::Registry => write!(f, "registry"),
            CheckMethod::Dns => write!(f, "dns"),
            CheckMethod::None => write!(f, "none"),
        }
    }
}

/// Result of checking one domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainCheckResult {
    /// The normalized domain that was checked
    pub domain: String,

    /// The classification
    pub status: DomainStatus,

    /// Which hop produced the status
    #[serde(skip)]
    pub method: CheckMethod,
}

impl DomainCheckResult {
    pub fn new<D: Into<String>>(domain: D, status: DomainStatus, method: CheckMethod) -> Self {
        Self {
            domain: domain.into(),
            status,
            method,
        }
    }

    /// Result for a name that never reached the network.
    pub fn unchecked<D: Into<String>>(domain: D) -> Self {
        Self::new(domain, DomainStatus::Unknown, CheckMethod::None)
    }
}

/// Ordered results for one batch request. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CheckBatch(pub Vec<DomainCheckResult>);

impl CheckBatch {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DomainCheckResult> {
        self.0.iter()
    }

    /// Number of entries that ended up `unknown`.
    pub fn unknown_count(&self) -> usize {
        self.0
            .iter()
            .filter(|r| r.status == DomainStatus::Unknown)
            .count()
    }
}

/// Configuration options for domain checking.
///
/// Collaborator URLs are configurable so that tests (and private deployments)
/// can point the checker at their own bootstrap index, registries and resolver.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Bound for each individual network hop. `None` means no bound.
    /// Default: 5 seconds
    pub timeout: Option<Duration>,

    /// Whether to consult the bootstrap index for TLDs missing from the static table.
    /// Default: true
    pub enable_bootstrap: bool,

    /// Bootstrap index URL.
    pub bootstrap_url: String,

    /// DNS-over-HTTPS JSON API URL used for the fallback probe.
    pub dns_resolver_url: String,

    /// Extra or replacement static authority entries (TLD -> base URL).
    pub authority_overrides: HashMap<String, String>,

    /// Whether the built-in authority table is used at all.
    /// Default: true
    pub use_builtin_authorities: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            enable_bootstrap: true,
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            dns_resolver_url: DEFAULT_DNS_RESOLVER_URL.to_string(),
            authority_overrides: HashMap::new(),
            use_builtin_authorities: true,
        }
    }
}

impl CheckConfig {
    /// Set the per-hop timeout. A zero duration disables the bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        self
    }

    /// Enable or disable bootstrap discovery.
    pub fn with_bootstrap(mut self, enabled: bool) -> Self {
        self.enable_bootstrap = enabled;
        self
    }

    /// Point bootstrap discovery at another index.
    pub fn with_bootstrap_url<U: Into<String>>(mut self, url: U) -> Self {
        self.bootstrap_url = url.into();
        self
    }

    /// Point the DNS fallback probe at another resolver.
    pub fn with_dns_resolver_url<U: Into<String>>(mut self, url: U) -> Self {
        self.dns_resolver_url = url.into();
        self
    }

    /// Add or replace a static authority entry.
    pub fn with_authority<T: Into<String>, U: Into<String>>(mut self, tld: T, url: U) -> Self {
        self.authority_overrides
            .insert(tld.into().to_lowercase(), url.into());
        self
    }

    /// Use only the configured overrides as the static table.
    pub fn without_builtin_authorities(mut self) -> Self {
        self.use_builtin_authorities = false;
        self
    }
}
