//! Authority resolution: static TLD table plus IANA bootstrap discovery.
//!
//! The static table is an immutable value built once and shared by every
//! check. Bootstrap discovery is performed fresh for every lookup that misses
//! the table; nothing discovered is remembered between requests.

use crate::error::DomainCheckError;
use crate::protocols::bounded;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Get the built-in RDAP authority mappings.
///
/// Maps TLD strings to the base URL of a registry that answers
/// `GET {base}/domain/{name}`. Base URLs carry no trailing slash.
pub fn builtin_authorities() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Popular gTLDs
        ("com", "https://rdap.verisign.com/com/v1"),
        ("net", "https://rdap.verisign.com/net/v1"),
        ("org", "https://rdap.publicinterestregistry.org/rdap"),
        ("info", "https://rdap.identitydigital.services/rdap"),
        ("biz", "https://rdap.nic.biz"),
        // Google Registry
        ("app", "https://pubapi.registry.google/rdap"),
        ("dev", "https://pubapi.registry.google/rdap"),
        ("page", "https://pubapi.registry.google/rdap"),
        // CentralNic
        ("xyz", "https://rdap.centralnic.com/xyz"),
        ("tech", "https://rdap.centralnic.com/tech"),
        ("online", "https://rdap.centralnic.com/online"),
        ("site", "https://rdap.centralnic.com/site"),
        ("website", "https://rdap.centralnic.com/website"),
        ("blog", "https://rdap.blog.fury.ca/rdap"),
        ("shop", "https://rdap.gmoregistry.net/rdap"),
        // Identity Digital
        ("ai", "https://rdap.identitydigital.services/rdap"),
        ("io", "https://rdap.identitydigital.services/rdap"),
        ("me", "https://rdap.identitydigital.services/rdap"),
        ("zone", "https://rdap.identitydigital.services/rdap"),
        ("digital", "https://rdap.identitydigital.services/rdap"),
        // ccTLDs
        ("us", "https://rdap.nic.us"),
        ("uk", "https://rdap.nominet.uk"),
        ("co.uk", "https://rdap.nominet.uk"),
        ("org.uk", "https://rdap.nominet.uk"),
        ("de", "https://rdap.denic.de"),
        ("ca", "https://rdap.ca.fury.ca/rdap"),
        ("au", "https://rdap.cctld.au/rdap"),
        ("fr", "https://rdap.nic.fr"),
        ("nl", "https://rdap.sidn.nl"),
        ("br", "https://rdap.registro.br"),
        ("in", "https://rdap.nixiregistry.in/rdap"),
        ("tv", "https://rdap.nic.tv"),
        ("cc", "https://tld-rdap.verisign.com/cc/v1"),
        ("cloud", "https://rdap.registry.cloud/rdap"),
    ])
}

/// Immutable TLD -> authority base URL table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityTable {
    entries: HashMap<String, String>,
}

impl AuthorityTable {
    /// Table holding the built-in mappings.
    pub fn builtin() -> Self {
        Self::from_entries(builtin_authorities())
    }

    /// Table holding exactly the given mappings.
    pub fn from_entries<I, T, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: AsRef<str>,
        U: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(tld, url)| (tld.as_ref().to_lowercase(), normalize_base_url(url.as_ref())))
            .collect();
        Self { entries }
    }

    /// Add or replace entries; the overrides win on conflict.
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (tld, url) in overrides {
            self.entries
                .insert(tld.to_lowercase(), normalize_base_url(url));
        }
        self
    }

    /// Exact-match lookup.
    pub fn get(&self, tld: &str) -> Option<&str> {
        self.entries.get(tld).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// One `[tldList, endpointUrlList]` pair from the bootstrap index.
type BootstrapService = (Vec<String>, Vec<String>);

/// The bootstrap index, either the IANA document or a bare list of pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BootstrapDocument {
    Index { services: Vec<BootstrapService> },
    Bare(Vec<BootstrapService>),
}

impl BootstrapDocument {
    fn services(&self) -> &[BootstrapService] {
        match self {
            Self::Index { services } => services,
            Self::Bare(services) => services,
        }
    }
}

/// Scan bootstrap services for the first entry serving `tld` with at least one URL.
fn find_endpoint(services: &[BootstrapService], tld: &str) -> Option<String> {
    services
        .iter()
        .find(|(tlds, urls)| !urls.is_empty() && tlds.iter().any(|t| t.eq_ignore_ascii_case(tld)))
        .and_then(|(_, urls)| urls.first())
        .map(|url| normalize_base_url(url))
}

/// Maps a TLD to the base URL of the registry that can answer for it.
#[derive(Clone)]
pub struct AuthorityResolver {
    table: Arc<AuthorityTable>,
    http_client: Client,
    bootstrap_url: String,
    use_bootstrap: bool,
    timeout: Option<Duration>,
}

impl AuthorityResolver {
    pub fn new(
        table: Arc<AuthorityTable>,
        http_client: Client,
        bootstrap_url: String,
        use_bootstrap: bool,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            table,
            http_client,
            bootstrap_url,
            use_bootstrap,
            timeout,
        }
    }

    /// The static table this resolver consults first.
    pub fn table(&self) -> &AuthorityTable {
        &self.table
    }

    /// Look up the authority for a TLD.
    ///
    /// Lookup flow:
    /// 1. Static table, exact match: no network I/O
    /// 2. One GET of the bootstrap index, first matching entry with a URL
    /// 3. Anything else is "no known authority" (`None`)
    pub async fn resolve(&self, tld: &str) -> Option<String> {
        if let Some(endpoint) = self.table.get(tld) {
            tracing::debug!(tld = %tld, endpoint = %endpoint, "authority from static table");
            return Some(endpoint.to_string());
        }

        if !self.use_bootstrap || !cfg!(feature = "bootstrap") {
            tracing::debug!(tld = %tld, "no static authority and bootstrap disabled");
            return None;
        }

        match self.discover(tld).await {
            Ok(endpoint) => {
                tracing::debug!(tld = %tld, endpoint = %endpoint, "authority from bootstrap");
                Some(endpoint)
            }
            Err(e) => {
                tracing::debug!(tld = %tld, error = %e, "no known authority");
                None
            }
        }
    }

    /// Fetch the bootstrap index and find the entry for `tld`.
    async fn discover(&self, tld: &str) -> Result<String, DomainCheckError> {
        let document = bounded(self.timeout, "bootstrap fetch", self.fetch_index(tld)).await?;

        find_endpoint(document.services(), tld).ok_or_else(|| {
            DomainCheckError::bootstrap(tld, "TLD not found in bootstrap registry")
        })
    }

    async fn fetch_index(&self, tld: &str) -> Result<BootstrapDocument, DomainCheckError> {
        let response = self
            .http_client
            .get(&self.bootstrap_url)
            .send()
            .await
            .map_err(|e| {
                DomainCheckError::bootstrap(tld, format!("Failed to fetch bootstrap registry: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(DomainCheckError::bootstrap(
                tld,
                format!("Bootstrap registry returned HTTP {}", response.status()),
            ));
        }

        let body = response.bytes().await?;
        let document = serde_json::from_slice::<BootstrapDocument>(&body).map_err(|e| {
            DomainCheckError::bootstrap(tld, format!("Invalid bootstrap JSON: {}", e))
        })?;

        Ok(document)
    }
}
