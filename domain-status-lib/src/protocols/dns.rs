//! DNS-over-HTTPS fallback probe.
//!
//! Queries a resolver speaking the JSON API (`?name=...&type=A`) and reads
//! the numeric response code from the `Status` member. Only the response
//! code matters; answers and authority sections are ignored.

use crate::error::DomainCheckError;
use crate::protocols::bounded;
use crate::types::DomainName;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Media type of the JSON DNS API.
pub const DNS_JSON_MEDIA_TYPE: &str = "application/dns-json";

/// DNS response code for a name that does not exist.
pub const NXDOMAIN: u32 = 3;

#[derive(Debug, Deserialize)]
struct DnsJsonResponse {
    #[serde(rename = "Status")]
    status: u32,
}

/// What the probe learned about a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsProbeOutcome {
    /// The resolver answered NXDOMAIN
    NonExistent,
    /// Any other response code, carried for diagnostics
    Exists(u32),
}

impl DnsProbeOutcome {
    fn from_rcode(rcode: u32) -> Self {
        if rcode == NXDOMAIN {
            Self::NonExistent
        } else {
            Self::Exists(rcode)
        }
    }
}

/// DNS-over-HTTPS client for A-record probes.
#[derive(Clone)]
pub struct DnsProbe {
    http_client: Client,
    resolver_url: String,
    timeout: Option<Duration>,
}

impl DnsProbe {
    pub fn new(http_client: Client, resolver_url: String, timeout: Option<Duration>) -> Self {
        Self {
            http_client,
            resolver_url,
            timeout,
        }
    }

    /// Issue one A-record lookup for `domain`.
    ///
    /// # Errors
    ///
    /// Returns `DomainCheckError` if the request fails or times out, the
    /// resolver answers with a non-2xx status, or the body is not DNS JSON.
    pub async fn probe(&self, domain: &DomainName) -> Result<DnsProbeOutcome, DomainCheckError> {
        bounded(self.timeout, "DNS probe", self.lookup(domain)).await
    }

    async fn lookup(&self, domain: &DomainName) -> Result<DnsProbeOutcome, DomainCheckError> {
        let response = self
            .http_client
            .get(&self.resolver_url)
            .query(&[("name", domain.as_str()), ("type", "A")])
            .header(ACCEPT, DNS_JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| DomainCheckError::dns(domain.as_str(), format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainCheckError::dns(
                domain.as_str(),
                format!("Resolver returned HTTP {}", response.status()),
            ));
        }

        let body = response.bytes().await?;
        let parsed: DnsJsonResponse = serde_json::from_slice(&body).map_err(|e| {
            DomainCheckError::dns(domain.as_str(), format!("Invalid resolver response: {}", e))
        })?;

        Ok(DnsProbeOutcome::from_rcode(parsed.status))
    }
}
