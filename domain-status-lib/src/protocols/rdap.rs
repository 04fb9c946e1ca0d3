//! RDAP (Registration Data Access Protocol) registry query.
//!
//! Only presence or absence of a registration record matters here: a 404
//! means no record, any 2xx means a record exists. Every other answer is
//! inconclusive and reported as an error so the checker can fall back.

use crate::error::DomainCheckError;
use crate::protocols::bounded;
use crate::types::DomainName;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Media type requested from RDAP servers.
pub const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// Conclusive answer from a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryOutcome {
    /// The registry has no record (HTTP 404)
    NotFound,
    /// The registry returned a record (HTTP 2xx)
    Found,
}

/// RDAP client for querying a registry about one domain.
#[derive(Clone)]
pub struct RdapClient {
    /// HTTP client for making RDAP requests
    http_client: Client,
    /// Bound for one query
    timeout: Option<Duration>,
}

impl RdapClient {
    pub fn new(http_client: Client, timeout: Option<Duration>) -> Self {
        Self {
            http_client,
            timeout,
        }
    }

    /// Build the query URL for a domain under an authority base URL.
    pub fn query_url(endpoint: &str, domain: &DomainName) -> String {
        format!("{}/domain/{}", endpoint.trim_end_matches('/'), domain)
    }

    /// Ask the registry at `endpoint` whether `domain` is registered.
    ///
    /// # Errors
    ///
    /// Returns `DomainCheckError` if:
    /// - The request fails or times out
    /// - The registry answers with anything other than 404 or 2xx
    pub async fn query(
        &self,
        endpoint: &str,
        domain: &DomainName,
    ) -> Result<RegistryOutcome, DomainCheckError> {
        let url = Self::query_url(endpoint, domain);
        tracing::debug!(domain = %domain, url = %url, "querying registry");

        bounded(self.timeout, "RDAP request", self.make_rdap_request(&url, domain)).await
    }

    async fn make_rdap_request(
        &self,
        url: &str,
        domain: &DomainName,
    ) -> Result<RegistryOutcome, DomainCheckError> {
        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, RDAP_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| DomainCheckError::rdap(domain.as_str(), format!("Request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(RegistryOutcome::NotFound),
            code if code.is_success() => Ok(RegistryOutcome::Found),
            code => Err(DomainCheckError::rdap_with_status(
                domain.as_str(),
                format!("RDAP server returned: {}", code),
                code.as_u16(),
            )),
        }
    }
}
