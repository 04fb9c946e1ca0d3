//! Main domain checker implementation.
//!
//! This module provides the `DomainChecker` that classifies one domain by
//! walking authority resolution, the RDAP registry query and the DNS probe.

use crate::error::DomainCheckError;
use crate::protocols::{
    AuthorityResolver, AuthorityTable, DnsProbe, DnsProbeOutcome, RdapClient, RegistryOutcome,
};
use crate::types::{CheckConfig, CheckMethod, DomainCheckResult, DomainName, DomainStatus};
use reqwest::Client;
use std::sync::Arc;

/// User agent sent on every outbound request.
const USER_AGENT: &str = concat!("domain-status/", env!("CARGO_PKG_VERSION"));

/// Coordinates availability checking for single domains.
///
/// A checker holds no per-request state: the authority table is immutable
/// and the HTTP client is a shared connection pool, so one instance can
/// serve any number of concurrent checks.
///
/// # Example
///
/// ```rust,no_run
/// use domain_status_lib::{CheckConfig, DomainChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = DomainChecker::with_config(CheckConfig::default())?;
///     let result = checker.check_domain("example.com").await;
///     println!("{}: {}", result.domain, result.status);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainChecker {
    /// Configuration settings for this checker instance
    config: CheckConfig,
    /// Static table plus bootstrap discovery
    resolver: AuthorityResolver,
    /// Registry query client
    rdap_client: RdapClient,
    /// DNS fallback probe
    dns_probe: DnsProbe,
}

impl DomainChecker {
    /// Create a checker with the default configuration.
    pub fn new() -> Result<Self, DomainCheckError> {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker with custom configuration.
    ///
    /// The static authority table is built here, once, from the built-in
    /// mappings and the configured overrides.
    pub fn with_config(config: CheckConfig) -> Result<Self, DomainCheckError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                DomainCheckError::network_with_source("Failed to create HTTP client", e.to_string())
            })?;

        let base = if config.use_builtin_authorities {
            AuthorityTable::builtin()
        } else {
            AuthorityTable::default()
        };
        let table = Arc::new(base.with_overrides(&config.authority_overrides));

        let resolver = AuthorityResolver::new(
            table,
            http_client.clone(),
            config.bootstrap_url.clone(),
            config.enable_bootstrap,
            config.timeout,
        );
        let rdap_client = RdapClient::new(http_client.clone(), config.timeout);
        let dns_probe = DnsProbe::new(http_client, config.dns_resolver_url.clone(), config.timeout);

        Ok(Self {
            config,
            resolver,
            rdap_client,
            dns_probe,
        })
    }

    /// Check availability of a single raw domain entry.
    ///
    /// The entry is trimmed and lower-cased first. Names that do not validate
    /// are `unknown` without any network activity. This never fails: every
    /// hop error becomes either the next fallback or an `unknown` status.
    pub async fn check_domain(&self, raw: &str) -> DomainCheckResult {
        match DomainName::parse(raw) {
            Ok(domain) => self.check_name(&domain).await,
            Err(e) => {
                tracing::debug!(error = %e, "domain not checkable");
                DomainCheckResult::unchecked(crate::utils::normalize_domain(raw))
            }
        }
    }

    /// Check availability of an already validated name.
    ///
    /// The checking process:
    /// 1. Resolve the authority for the name's TLD
    /// 2. With an authority, query the registry: 404 is available, 2xx registered
    /// 3. Without an authority, or on any other registry answer, probe DNS:
    ///    NXDOMAIN is available, any other response code registered
    /// 4. If the probe itself fails, the status is unknown
    pub async fn check_name(&self, domain: &DomainName) -> DomainCheckResult {
        if let Some(endpoint) = self.resolver.resolve(domain.tld()).await {
            match self.rdap_client.query(&endpoint, domain).await {
                Ok(outcome) => {
                    let status = match outcome {
                        RegistryOutcome::NotFound => DomainStatus::Available,
                        RegistryOutcome::Found => DomainStatus::Registered,
                    };
                    return self.finish(domain, status, CheckMethod::Registry);
                }
                Err(e) => {
                    tracing::debug!(domain = %domain, error = %e, "registry query inconclusive, probing DNS");
                }
            }
        }

        match self.dns_probe.probe(domain).await {
            Ok(DnsProbeOutcome::NonExistent) => {
                self.finish(domain, DomainStatus::Available, CheckMethod::Dns)
            }
            Ok(DnsProbeOutcome::Exists(rcode)) => {
                tracing::debug!(domain = %domain, rcode, "name exists in DNS");
                self.finish(domain, DomainStatus::Registered, CheckMethod::Dns)
            }
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "all checking methods failed");
                self.finish(domain, DomainStatus::Unknown, CheckMethod::None)
            }
        }
    }

    fn finish(
        &self,
        domain: &DomainName,
        status: DomainStatus,
        method: CheckMethod,
    ) -> DomainCheckResult {
        tracing::debug!(domain = %domain, status = %status, method = %method, "domain check completed");
        DomainCheckResult::new(domain.as_str(), status, method)
    }

    /// Get the configuration for this checker.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// The static authority table in use.
    pub fn authorities(&self) -> &AuthorityTable {
        self.resolver.table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{any, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Checker whose every collaborator lives on `server`, with `test` mapped
    /// to `{server}/registry`.
    fn mocked_checker(server: &MockServer) -> DomainChecker {
        let config = CheckConfig::default()
            .without_builtin_authorities()
            .with_authority("test", format!("{}/registry", server.uri()))
            .with_bootstrap_url(format!("{}/bootstrap.json", server.uri()))
            .with_dns_resolver_url(format!("{}/resolve", server.uri()))
            .with_timeout(Duration::from_secs(2));
        DomainChecker::with_config(config).unwrap()
    }

    fn dns_status(status: u32) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Status": status }))
    }

    #[tokio::test]
    async fn test_single_label_is_unknown_without_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let checker = mocked_checker(&server);
        for raw in ["localhost", "  LOCALHOST ", "", "com", "bad..name", "bad name.test", "a/b.test"] {
            let result = checker.check_domain(raw).await;
            assert_eq!(result.status, DomainStatus::Unknown, "{:?}", raw);
            assert_eq!(result.method, CheckMethod::None);
        }
        assert_eq!(checker.check_domain("  LOCALHOST ").await.domain, "localhost");
    }

    #[tokio::test]
    async fn test_non_ldh_names_reach_the_registry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex("^/registry/domain/"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&server)
            .await;

        let checker = mocked_checker(&server);
        for (raw, normalized) in [
            ("bücher.test", "bücher.test"),
            ("my_site.test", "my_site.test"),
            ("Example.TEST.", "example.test"),
        ] {
            let result = checker.check_domain(raw).await;
            assert_eq!(result.domain, normalized);
            assert_eq!(result.status, DomainStatus::Available, "{:?}", raw);
            assert_eq!(result.method, CheckMethod::Registry);
        }
    }

    #[tokio::test]
    async fn test_trailing_dot_name_queries_without_the_dot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registry/domain/rooted.test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = mocked_checker(&server).check_domain("rooted.test.").await;
        assert_eq!(result.domain, "rooted.test");
        assert_eq!(result.status, DomainStatus::Registered);
    }

    #[tokio::test]
    async fn test_registry_404_is_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registry/domain/free.test"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/resolve"))
            .respond_with(dns_status(0))
            .expect(0)
            .mount(&server)
            .await;

        let result = mocked_checker(&server).check_domain("FREE.test").await;
        assert_eq!(result.domain, "free.test");
        assert_eq!(result.status, DomainStatus::Available);
        assert_eq!(result.method, CheckMethod::Registry);
    }

    #[tokio::test]
    async fn test_registry_2xx_is_registered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registry/domain/taken.test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let result = mocked_checker(&server).check_domain("taken.test").await;
        assert_eq!(result.status, DomainStatus::Registered);
        assert_eq!(result.method, CheckMethod::Registry);
    }

    #[tokio::test]
    async fn test_registry_error_falls_through_to_dns() {
        let server = MockServer::start().await;
        Mock::given(path("/registry/domain/flaky.test"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/resolve"))
            .and(query_param("name", "flaky.test"))
            .respond_with(dns_status(3))
            .expect(1)
            .mount(&server)
            .await;

        let result = mocked_checker(&server).check_domain("flaky.test").await;
        assert_eq!(result.status, DomainStatus::Available);
        assert_eq!(result.method, CheckMethod::Dns);
    }

    #[tokio::test]
    async fn test_unknown_tld_and_failed_bootstrap_uses_dns() {
        let server = MockServer::start().await;
        Mock::given(path("/bootstrap.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(path("/resolve"))
            .and(query_param("name", "gone.zz"))
            .respond_with(dns_status(3))
            .mount(&server)
            .await;
        Mock::given(path("/resolve"))
            .and(query_param("name", "here.zz"))
            .respond_with(dns_status(0))
            .mount(&server)
            .await;

        let checker = mocked_checker(&server);
        assert_eq!(
            checker.check_domain("gone.zz").await.status,
            DomainStatus::Available
        );
        assert_eq!(
            checker.check_domain("here.zz").await.status,
            DomainStatus::Registered
        );
    }

    #[tokio::test]
    async fn test_bootstrap_discovered_authority_is_queried() {
        let server = MockServer::start().await;
        Mock::given(path("/bootstrap.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "services": [[["zz"], [format!("{}/zz-registry/", server.uri())]]]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/zz-registry/domain/found.zz"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = mocked_checker(&server).check_domain("found.zz").await;
        assert_eq!(result.status, DomainStatus::Registered);
        assert_eq!(result.method, CheckMethod::Registry);
    }

    #[tokio::test]
    async fn test_every_hop_failing_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(path("/registry/domain/dark.test"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        Mock::given(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = mocked_checker(&server).check_domain("dark.test").await;
        assert_eq!(result.status, DomainStatus::Unknown);
        assert_eq!(result.method, CheckMethod::None);
    }

    #[tokio::test]
    async fn test_registry_timeout_falls_through_to_dns() {
        let server = MockServer::start().await;
        Mock::given(path("/registry/domain/slow.test"))
            .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        Mock::given(path("/resolve"))
            .respond_with(dns_status(0))
            .expect(1)
            .mount(&server)
            .await;

        let config = CheckConfig::default()
            .without_builtin_authorities()
            .with_authority("test", format!("{}/registry", server.uri()))
            .with_dns_resolver_url(format!("{}/resolve", server.uri()))
            .with_timeout(Duration::from_millis(200));
        let checker = DomainChecker::with_config(config).unwrap();

        let result = checker.check_domain("slow.test").await;
        assert_eq!(result.status, DomainStatus::Registered);
        assert_eq!(result.method, CheckMethod::Dns);
    }

    #[test]
    fn test_authority_table_built_from_config() {
        let checker = DomainChecker::with_config(
            CheckConfig::default().with_authority("example", "https://rdap.example/"),
        )
        .unwrap();
        assert_eq!(
            checker.authorities().get("example"),
            Some("https://rdap.example")
        );
        assert!(checker.authorities().get("com").is_some());
    }
}
