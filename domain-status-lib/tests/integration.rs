// domain-status-lib/tests/integration.rs

//! Integration tests for domain-status-lib exports and core functionality

use domain_status_lib::{
    builtin_authorities, normalize_domain, BatchRequest, CheckConfig, DomainChecker,
    DomainName, DomainStatus, MAX_BATCH_SIZE,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_library_exports_work() {
    let authorities = builtin_authorities();
    assert!(!authorities.is_empty());
    assert_eq!(authorities.get("com"), Some(&"https://rdap.verisign.com/com/v1"));
    assert!(authorities.contains_key("org"));

    assert_eq!(normalize_domain("  Example.COM "), "example.com");
    assert_eq!(MAX_BATCH_SIZE, 10);

    let info = domain_status_lib::info();
    assert_eq!(info.version, domain_status_lib::VERSION);
}

#[test]
fn test_builtin_urls_are_bare_https_bases() {
    for (tld, url) in builtin_authorities() {
        assert!(url.starts_with("https://"), "{} -> {}", tld, url);
        assert!(!url.ends_with('/'), "{} -> {}", tld, url);
        assert_eq!(tld, tld.to_lowercase());
    }
}

#[test]
fn test_domain_name_tld_is_everything_after_first_label() {
    assert_eq!(DomainName::parse("example.com").unwrap().tld(), "com");
    assert_eq!(DomainName::parse("example.co.uk").unwrap().tld(), "co.uk");
    assert!(DomainName::parse("localhost").is_err());
}

#[test]
fn test_result_serialization_is_domain_and_status_only() {
    let result = domain_status_lib::DomainCheckResult::new(
        "example.com",
        DomainStatus::Registered,
        domain_status_lib::CheckMethod::Registry,
    );
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "domain": "example.com", "status": "registered" })
    );
}

/// Full pipeline against local mocks: bootstrap discovery, registry, DNS.
#[tokio::test]
async fn test_batch_through_every_hop() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bootstrap.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.0",
            "services": [
                [["boot"], [format!("{}/boot-registry/", server.uri())]],
                [["empty"], []]
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(path("/boot-registry/domain/taken.boot"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/boot-registry/domain/free.boot"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/resolve"))
        .and(query_param("name", "ghost.empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": 3 })))
        .mount(&server)
        .await;
    Mock::given(path("/resolve"))
        .and(query_param("name", "alive.empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": 0 })))
        .mount(&server)
        .await;

    let config = CheckConfig::default()
        .without_builtin_authorities()
        .with_bootstrap_url(format!("{}/bootstrap.json", server.uri()))
        .with_dns_resolver_url(format!("{}/resolve", server.uri()))
        .with_timeout(Duration::from_secs(2));
    let checker = DomainChecker::with_config(config).unwrap();

    let request = BatchRequest::from_json(&json!({
        "domains": ["Taken.BOOT", "free.boot", "ghost.empty", "alive.empty", "nodot"]
    }))
    .unwrap();
    let batch = checker.check_batch(&request).await;

    let statuses: Vec<DomainStatus> = batch.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            DomainStatus::Registered,
            DomainStatus::Available,
            DomainStatus::Available,
            DomainStatus::Registered,
            DomainStatus::Unknown,
        ]
    );
    assert_eq!(batch.iter().next().unwrap().domain, "taken.boot");
    assert_eq!(
        serde_json::to_value(&batch).unwrap()[4],
        json!({ "domain": "nodot", "status": "unknown" })
    );
}

#[tokio::test]
async fn test_unreachable_collaborators_give_unknown() {
    // Nothing listens on the discard port.
    let config = CheckConfig::default()
        .without_builtin_authorities()
        .with_authority("test", "http://127.0.0.1:9")
        .with_bootstrap(false)
        .with_dns_resolver_url("http://127.0.0.1:9/resolve")
        .with_timeout(Duration::from_secs(2));
    let checker = DomainChecker::with_config(config).unwrap();

    let result = checker.check_domain("example.test").await;
    assert_eq!(result.domain, "example.test");
    assert_eq!(result.status, DomainStatus::Unknown);
}
