//! Protocol implementations for domain checking.
//!
//! This module contains the three network hops used to classify a domain:
//! authority discovery, the RDAP registry query and the DNS-over-HTTPS probe.

use crate::error::DomainCheckError;
use std::future::Future;
use std::time::Duration;

/// Static authority table and IANA bootstrap discovery
pub mod registry;

/// RDAP registry query
pub mod rdap;

/// DNS-over-HTTPS fallback probe
pub mod dns;

pub use dns::{DnsProbe, DnsProbeOutcome};
pub use rdap::{RdapClient, RegistryOutcome};
pub use registry::{builtin_authorities, AuthorityResolver, AuthorityTable};

/// Run one network hop under the optional per-call bound.
///
/// An elapsed bound becomes `DomainCheckError::Timeout`, so callers handle it
/// like any other transport failure.
pub(crate) async fn bounded<T, F>(
    timeout: Option<Duration>,
    operation: &str,
    fut: F,
) -> Result<T, DomainCheckError>
where
    F: Future<Output = Result<T, DomainCheckError>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(DomainCheckError::timeout(operation, limit)),
        },
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through() {
        let value = bounded(Some(Duration::from_secs(1)), "noop", async {
            Ok::<_, DomainCheckError>(7)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result = bounded(Some(Duration::from_millis(10)), "sleepy hop", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, DomainCheckError>(())
        })
        .await;

        match result {
            Err(DomainCheckError::Timeout { operation, .. }) => assert_eq!(operation, "sleepy hop"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unbounded_waits() {
        let value = bounded(None, "noop", async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, DomainCheckError>("done")
        })
        .await
        .unwrap();
        assert_eq!(value, "done");
    }
}
