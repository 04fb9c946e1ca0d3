//! Batch orchestration: request validation, the size cap and concurrent fan-out.

use crate::checker::DomainChecker;
use crate::error::DomainCheckError;
use crate::types::{CheckBatch, DomainCheckResult};
use crate::utils::normalize_domain;
use futures::future::join_all;
use serde_json::Value;
use std::time::Instant;

/// Maximum number of entries checked per request. Extra entries are dropped.
///
/// This cap is the only bound on outbound concurrency for a batch.
pub const MAX_BATCH_SIZE: usize = 10;

/// A structurally valid batch request: normalized, truncated entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    domains: Vec<String>,
    /// Entries that were not JSON strings; never checked.
    non_string: Vec<bool>,
}

impl BatchRequest {
    /// Validate a decoded request body.
    ///
    /// # Errors
    ///
    /// `DomainCheckError::InvalidRequest` if the body is not an object, or
    /// `domains` is missing, not an array, or empty.
    pub fn from_json(body: &Value) -> Result<Self, DomainCheckError> {
        let object = body
            .as_object()
            .ok_or_else(|| DomainCheckError::invalid_request("Request body must be a JSON object"))?;

        let entries = match object.get("domains") {
            None | Some(Value::Null) => {
                return Err(DomainCheckError::invalid_request(
                    "Missing 'domains': expected a non-empty array of domain names",
                ))
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(DomainCheckError::invalid_request(
                    "'domains' must be an array of domain names",
                ))
            }
        };

        if entries.is_empty() {
            return Err(DomainCheckError::invalid_request(
                "'domains' must contain at least one domain name",
            ));
        }

        let (domains, non_string) = entries
            .iter()
            .take(MAX_BATCH_SIZE)
            .map(|entry| match entry {
                Value::String(s) => (normalize_domain(s), false),
                other => (normalize_domain(&other.to_string()), true),
            })
            .unzip();

        Ok(Self {
            domains,
            non_string,
        })
    }

    /// Build a request from raw strings, applying the same normalization and cap.
    ///
    /// # Errors
    ///
    /// `DomainCheckError::InvalidRequest` if `raw` is empty.
    pub fn from_strings<S: AsRef<str>>(raw: &[S]) -> Result<Self, DomainCheckError> {
        if raw.is_empty() {
            return Err(DomainCheckError::invalid_request(
                "'domains' must contain at least one domain name",
            ));
        }

        let domains: Vec<String> = raw
            .iter()
            .take(MAX_BATCH_SIZE)
            .map(|d| normalize_domain(d.as_ref()))
            .collect();
        let non_string = vec![false; domains.len()];

        Ok(Self {
            domains,
            non_string,
        })
    }

    /// Normalized entries in input order.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

impl DomainChecker {
    /// Check every entry of a batch concurrently.
    ///
    /// All checks run at once and the results are reassembled in input
    /// order, whatever order they complete in. Per-domain failures show up
    /// as `unknown` entries; the batch itself always succeeds. Entries that
    /// were not JSON strings are `unknown` without any network activity.
    pub async fn check_batch(&self, request: &BatchRequest) -> CheckBatch {
        let started = Instant::now();

        let checks = request
            .domains
            .iter()
            .zip(&request.non_string)
            .map(|(domain, &non_string)| async move {
                if non_string {
                    DomainCheckResult::unchecked(domain.as_str())
                } else {
                    self.check_domain(domain).await
                }
            });
        let batch = CheckBatch(join_all(checks).await);

        tracing::info!(
            domains = batch.len(),
            unknown = batch.unknown_count(),
            duration_ms = %started.elapsed().as_millis(),
            "batch check completed"
        );

        batch
    }
}
