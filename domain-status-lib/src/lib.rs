//! # Domain Status Library
//!
//! Resolves whether domain names are available for registration.
//!
//! Each name is looked up in a static table of registry (RDAP) endpoints,
//! falling back to the IANA bootstrap index for unknown TLDs. The registry's
//! answer decides the status when it is conclusive; otherwise a
//! DNS-over-HTTPS probe is used as a heuristic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_status_lib::{BatchRequest, DomainChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = DomainChecker::new()?;
//!
//!     let result = checker.check_domain("example.com").await;
//!     println!("{} - {}", result.domain, result.status);
//!
//!     let request = BatchRequest::from_strings(&["Example.COM ", "free-name-xyz.dev"])?;
//!     for result in checker.check_batch(&request).await.iter() {
//!         println!("{} - {}", result.domain, result.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Registry first**: RDAP presence/absence is authoritative
//! - **DNS fallback**: NXDOMAIN heuristic when the registry is silent
//! - **Bootstrap Registry**: Dynamic RDAP endpoint discovery
//! - **Batches**: Up to ten names checked concurrently, results in input order

pub use batch::{BatchRequest, MAX_BATCH_SIZE};
pub use checker::DomainChecker;
pub use config::{
    load_env_config, load_env_config_from, parse_timeout_string, ConfigManager, EnvConfig,
    FileConfig, LookupConfig, ServerConfig,
};
pub use error::DomainCheckError;
pub use protocols::{builtin_authorities, AuthorityTable};
pub use types::{
    CheckBatch, CheckConfig, CheckMethod, DomainCheckResult, DomainName, DomainStatus,
    DEFAULT_BOOTSTRAP_URL, DEFAULT_DNS_RESOLVER_URL, DEFAULT_TIMEOUT,
};
pub use utils::normalize_domain;

mod batch;
mod checker;
mod config;
mod error;
mod protocols;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainCheckError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information for health reporting.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        features: get_enabled_features(),
    }
}

/// Information about the library build and features
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub features: Vec<&'static str>,
}

#[allow(clippy::vec_init_then_push)]
fn get_enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(feature = "bootstrap")]
    features.push("bootstrap");

    features
}
