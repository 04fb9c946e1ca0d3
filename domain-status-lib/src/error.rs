//! Error handling for domain status resolution.
//!
//! Per-domain failures never reach callers of the checker; they are turned into
//! fallback transitions or an `unknown` status. This error type is what the
//! individual hops return internally, and what the request boundary reports
//! when a batch request itself is malformed.

use std::fmt;
use std::time::Duration;

/// Main error type for domain status operations.
#[derive(Debug, Clone)]
pub enum DomainCheckError {
    /// Domain name that cannot be checked (fewer than two labels, bad characters)
    InvalidDomain { domain: String, reason: String },

    /// Structurally invalid batch request
    InvalidRequest { message: String },

    /// Network-related errors (connection refused, DNS failure of the HTTP client, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// RDAP registry query errors
    RdapError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Bootstrap registry lookup failures
    BootstrapError { tld: String, message: String },

    /// DNS-over-HTTPS probe failures
    DnsError { domain: String, message: String },

    /// JSON parsing errors
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// Configuration errors (invalid settings, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading configuration
    FileError { path: String, message: String },

    /// A single network hop exceeded the per-call timeout
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DomainCheckError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid request error.
    pub fn invalid_request<M: Into<String>>(message: M) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new RDAP error.
    pub fn rdap<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new RDAP error with HTTP status code.
    pub fn rdap_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new bootstrap error.
    pub fn bootstrap<T: Into<String>, M: Into<String>>(tld: T, message: M) -> Self {
        Self::BootstrapError {
            tld: tld.into(),
            message: message.into(),
        }
    }

    /// Create a new DNS probe error.
    pub fn dns<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::DnsError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// HTTP status the request boundary should answer with for this error.
    ///
    /// Only a malformed request is the caller's fault; everything else that
    /// escapes to the boundary is an internal fault.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => 400,
            _ => 500,
        }
    }
}

impl fmt::Display for DomainCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::InvalidRequest { message } => write!(f, "{}", message),
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::RdapError {
                domain,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "RDAP error for '{}' (HTTP {}): {}", domain, code, message)
                } else {
                    write!(f, "RDAP error for '{}': {}", domain, message)
                }
            }
            Self::BootstrapError { tld, message } => {
                write!(f, "Bootstrap error for TLD '{}': {}", tld, message)
            }
            Self::DnsError { domain, message } => {
                write!(f, "DNS probe error for '{}': {}", domain, message)
            }
            Self::ParseError { message, content: _ } => {
                write!(f, "Parse error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainCheckError {}

impl From<reqwest::Error> for DomainCheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else if err.is_decode() {
            Self::ParseError {
                message: format!("Response body could not be decoded: {}", err),
                content: None,
            }
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<std::io::Error> for DomainCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            DomainCheckError::invalid_request("missing domains").http_status(),
            400
        );
        assert_eq!(DomainCheckError::internal("boom").http_status(), 500);
        assert_eq!(
            DomainCheckError::rdap_with_status("a.com", "bad gateway", 502).http_status(),
            500
        );
    }

    #[test]
    fn test_display_messages() {
        let err = DomainCheckError::rdap_with_status("example.com", "server error", 503);
        assert_eq!(
            err.to_string(),
            "RDAP error for 'example.com' (HTTP 503): server error"
        );

        let err = DomainCheckError::invalid_request("'domains' must be a non-empty array");
        assert_eq!(err.to_string(), "'domains' must be a non-empty array");

        let err = DomainCheckError::timeout("DNS probe", Duration::from_secs(5));
        assert_eq!(err.to_string(), "Timeout after 5s during: DNS probe");
    }

    #[test]
    fn test_json_error_converts_to_parse_error() {
        let err: DomainCheckError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, DomainCheckError::ParseError { .. }));
    }
}
