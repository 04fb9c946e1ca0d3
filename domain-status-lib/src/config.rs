//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DS_*`
//! environment variables, and merging them with proper precedence rules.

use crate::error::DomainCheckError;
use crate::types::CheckConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Listener settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Network hop settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupConfig>,

    /// Extra static authorities (TLD -> RDAP base URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorities: Option<HashMap<String, String>>,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Network hop settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LookupConfig {
    /// Per-hop timeout (e.g. "5s", "500ms", "0" to disable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Whether to consult the bootstrap index for unknown TLDs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_resolver_url: Option<String>,
}

impl FileConfig {
    /// Apply the lookup and authority sections onto a checker configuration.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(lookup) = &self.lookup {
            if let Some(timeout) = lookup.timeout.as_deref().and_then(parse_timeout_string) {
                config = config.with_timeout(timeout);
            }
            if let Some(bootstrap) = lookup.bootstrap {
                config.enable_bootstrap = bootstrap;
            }
            if let Some(url) = &lookup.bootstrap_url {
                config.bootstrap_url = url.clone();
            }
            if let Some(url) = &lookup.dns_resolver_url {
                config.dns_resolver_url = url.clone();
            }
        }

        if let Some(authorities) = &self.authorities {
            for (tld, url) in authorities {
                config = config.with_authority(tld.as_str(), url.as_str());
            }
        }

        config
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were found
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainCheckError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then the home directory file, then the local
    /// file in the working directory.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainCheckError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                }
            }
        }

        if self.verbose {
            for path in &loaded_files {
                tracing::info!(path = %path.display(), "loaded config file");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-status.toml", "./.domain-status.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-status.toml", "domain-status.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-status").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            server: match (lower.server, higher.server) {
                (Some(mut lower_server), Some(higher_server)) => {
                    if higher_server.bind.is_some() {
                        lower_server.bind = higher_server.bind;
                    }
                    if higher_server.port.is_some() {
                        lower_server.port = higher_server.port;
                    }
                    Some(lower_server)
                }
                (lower_server, higher_server) => higher_server.or(lower_server),
            },
            lookup: match (lower.lookup, higher.lookup) {
                (Some(mut lower_lookup), Some(higher_lookup)) => {
                    if higher_lookup.timeout.is_some() {
                        lower_lookup.timeout = higher_lookup.timeout;
                    }
                    if higher_lookup.bootstrap.is_some() {
                        lower_lookup.bootstrap = higher_lookup.bootstrap;
                    }
                    if higher_lookup.bootstrap_url.is_some() {
                        lower_lookup.bootstrap_url = higher_lookup.bootstrap_url;
                    }
                    if higher_lookup.dns_resolver_url.is_some() {
                        lower_lookup.dns_resolver_url = higher_lookup.dns_resolver_url;
                    }
                    Some(lower_lookup)
                }
                (lower_lookup, higher_lookup) => higher_lookup.or(lower_lookup),
            },
            authorities: match (lower.authorities, higher.authorities) {
                (Some(mut lower_auth), Some(higher_auth)) => {
                    lower_auth.extend(higher_auth);
                    Some(lower_auth)
                }
                (lower_auth, higher_auth) => higher_auth.or(lower_auth),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainCheckError> {
        if let Some(server) = &config.server {
            if server.port == Some(0) {
                return Err(DomainCheckError::config("Port must be between 1 and 65535"));
            }
        }

        if let Some(lookup) = &config.lookup {
            if let Some(timeout_str) = &lookup.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(DomainCheckError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '500ms', '2m'",
                        timeout_str
                    )));
                }
            }
            for url in [&lookup.bootstrap_url, &lookup.dns_resolver_url]
                .into_iter()
                .flatten()
            {
                if !is_http_url(url) {
                    return Err(DomainCheckError::config(format!(
                        "Invalid URL '{}': must start with http:// or https://",
                        url
                    )));
                }
            }
        }

        if let Some(authorities) = &config.authorities {
            for (tld, url) in authorities {
                if tld.is_empty() || tld.starts_with('.') || tld.ends_with('.') || tld.contains(' ')
                {
                    return Err(DomainCheckError::config(format!(
                        "Invalid TLD '{}' in [authorities]",
                        tld
                    )));
                }
                if !is_http_url(url) {
                    return Err(DomainCheckError::config(format!(
                        "Invalid authority URL '{}' for TLD '{}'",
                        url, tld
                    )));
                }
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DS_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub timeout: Option<Duration>,
    pub bootstrap: Option<bool>,
    pub bootstrap_url: Option<String>,
    pub dns_resolver_url: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Apply the lookup-related values onto a checker configuration.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(bootstrap) = self.bootstrap {
            config.enable_bootstrap = bootstrap;
        }
        if let Some(url) = &self.bootstrap_url {
            config.bootstrap_url = url.clone();
        }
        if let Some(url) = &self.dns_resolver_url {
            config.dns_resolver_url = url.clone();
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(bind) = lookup("DS_BIND").filter(|v| !v.trim().is_empty()) {
        env_config.bind = Some(bind.trim().to_string());
    }

    if let Some(val) = lookup("DS_PORT") {
        match val.trim().parse::<u16>() {
            Ok(port) if port > 0 => env_config.port = Some(port),
            _ => tracing::warn!("Invalid DS_PORT='{}', must be 1-65535", val),
        }
    }

    if let Some(val) = lookup("DS_TIMEOUT") {
        match parse_timeout_string(&val) {
            Some(timeout) => env_config.timeout = Some(timeout),
            None => tracing::warn!(
                "Invalid DS_TIMEOUT='{}', use format like '5s', '500ms', '2m'",
                val
            ),
        }
    }

    if let Some(val) = lookup("DS_BOOTSTRAP") {
        match parse_bool(&val) {
            Some(enabled) => env_config.bootstrap = Some(enabled),
            None => tracing::warn!("Invalid DS_BOOTSTRAP='{}', use true/false", val),
        }
    }

    for (key, slot) in [
        ("DS_BOOTSTRAP_URL", &mut env_config.bootstrap_url),
        ("DS_DNS_URL", &mut env_config.dns_resolver_url),
    ] {
        if let Some(val) = lookup(key) {
            if is_http_url(val.trim()) {
                *slot = Some(val.trim().to_string());
            } else {
                tracing::warn!("Invalid {}='{}', must be an http(s) URL", key, val);
            }
        }
    }

    if let Some(path) = lookup("DS_CONFIG").filter(|v| !v.trim().is_empty()) {
        env_config.config = Some(path);
    }

    env_config
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a timeout string like "5s", "500ms", "2m" or a bare number of seconds.
///
/// A zero duration is valid and means "no timeout".
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(ms) = timeout_str.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        timeout_str.parse::<u64>().ok().map(Duration::from_secs)
    }
}
