//! Command-line arguments and settings assembly.
//!
//! Settings are layered with the following precedence (highest first):
//! CLI flags, `DS_*` environment variables, TOML config file, defaults.

use clap::Parser;
use domain_status_lib::{
    load_env_config, parse_timeout_string, CheckConfig, ConfigManager, DomainCheckError,
    EnvConfig, FileConfig,
};

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8787;

/// CLI arguments for domain-status
#[derive(Parser, Debug, Default)]
#[command(name = "domain-status")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP service answering batch domain availability checks")]
#[command(
    long_about = "HTTP service answering batch domain availability checks.\n\nEach domain is classified by its registry (RDAP) when one is known, with a DNS-over-HTTPS probe as fallback."
)]
pub struct Args {
    /// Address to listen on [default: 0.0.0.0]
    #[arg(short = 'b', long = "bind", value_name = "ADDR", help_heading = "Server")]
    pub bind: Option<String>,

    /// Port to listen on [default: 8787]
    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        value_parser = clap::value_parser!(u16).range(1..),
        help_heading = "Server"
    )]
    pub port: Option<u16>,

    /// Per-hop network timeout (e.g. "5s", "500ms", "0" to disable) [default: 5s]
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Lookup")]
    pub timeout: Option<String>,

    /// URL of the RDAP bootstrap index
    #[arg(long = "bootstrap-url", value_name = "URL", help_heading = "Lookup")]
    pub bootstrap_url: Option<String>,

    /// URL of the DNS-over-HTTPS JSON resolver
    #[arg(long = "dns-url", value_name = "URL", help_heading = "Lookup")]
    pub dns_url: Option<String>,

    /// Disable bootstrap discovery for TLDs missing from the static table
    #[arg(long = "no-bootstrap", help_heading = "Lookup")]
    pub no_bootstrap: bool,

    /// Use a specific config file instead of automatic discovery
    #[arg(short = 'c', long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Debug-level logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything the service needs to start.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
    pub check: CheckConfig,
}

/// Build settings from CLI arguments and the process environment.
pub fn build_settings(args: &Args) -> Result<ServerSettings, DomainCheckError> {
    build_settings_with_env(args, load_env_config())
}

/// Build settings from CLI arguments and an already loaded environment layer.
pub fn build_settings_with_env(
    args: &Args,
    env_config: EnvConfig,
) -> Result<ServerSettings, DomainCheckError> {
    let file_config = load_file_config(args, &env_config)?;

    // Step 1: defaults and config file
    let mut settings = ServerSettings {
        bind: DEFAULT_BIND.to_string(),
        port: DEFAULT_PORT,
        check: file_config.apply_to(CheckConfig::default()),
    };
    if let Some(server) = &file_config.server {
        if let Some(bind) = &server.bind {
            settings.bind = bind.clone();
        }
        if let Some(port) = server.port {
            settings.port = port;
        }
    }

    // Step 2: environment variables (DS_*)
    settings.check = env_config.apply_to(settings.check);
    if let Some(bind) = env_config.bind {
        settings.bind = bind;
    }
    if let Some(port) = env_config.port {
        settings.port = port;
    }

    // Step 3: CLI arguments (highest precedence)
    apply_cli_args(settings, args)
}

fn load_file_config(args: &Args, env_config: &EnvConfig) -> Result<FileConfig, DomainCheckError> {
    let config_manager = ConfigManager::new(args.verbose);

    let explicit = args
        .config
        .as_deref()
        .map(|path| (path, "--config"))
        .or_else(|| env_config.config.as_deref().map(|path| (path, "DS_CONFIG")));

    match explicit {
        Some((path, source)) => {
            tracing::info!(path, source, "using explicit config file");
            config_manager.load_file(path)
        }
        None => config_manager.discover_and_load(),
    }
}

fn apply_cli_args(
    mut settings: ServerSettings,
    args: &Args,
) -> Result<ServerSettings, DomainCheckError> {
    if let Some(bind) = &args.bind {
        settings.bind = bind.clone();
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    if let Some(timeout_str) = &args.timeout {
        let timeout = parse_timeout_string(timeout_str).ok_or_else(|| {
            DomainCheckError::config(format!(
                "Invalid timeout '{}'. Use format like '5s', '500ms', '2m'",
                timeout_str
            ))
        })?;
        settings.check = settings.check.with_timeout(timeout);
    }

    if let Some(url) = &args.bootstrap_url {
        settings.check = settings.check.with_bootstrap_url(require_http_url(url)?);
    }
    if let Some(url) = &args.dns_url {
        settings.check = settings.check.with_dns_resolver_url(require_http_url(url)?);
    }
    if args.no_bootstrap {
        settings.check = settings.check.with_bootstrap(false);
    }

    Ok(settings)
}

fn require_http_url(url: &str) -> Result<&str, DomainCheckError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(DomainCheckError::config(format!(
            "Invalid URL '{}': must start with http:// or https://",
            url
        )))
    }
}
