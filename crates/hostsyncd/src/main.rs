// # hostsyncd - hosts file provider daemon
//
// This is a thin integration layer. All record logic lives in hostsync-core.
//
// The hostsyncd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Loading the optional initial hosts and persisting them
// 4. Holding the provider until shutdown
//
// The resolver that serves the hosts file and the webhook transport that
// drives the provider run alongside this process and are configured
// separately.
//
// ## Configuration
//
// - `HOSTSYNC_HOSTS_FILE`: Hosts file read by the resolver
//   (default: `<temp dir>/hostsync-hosts`)
// - `HOSTSYNC_INIT_HOSTS`: Initial hosts (path, `file://` or `http(s)://` URL)
// - `HOSTSYNC_PROVIDER_NAME`: Name used in logs (default: `hosts`)
// - `HOSTSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: `info`)
//
// ## Example
//
// ```bash
// export HOSTSYNC_HOSTS_FILE=/var/lib/hostsync/hosts
// export HOSTSYNC_INIT_HOSTS=https://example.com/lab.hosts
//
// hostsyncd
// ```

use anyhow::{Context, Result};
use hostsync_core::{FileHostsStore, HostsProvider, HostsyncConfig, Provider, load_seed};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HostsyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<HostsyncExitCode> for ExitCode {
    fn from(code: HostsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Load configuration from environment variables
fn config_from_env() -> HostsyncConfig {
    let hosts_file = env::var_os("HOSTSYNC_HOSTS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("hostsync-hosts"));

    let mut config = HostsyncConfig::new(hosts_file);
    config.init_hosts = env::var("HOSTSYNC_INIT_HOSTS").ok();
    if let Ok(name) = env::var("HOSTSYNC_PROVIDER_NAME") {
        config.provider_name = name;
    }
    config
}

/// Parse `HOSTSYNC_LOG_LEVEL`
fn log_level_from_env() -> Result<Level> {
    let raw = env::var("HOSTSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "HOSTSYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

fn main() -> ExitCode {
    let config = config_from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return HostsyncExitCode::ConfigError.into();
    }

    let log_level = match log_level_from_env() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HostsyncExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostsyncExitCode::ConfigError.into();
    }

    info!("Starting hostsyncd daemon");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostsyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => HostsyncExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                HostsyncExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: HostsyncConfig) -> Result<()> {
    info!("Hosts file: {}", config.hosts_file.display());

    let hosts = load_seed(config.init_hosts.as_deref())
        .await
        .context("Failed to load initial hosts")?;

    let store = FileHostsStore::new(&config.hosts_file);
    let provider =
        HostsProvider::new(hosts, Box::new(store)).with_name(config.provider_name.clone());
    provider
        .initialize()
        .await
        .context("Failed to write initial hosts")?;

    info!(
        "Provider '{}' ready with {} visible record(s)",
        provider.provider_name(),
        provider.records().await?.len()
    );

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);
    info!("Shutting down daemon");

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
