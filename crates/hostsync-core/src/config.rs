//! Configuration types for the hostsync system
//!
//! This module defines the configuration consumed when wiring a provider.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main hostsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostsyncConfig {
    /// Hosts file that the local resolver reads
    pub hosts_file: PathBuf,

    /// Optional initial hosts source (path, `file://` URL, or `http(s)://` URL)
    #[serde(default)]
    pub init_hosts: Option<String>,

    /// Provider name used in logs
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
}

impl HostsyncConfig {
    /// Create a configuration for the given hosts file
    pub fn new(hosts_file: impl Into<PathBuf>) -> Self {
        Self {
            hosts_file: hosts_file.into(),
            init_hosts: None,
            provider_name: default_provider_name(),
        }
    }

    /// Set the initial hosts source
    pub fn with_init_hosts(mut self, source: impl Into<String>) -> Self {
        self.init_hosts = Some(source.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hosts_file.as_os_str().is_empty() {
            return Err(crate::Error::config("Hosts file path cannot be empty"));
        }

        if self.hosts_file.to_string_lossy().ends_with(".tmp") {
            return Err(crate::Error::config(format!(
                "Hosts file path must not end in .tmp (reserved for atomic writes): {}",
                self.hosts_file.display()
            )));
        }

        if let Some(parent) = self.hosts_file.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            return Err(crate::Error::config(format!(
                "Hosts file directory does not exist: {}",
                parent.display()
            )));
        }

        if self.init_hosts.as_ref().is_some_and(|s| s.trim().is_empty()) {
            return Err(crate::Error::config(
                "Initial hosts source cannot be empty when set",
            ));
        }

        if self.provider_name.is_empty() {
            return Err(crate::Error::config("Provider name cannot be empty"));
        }

        Ok(())
    }
}

fn default_provider_name() -> String {
    "hosts".to_string()
}
