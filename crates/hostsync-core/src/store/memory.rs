// # Memory Hosts Store
//
// In-memory implementation of HostsStore.
//
// ## Purpose
//
// Keeps the last persisted encoding instead of writing a file. Useful when
// embedding the provider behind a resolver that is fed in-process, and in
// tests that need to count writes.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::hosts::Hosts;
use crate::traits::HostsStore;

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
}

/// In-memory hosts store
///
/// Clones share the same state, so a test can keep a handle while the
/// provider owns another.
///
/// # Example
///
/// ```rust,no_run
/// use hostsync_core::store::MemoryHostsStore;
/// use hostsync_core::traits::HostsStore;
/// use hostsync_core::Hosts;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryHostsStore::new();
///     let hosts: Hosts = "10.0.0.1 nas.lan".parse()?;
///
///     store.persist(&hosts).await?;
///     assert_eq!(store.contents().await.as_deref(), Some("10.0.0.1 nas.lan\n"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHostsStore {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemoryHostsStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Last persisted hosts-file text, if anything was persisted
    pub async fn contents(&self) -> Option<String> {
        self.inner.read().await.contents.clone()
    }

    /// Number of successful persists
    pub async fn write_count(&self) -> usize {
        self.inner.read().await.writes
    }
}

#[async_trait]
impl HostsStore for MemoryHostsStore {
    async fn persist(&self, hosts: &Hosts) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.contents = Some(hosts.to_string());
        guard.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
