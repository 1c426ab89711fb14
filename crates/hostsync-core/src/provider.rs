//! Hosts-file backed provider
//!
//! The HostsProvider is responsible for:
//! - Holding the record set that is persisted for the resolver
//! - Holding the externally visible endpoint list returned to the controller
//! - Applying change batches to both and persisting on change
//!
//! ## Architecture
//!
//! ```text
//!  webhook transport
//!         │
//!         ▼
//! ┌────────────────┐  records()   ┌──────────────────┐
//! │ HostsProvider  │─────────────▶│ endpoint snapshot│
//! │                │              └──────────────────┘
//! │ apply_changes()│  merge       ┌──────────────────┐  persist  ┌────────────┐
//! │   (one lock)   │─────────────▶│ Hosts (scratch)  │──────────▶│ HostsStore │
//! └────────────────┘              └──────────────────┘           └────────────┘
//! ```
//!
//! ## Apply Flow
//!
//! 1. Empty batch: return, no I/O
//! 2. Hand the batch to a commit task and take the apply lock there
//! 3. Merge `A` record targets into a scratch copy of the record set
//! 4. Nothing changed: return, no I/O
//! 5. Persist the scratch copy
//! 6. Swap in the scratch copy and the new endpoint list
//!
//! Steps 2 to 6 run on a spawned task. Dropping the caller's future does not
//! stop a commit, so the file and the in-memory state never diverge.
//!
//! The endpoint list mirrors the requested creates, updates, and deletes by
//! name. It is not cross-checked against the merged record set; the two are
//! related but separate views.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::endpoint::{Changes, Endpoint};
use crate::error::{Error, Result};
use crate::hosts::{Host, Hosts, parse_address};
use crate::traits::{HostsStore, Provider};

/// Default provider name used in logs
const DEFAULT_PROVIDER_NAME: &str = "hosts";

/// Lifecycle phase of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderPhase {
    /// Record set loaded but never persisted
    Uninitialized,
    /// Persisted file matches the in-memory record set
    Ready,
}

/// Result of applying a change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The batch carried no changes; nothing was examined
    Empty,
    /// The batch merged to the same record set; nothing was written
    Unchanged,
    /// The record set changed and was persisted
    Committed {
        /// Number of record set entries after the merge
        entries: usize,
        /// Number of visible endpoints after the merge
        endpoints: usize,
    },
}

/// Provider that keeps external-dns `A` records in a hosts file
///
/// # Concurrency
///
/// A single mutex serialises every apply from merge through persistence.
/// Each apply commits on its own task and finishes even if the caller goes
/// away.
/// [`records`](Provider::records) never waits for that mutex; it reads the
/// last committed endpoint snapshot and may return the pre-apply list while
/// an apply is in flight.
///
/// # Example
///
/// ```rust,no_run
/// use hostsync_core::{Changes, Endpoint, Hosts, HostsProvider, Provider};
/// use hostsync_core::store::FileHostsStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let seed: Hosts = "0.0.0.0 frantj.cc".parse()?;
///     let store = FileHostsStore::new("/var/lib/hostsync/hosts");
///     let provider = HostsProvider::bootstrap(seed, Box::new(store)).await?;
///
///     let changes = Changes {
///         create: vec![Endpoint::a_record("homelab.frantj.cc", ["0.0.0.0"])],
///         ..Default::default()
///     };
///     provider.apply_changes(&changes).await?;
///
///     Ok(())
/// }
/// ```
pub struct HostsProvider {
    name: String,
    state: Arc<ProviderState>,
}

/// State shared with in-flight commit tasks
struct ProviderState {
    store: Box<dyn HostsStore>,
    hosts: Mutex<Hosts>,
    endpoints: RwLock<Arc<Vec<Endpoint>>>,
    ready: AtomicBool,
}

impl HostsProvider {
    /// Create a provider around `hosts` without persisting anything
    ///
    /// The provider starts in [`ProviderPhase::Uninitialized`]; call
    /// [`initialize`](Self::initialize) or use [`bootstrap`](Self::bootstrap).
    pub fn new(hosts: Hosts, store: Box<dyn HostsStore>) -> Self {
        Self {
            name: DEFAULT_PROVIDER_NAME.to_string(),
            state: Arc::new(ProviderState {
                store,
                hosts: Mutex::new(hosts),
                endpoints: RwLock::new(Arc::new(Vec::new())),
                ready: AtomicBool::new(false),
            }),
        }
    }

    /// Create a provider and persist its initial record set
    pub async fn bootstrap(hosts: Hosts, store: Box<dyn HostsStore>) -> Result<Self> {
        let provider = Self::new(hosts, store);
        provider.initialize().await?;
        Ok(provider)
    }

    /// Set the name reported in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Persist the current record set and mark the provider ready
    pub async fn initialize(&self) -> Result<()> {
        let state = Arc::clone(&self.state);
        let name = self.name.clone();

        run_to_completion(async move {
            let hosts = state.hosts.lock().await;
            state.store.persist(&hosts).await?;
            state.ready.store(true, Ordering::Release);

            info!(
                provider = %name,
                location = %state.store.location(),
                entries = hosts.len(),
                "Wrote initial hosts"
            );
            Ok(())
        })
        .await
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ProviderPhase {
        if self.state.ready.load(Ordering::Acquire) {
            ProviderPhase::Ready
        } else {
            ProviderPhase::Uninitialized
        }
    }

    /// Copy of the current record set
    ///
    /// Waits for any in-flight apply to finish.
    pub async fn hosts(&self) -> Hosts {
        self.state.hosts.lock().await.clone()
    }

    /// Apply a change batch and report what happened
    ///
    /// Merging happens on a scratch copy that is swapped in only after it
    /// has been persisted, so a rejected target or a failed write leaves
    /// both the record set and the endpoint list as they were.
    ///
    /// A non-empty batch is committed on a spawned task. Dropping the returned
    /// future stops waiting for the outcome but not the commit.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIp`] if an `A` record target is not an IP literal
    /// - [`Error::Io`] or [`Error::Store`] if persistence fails
    pub async fn apply(&self, changes: &Changes) -> Result<ApplyOutcome> {
        if !changes.has_changes() {
            debug!(provider = %self.name, "No changes to apply");
            return Ok(ApplyOutcome::Empty);
        }

        let state = Arc::clone(&self.state);
        let name = self.name.clone();
        let changes = changes.clone();

        run_to_completion(async move { state.commit(&name, &changes).await }).await
    }
}

impl ProviderState {
    /// Merge, persist, and swap in `changes` under the apply lock
    async fn commit(&self, name: &str, changes: &Changes) -> Result<ApplyOutcome> {
        let mut hosts = self.hosts.lock().await;
        let mut candidate = hosts.clone();

        let modified = merge_changes(&mut candidate, changes).inspect_err(|e| {
            warn!(provider = %name, error = %e, "Rejected change batch");
        })?;

        if !modified {
            debug!(provider = %name, "Change batch did not modify hosts");
            return Ok(ApplyOutcome::Unchanged);
        }

        let endpoints = {
            let current = self.endpoints.read().await;
            apply_to_endpoints(&current, changes)
        };

        self.store.persist(&candidate).await.inspect_err(|e| {
            warn!(
                provider = %name,
                location = %self.store.location(),
                error = %e,
                "Failed to persist hosts"
            );
        })?;

        *hosts = candidate;
        let outcome = ApplyOutcome::Committed {
            entries: hosts.len(),
            endpoints: endpoints.len(),
        };
        *self.endpoints.write().await = Arc::new(endpoints);
        self.ready.store(true, Ordering::Release);

        info!(
            provider = %name,
            create = changes.create.len(),
            update = changes.update_new.len(),
            delete = changes.delete.len(),
            entries = hosts.len(),
            "Applied changes"
        );

        Ok(outcome)
    }
}

/// Run `task` on its own tokio task and wait for its result
///
/// The task keeps running if the waiting future is dropped.
async fn run_to_completion<T, F>(task: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(task)
        .await
        .map_err(|e| Error::store(format!("hosts commit task failed: {e}")))?
}

#[async_trait]
impl Provider for HostsProvider {
    async fn records(&self) -> Result<Vec<Endpoint>> {
        let snapshot = Arc::clone(&*self.state.endpoints.read().await);
        Ok(Vec::clone(&snapshot))
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<()> {
        self.apply(changes).await.map(|_| ())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

/// Feed the batch's `A` record targets through add and remove
///
/// Returns whether any call changed the record set. Records of other types
/// are skipped.
fn merge_changes(hosts: &mut Hosts, changes: &Changes) -> Result<bool> {
    let mut modified = false;

    for endpoint in changes.additions().filter(|ep| ep.is_address_record()) {
        for target in &endpoint.targets {
            let ip = parse_address(target).ok_or_else(|| Error::invalid_ip(target))?;
            modified |= hosts.add(Host::new(ip, [endpoint.dns_name.as_str()]));
        }
    }

    for endpoint in changes.removals().filter(|ep| ep.is_address_record()) {
        for target in &endpoint.targets {
            let ip = parse_address(target).ok_or_else(|| Error::invalid_ip(target))?;
            modified |= hosts.remove(&Host::new(ip, [endpoint.dns_name.as_str()]));
        }
    }

    Ok(modified)
}

/// Next endpoint list: creates appended, updates and deletes matched by name
fn apply_to_endpoints(current: &[Endpoint], changes: &Changes) -> Vec<Endpoint> {
    let mut next = current.to_vec();
    next.extend(changes.create.iter().cloned());

    for update in &changes.update_new {
        for existing in next.iter_mut().filter(|ep| ep.dns_name == update.dns_name) {
            *existing = update.clone();
        }
    }

    next.retain(|ep| !changes.delete.iter().any(|d| d.dns_name == ep.dns_name));
    next
}
