// # hostsync-core
//
// Record synchronization core for an external-dns webhook provider backed by
// a plain hosts file.
//
// ## Architecture Overview
//
// - **Hosts**: In-memory record set with hosts-file decode/encode and merge
// - **HostsStore**: Trait for persisting the record set (atomic file, memory)
// - **Provider**: Trait for the read/apply boundary called by the webhook transport
// - **HostsProvider**: State machine that merges change batches and persists them
// - **seed**: Loading of the optional initial hosts file
//
// ## Data Flow
//
// 1. The initial record set is decoded from a seed and persisted once
// 2. The controller submits change batches through `Provider::apply_changes`
// 3. Changed record sets are written atomically for the resolver to pick up
//
// A resolver process re-reads the hosts file on its own; the core never talks
// to it directly.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod hosts;
pub mod provider;
pub mod seed;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::HostsyncConfig;
pub use endpoint::{Changes, Endpoint, RECORD_TYPE_A};
pub use error::{Error, Result};
pub use hosts::{Host, Hosts};
pub use provider::{ApplyOutcome, HostsProvider, ProviderPhase};
pub use seed::load_seed;
pub use store::{FileHostsStore, MemoryHostsStore};
pub use traits::{HostsStore, Provider};
