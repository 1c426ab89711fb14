// # Hosts Store Trait
//
// Defines the interface for persisting the record set.
//
// ## Purpose
//
// The store is the only path by which the record set reaches the resolver.
// A resolver process re-reads whatever the store produces, so an
// implementation must never expose a partially written result.
//
// ## Implementations
//
// - File-based: atomic write-then-rename of a hosts file
// - Memory: keeps the last encoding (embedding, tests)

use async_trait::async_trait;

use crate::hosts::Hosts;

/// Trait for record set persistence
///
/// # Thread Safety
///
/// The provider serialises calls to [`persist`](Self::persist), but
/// implementations must still be `Send + Sync` to live behind the provider.
///
/// # Failure Semantics
///
/// A failed `persist` must leave the previously persisted state untouched.
/// Implementations do not retry; the caller owns retry policy.
#[async_trait]
pub trait HostsStore: Send + Sync {
    /// Replace the persisted record set with `hosts`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The new record set is visible to readers
    /// - `Err(Error)`: Nothing changed for readers
    async fn persist(&self, hosts: &Hosts) -> Result<(), crate::Error>;

    /// Human-readable location of the persisted data (for logging)
    fn location(&self) -> String;
}
