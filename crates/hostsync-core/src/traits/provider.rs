// # Provider Trait
//
// Defines the boundary between the webhook transport and the record core.
//
// ## Usage
//
// ```rust,ignore
// use hostsync_core::{Changes, Endpoint, Provider};
//
// async fn sync(provider: &dyn Provider) -> hostsync_core::Result<()> {
//     let current = provider.records().await?;
//
//     let changes = Changes {
//         create: vec![Endpoint::a_record("app.example.com", ["10.0.0.7"])],
//         ..Default::default()
//     };
//     provider.apply_changes(&changes).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::endpoint::{Changes, Endpoint};

/// Trait for record providers driven by an external-dns controller
///
/// The webhook transport is the only caller. It calls [`records`](Self::records)
/// to learn the current state and [`apply_changes`](Self::apply_changes) with
/// the plan computed by the controller.
///
/// # Cancellation
///
/// Dropping a returned future cancels the wait, but an implementation may
/// finish a persistence step that has already started.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Current externally visible records
    ///
    /// Never fails for a provider that has not been populated yet; it
    /// returns an empty list instead.
    async fn records(&self) -> Result<Vec<Endpoint>, crate::Error>;

    /// Apply a batch of creates, updates, and deletes
    ///
    /// An empty batch returns immediately without any I/O.
    async fn apply_changes(&self, changes: &Changes) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &str;
}
