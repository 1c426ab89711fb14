//! Core traits for the hostsync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Provider`]: The record read/apply boundary called by the webhook transport
//! - [`HostsStore`]: Persistence of the record set for the local resolver

pub mod hosts_store;
pub mod provider;

pub use hosts_store::HostsStore;
pub use provider::Provider;
