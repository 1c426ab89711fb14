// # Hosts Store Implementations
//
// This module provides implementations of the HostsStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileHostsStore;
pub use memory::MemoryHostsStore;
