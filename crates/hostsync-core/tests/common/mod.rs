//! Test doubles and common utilities for provider contract tests
//!
//! This module provides minimal HostsStore doubles that count and fail
//! writes on demand, so tests can observe exactly when the provider persists.

#![allow(dead_code)]

use hostsync_core::error::{Error, Result};
use hostsync_core::traits::HostsStore;
use hostsync_core::{Changes, Endpoint, Hosts};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A HostsStore that records every persisted encoding
#[derive(Clone, Default)]
pub struct RecordingHostsStore {
    /// Call counter for persist()
    persist_call_count: Arc<AtomicUsize>,
    /// Encodings from successful persist() calls, oldest first
    writes: Arc<Mutex<Vec<String>>>,
    /// When set, persist() fails without recording
    fail: Arc<AtomicBool>,
    /// When set, persist() waits for `release` before recording
    hold: Arc<AtomicBool>,
    release: Arc<Notify>,
}

impl RecordingHostsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of times persist() was called
    pub fn persist_call_count(&self) -> usize {
        self.persist_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Last successfully persisted hosts-file text
    pub fn last_write(&self) -> Option<String> {
        self.writes.lock().unwrap().last().cloned()
    }

    /// Make subsequent persist() calls fail (or succeed again)
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent persist() calls block until [`release_write`](Self::release_write)
    pub fn hold_writes(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Let one held persist() call finish
    pub fn release_write(&self) {
        self.release.notify_one();
    }
}

#[async_trait::async_trait]
impl HostsStore for RecordingHostsStore {
    async fn persist(&self, hosts: &Hosts) -> Result<()> {
        self.persist_call_count.fetch_add(1, Ordering::SeqCst);

        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other("simulated write failure")));
        }

        self.writes.lock().unwrap().push(hosts.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "recording".to_string()
    }
}

/// Batch that only creates the given endpoints
pub fn create(endpoints: Vec<Endpoint>) -> Changes {
    Changes {
        create: endpoints,
        ..Default::default()
    }
}

/// Batch that only deletes the given endpoints
pub fn delete(endpoints: Vec<Endpoint>) -> Changes {
    Changes {
        delete: endpoints,
        ..Default::default()
    }
}

/// Batch that updates `old` to `new`
pub fn update(old: Endpoint, new: Endpoint) -> Changes {
    Changes {
        update_old: vec![old],
        update_new: vec![new],
        ..Default::default()
    }
}
