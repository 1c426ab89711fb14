//! Contract Test: Hosts File Persistence
//!
//! This test drives the provider against a real hosts file.
//!
//! Constraints verified:
//! - The seed is written before the provider is ready
//! - Every committed apply replaces the file atomically
//! - No-op batches leave the file untouched
//! - A failed write leaves the previous file byte-identical
//! - Concurrent applies are serialised without losing updates

mod common;

use common::*;
use hostsync_core::store::FileHostsStore;
use hostsync_core::{Endpoint, Hosts, HostsProvider, Provider, ProviderPhase};
use std::path::Path;
use std::sync::Arc;

async fn file_provider(path: &Path, seed: &str) -> HostsProvider {
    let hosts: Hosts = seed.parse().expect("seed parses");
    HostsProvider::bootstrap(hosts, Box::new(FileHostsStore::new(path)))
        .await
        .expect("bootstrap succeeds")
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("hosts file readable")
}

#[tokio::test]
async fn bootstrap_writes_seed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts");

    let provider = file_provider(&path, "# seed\n0.0.0.0 frantj.cc # apex\n").await;

    assert_eq!(provider.phase(), ProviderPhase::Ready);
    assert_eq!(read(&path), "0.0.0.0 frantj.cc\n");
}

#[tokio::test]
async fn applies_are_visible_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts");
    let provider = file_provider(&path, "0.0.0.0 frantj.cc").await;

    provider
        .apply_changes(&create(vec![
            Endpoint::a_record("localhost.frantj.cc", ["127.0.0.1"]),
            Endpoint::a_record("homelab.frantj.cc", ["0.0.0.0"]),
        ]))
        .await
        .unwrap();

    assert_eq!(
        read(&path),
        "0.0.0.0 frantj.cc homelab.frantj.cc\n127.0.0.1 localhost.frantj.cc\n"
    );
    assert!(!dir.path().join("hosts.tmp").exists());

    let reloaded = FileHostsStore::new(&path).load().await.unwrap();
    assert_eq!(reloaded, provider.hosts().await);
}

#[tokio::test]
async fn empty_batch_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts");
    let provider = file_provider(&path, "0.0.0.0 frantj.cc").await;

    let modified_before = std::fs::metadata(&path).unwrap().modified().unwrap();
    // Swap the file under the provider; an untouched file keeps this content.
    std::fs::write(&path, "sentinel\n").unwrap();
    let modified_sentinel = std::fs::metadata(&path).unwrap().modified().unwrap();
    assert!(modified_sentinel >= modified_before);

    provider.apply_changes(&Default::default()).await.unwrap();
    provider
        .apply_changes(&create(vec![Endpoint::a_record("frantj.cc", ["0.0.0.0"])]))
        .await
        .unwrap();

    assert_eq!(read(&path), "sentinel\n");
    assert_eq!(
        std::fs::metadata(&path).unwrap().modified().unwrap(),
        modified_sentinel
    );
}

#[tokio::test]
async fn failed_write_leaves_file_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts");
    let provider = file_provider(&path, "0.0.0.0 frantj.cc").await;
    let before = std::fs::read(&path).unwrap();

    // Block the staging path so the write fails before the rename.
    std::fs::create_dir(dir.path().join("hosts.tmp")).unwrap();

    let result = provider
        .apply_changes(&create(vec![Endpoint::a_record("homelab.frantj.cc", ["0.0.0.0"])]))
        .await;

    assert!(result.is_err());
    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(provider.hosts().await.to_string(), "0.0.0.0 frantj.cc\n");
}

#[tokio::test]
async fn bootstrap_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("hosts");

    let result = HostsProvider::bootstrap(Hosts::new(), Box::new(FileHostsStore::new(&path))).await;
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_applies_do_not_lose_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts");
    let provider = Arc::new(file_provider(&path, "").await);

    let mut handles = Vec::new();
    for i in 0..20u8 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            let ep = Endpoint::a_record(format!("host{i}.example"), [format!("10.0.1.{i}")]);
            provider.apply_changes(&create(vec![ep])).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let persisted = FileHostsStore::new(&path).load().await.unwrap();
    assert_eq!(persisted.len(), 20);
    assert_eq!(persisted, provider.hosts().await);
    assert_eq!(provider.records().await.unwrap().len(), 20);
}
