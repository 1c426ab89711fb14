// # File Hosts Store
//
// File-based implementation of HostsStore.
//
// ## Purpose
//
// Owns the hosts file that a local resolver re-reads on its own schedule.
// The resolver never coordinates with this process, so every write must be
// atomic from the reader's point of view.
//
// ## Write Sequence
//
// 1. Create `<path>.tmp`
// 2. Write the encoded record set, flush, and sync
// 3. Close the temporary file
// 4. Rename it over `<path>`
//
// Any failure removes the temporary file and leaves `<path>` untouched.
// The sequence runs on the blocking pool, so once started it completes even
// if the caller stops waiting.

use async_trait::async_trait;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::Error;
use crate::hosts::Hosts;
use crate::traits::HostsStore;

/// Suffix appended to the hosts file path for the staging file
const TEMP_SUFFIX: &str = ".tmp";

/// File-based hosts store with atomic replacement
///
/// # Example
///
/// ```rust,no_run
/// use hostsync_core::store::FileHostsStore;
/// use hostsync_core::traits::HostsStore;
/// use hostsync_core::Hosts;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileHostsStore::new("/var/lib/hostsync/hosts");
///
///     let hosts: Hosts = "10.0.0.1 nas.lan".parse()?;
///     store.persist(&hosts).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileHostsStore {
    path: PathBuf,
}

impl FileHostsStore {
    /// Create a store for the hosts file at `path`
    ///
    /// No I/O happens until the first persist.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the persisted hosts file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the staging file used for atomic replacement
    pub fn temp_path(&self) -> PathBuf {
        temp_path(&self.path)
    }

    /// Read back and decode the persisted hosts file
    ///
    /// Returns an empty record set if the file does not exist yet.
    pub async fn load(&self) -> Result<Hosts, Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Hosts::decode(bytes.as_slice()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Hosts file does not exist yet: {}", self.path.display());
                Ok(Hosts::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl HostsStore for FileHostsStore {
    async fn persist(&self, hosts: &Hosts) -> Result<(), Error> {
        let mut contents = Vec::new();
        hosts.encode(&mut contents)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents))
            .await
            .map_err(|e| Error::store(format!("hosts file write task failed: {e}")))??;

        tracing::trace!(
            path = %self.path.display(),
            entries = hosts.len(),
            "Hosts file replaced"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// `<path>.tmp`, keeping any existing extension
fn temp_path(path: &Path) -> PathBuf {
    let mut temp = OsString::from(path.as_os_str());
    temp.push(TEMP_SUFFIX);
    PathBuf::from(temp)
}

/// Replace `path` with `contents` through a temporary file and rename
///
/// Readers of `path` see either the old or the new contents, never a mix.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temp = temp_path(path);

    let result = stage(&temp, contents).and_then(|()| std::fs::rename(&temp, path));
    if let Err(e) = &result {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Hosts file write failed, discarding temporary file"
        );
        if let Err(remove_err) = std::fs::remove_file(&temp)
            && remove_err.kind() != io::ErrorKind::NotFound
        {
            tracing::debug!(
                temp = %temp.display(),
                error = %remove_err,
                "Temporary file not removed"
            );
        }
    }
    result
}

/// Write and sync the staging file, closing it before returning
fn stage(temp: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(contents)?;
    file.flush()?;
    file.sync_all()
}
