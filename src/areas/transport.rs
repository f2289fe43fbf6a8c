//! Remote transport
//!
//! A "remote" is another repository reachable through the filesystem; no
//! wire protocol exists. Running an operation against a remote means
//! swapping the process working directory to the peer, running a closure,
//! and restoring the previous directory on every exit path, including
//! failure. The guard restores on drop, so an early `?` return cannot
//! leak the swapped directory.
//!
//! Scopes nest (clone enters its target, then fetch enters the source)
//! but never run concurrently: all execution is single-threaded and
//! synchronous, so scopes are naturally serialized.

use crate::areas::repository::Repository;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Guard holding the directory to restore when the scope ends
struct DirectoryScope {
    previous: PathBuf,
}

impl DirectoryScope {
    fn enter(path: &Path) -> anyhow::Result<Self> {
        let previous = std::env::current_dir().context("unable to read working directory")?;
        std::env::set_current_dir(path)
            .with_context(|| format!("unable to enter {}", path.display()))?;
        Ok(DirectoryScope { previous })
    }
}

impl Drop for DirectoryScope {
    fn drop(&mut self) {
        // restoring to a since-deleted directory is unrecoverable here;
        // the next scoped swap will surface the error
        let _ = std::env::set_current_dir(&self.previous);
    }
}

/// Run a closure with the working directory swapped to `path`
pub fn with_directory<T>(path: &Path, f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    let _scope = DirectoryScope::enter(path)?;
    f()
}

/// Run a closure against the repository at `path`
///
/// The peer repository writes no user-facing output; its writer is a sink.
pub fn with_repository_at<T>(
    path: &Path,
    f: impl FnOnce(&mut Repository) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    with_directory(path, || {
        let mut repository = Repository::open_current(Box::new(std::io::sink()))?;
        f(&mut repository)
    })
}
