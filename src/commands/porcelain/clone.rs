//! clone: copy a repository into a fresh directory
//!
//! Initializes the target, wires the source as `origin`, and, when the
//! source has a `master` branch, fetches it and fast-forwards the fresh
//! repository onto it.

use crate::areas::repository::Repository;
use crate::areas::transport::{with_directory, with_repository_at};
use crate::artifacts::merge;
use crate::commands::porcelain::init::init_repository;
use anyhow::Context;
use std::path::Path;

/// Clone the repository at `src` into `dst`
pub fn clone_repository(
    src: &str,
    dst: &str,
    bare: bool,
    writer: &mut dyn std::io::Write,
) -> anyhow::Result<()> {
    let src_path = Path::new(src);
    if !src_path.exists() || !Repository::in_repository(src_path) {
        anyhow::bail!("repository {src} does not exist");
    }

    let dst_path = Path::new(dst);
    if dst_path.exists() && std::fs::read_dir(dst_path)?.next().is_some() {
        anyhow::bail!("{dst} already exists and is not empty");
    }

    // the source path must survive the directory swap into the target
    let src_abs = src_path
        .canonicalize()
        .with_context(|| format!("invalid source path {src}"))?;

    std::fs::create_dir_all(dst_path)
        .with_context(|| format!("unable to create {dst}"))?;

    with_directory(dst_path, || {
        let cwd = std::env::current_dir()?;
        init_repository(&cwd, bare, &mut std::io::sink())?;

        let mut repository = Repository::open_current(Box::new(std::io::sink()))?;
        repository.remote("add", "origin", &src_abs.to_string_lossy())?;

        let remote_head = with_repository_at(&src_abs, |peer| peer.resolve("master"))?;
        if let Some(head) = remote_head {
            repository.fetch("origin", "master")?;
            merge::write_fast_forward_merge(&repository, None, &head)?;
        }

        Ok(())
    })?;

    writeln!(writer, "Cloning into {dst}")?;
    Ok(())
}
