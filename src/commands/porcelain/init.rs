//! init: lay out a fresh repository
//!
//! A non-bare repository keeps its metadata under `.gitlet/`; a bare
//! repository keeps it at the top level and has no working copy.

use crate::areas::config::ConfigData;
use crate::areas::repository::{Repository, GITLET_DIR};
use anyhow::Context;
use std::path::Path;

/// Initialize a repository rooted at `path`
pub fn init_repository(
    path: &Path,
    bare: bool,
    writer: &mut dyn std::io::Write,
) -> anyhow::Result<()> {
    if Repository::in_repository(path) {
        anyhow::bail!("already in a Gitlet repository");
    }

    let meta_dir = if bare {
        path.to_path_buf()
    } else {
        path.join(GITLET_DIR)
    };

    std::fs::create_dir_all(meta_dir.join("objects"))
        .context("unable to create objects directory")?;
    std::fs::create_dir_all(meta_dir.join("refs").join("heads"))
        .context("unable to create refs directory")?;
    std::fs::write(meta_dir.join("HEAD"), "ref: refs/heads/master\n")
        .context("unable to write HEAD")?;
    std::fs::write(meta_dir.join("config"), ConfigData::initial(bare).render())
        .context("unable to write config")?;

    writeln!(
        writer,
        "Initialized empty Gitlet repository in {}",
        meta_dir.display()
    )?;
    Ok(())
}
