//! Working copy operations
//!
//! The workspace reads and writes files under the working copy root using
//! slash-separated repo-relative paths, and applies diffs produced by the
//! diff and merge engines back to disk. The metadata directory is invisible
//! to every listing.

use crate::areas::database::Database;
use crate::areas::repository::GITLET_DIR;
use crate::artifacts::diff::{FileStatus, TocDiff};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Read a file into a blob object
    pub fn parse_blob(&self, path: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    /// Absolute disk path of a repo-relative slash path
    pub fn disk_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.path.to_path_buf(), |acc, part| acc.join(part))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.disk_path(path).exists()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.disk_path(path).is_dir()
    }

    pub fn read_file(&self, path: &str) -> anyhow::Result<String> {
        std::fs::read_to_string(self.disk_path(path))
            .with_context(|| format!("unable to read {path}"))
    }

    pub fn write_file(&self, path: &str, content: &str) -> anyhow::Result<()> {
        let disk_path = self.disk_path(path);
        if let Some(parent) = disk_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("unable to create directories for {path}"))?;
        }
        std::fs::write(&disk_path, content).with_context(|| format!("unable to write {path}"))
    }

    pub fn remove_file(&self, path: &str) -> anyhow::Result<()> {
        std::fs::remove_file(self.disk_path(path)).with_context(|| format!("unable to remove {path}"))
    }

    /// List all files under a repo-relative path, recursively
    ///
    /// A file path lists itself; a missing path lists nothing. The
    /// metadata directory is skipped.
    pub fn ls_recursive(&self, path: &str) -> anyhow::Result<Vec<String>> {
        let root = if path.is_empty() || path == "." {
            self.path.to_path_buf()
        } else {
            self.disk_path(path)
        };

        if !root.exists() {
            return Ok(Vec::new());
        }

        if root.is_file() {
            return Ok(vec![self.relative_slash_path(&root)?]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| entry.file_name().to_string_lossy() != GITLET_DIR)
        {
            let entry = entry?;
            if entry.path().is_file() {
                files.push(self.relative_slash_path(entry.path())?);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Apply a diff to the working copy
    ///
    /// - ADD writes the receiver's blob, or the giver's when the receiver
    ///   has none
    /// - MODIFY writes the giver's blob
    /// - DELETE unlinks the file
    /// - CONFLICT writes both whole versions bracketed by markers
    /// - SAME is a no-op
    ///
    /// Directories left empty by deletions are pruned afterwards.
    pub fn apply_diff(&self, diff: &TocDiff, database: &Database) -> anyhow::Result<()> {
        for (path, entry) in diff {
            match entry.status {
                FileStatus::Add => {
                    let hash = entry
                        .receiver
                        .as_ref()
                        .or(entry.giver.as_ref())
                        .context("added entry carries no blob")?;
                    self.write_file(path, &database.load_required(hash)?)?;
                }
                FileStatus::Modify => {
                    let hash = entry.giver.as_ref().context("modified entry carries no giver")?;
                    self.write_file(path, &database.load_required(hash)?)?;
                }
                FileStatus::Delete => {
                    // a path the receiver already deleted has no file to unlink
                    if self.exists(path) {
                        self.remove_file(path)?;
                    }
                }
                FileStatus::Conflict => {
                    let receiver = entry
                        .receiver
                        .as_ref()
                        .context("conflicted entry carries no receiver")?;
                    let giver = entry.giver.as_ref().context("conflicted entry carries no giver")?;
                    let content = format!(
                        "<<<<<<\n{}\n======\n{}\n>>>>>>\n",
                        database.load_required(receiver)?,
                        database.load_required(giver)?
                    );
                    self.write_file(path, &content)?;
                }
                FileStatus::Same => {}
            }
        }

        self.remove_empty_dirs()
    }

    /// Remove directories that became empty, leaving the metadata
    /// directory alone
    pub fn remove_empty_dirs(&self) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy() == GITLET_DIR {
                continue;
            }
            if entry.path().is_dir() {
                Self::prune_empty(&entry.path())?;
            }
        }
        Ok(())
    }

    fn prune_empty(dir: &Path) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                Self::prune_empty(&entry.path())?;
            }
        }

        if std::fs::read_dir(dir)?.next().is_none() {
            std::fs::remove_dir(dir)
                .with_context(|| format!("unable to remove empty directory {}", dir.display()))?;
        }
        Ok(())
    }

    fn relative_slash_path(&self, path: &Path) -> anyhow::Result<String> {
        let relative = path
            .strip_prefix(self.path.as_ref())
            .with_context(|| format!("{} is outside the working copy", path.display()))?;
        Ok(relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/"))
    }
}
