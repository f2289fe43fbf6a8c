//! Repository facade
//!
//! `Repository` bundles the component handles (database, index, refs,
//! workspace, config) behind one type and carries the output writer. It is
//! the receiver of every command implementation.
//!
//! ## Discovery
//!
//! A repository is located by walking up from the starting directory. A
//! directory containing a `.gitlet` subdirectory is a working copy root;
//! a directory whose own `config` file carries a `[core]` section next to
//! a `HEAD` file is a bare repository root.
//!
//! ## State
//!
//! There is no process-wide state beyond the current working directory,
//! which the remote transport swaps inside a guarded scope. Every handle
//! stores absolute paths, so an open repository keeps working while the
//! process is visiting a peer.

use crate::areas::config::{Config, ConfigData};
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::{self, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::Revision;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Metadata directory name for non-bare repositories
pub const GITLET_DIR: &str = ".gitlet";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// Config file name
const CONFIG_FILE: &str = "config";

pub struct Repository {
    /// Working copy root; equals the metadata dir for bare repositories
    work_dir: Box<Path>,
    /// Metadata directory holding HEAD, config, index, objects, refs
    meta_dir: Box<Path>,
    bare: bool,
    /// Invocation directory relative to the working copy root, slash-joined
    cwd_prefix: String,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    index: Index,
    refs: Refs,
    workspace: Workspace,
    config: Config,
}

impl Repository {
    /// Open the repository enclosing `start`
    pub fn discover(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = start
            .canonicalize()
            .with_context(|| format!("invalid starting directory {}", start.display()))?;

        let (work_dir, meta_dir) = Self::locate(&start).context("not a Gitlet repository")?;

        let config = Config::new(meta_dir.join(CONFIG_FILE).into_boxed_path());
        let bare = config.read().map(|data| data.is_bare()).unwrap_or(false);

        let cwd_prefix = start
            .strip_prefix(&work_dir)
            .unwrap_or_else(|_| Path::new(""))
            .components()
            .map(|part| part.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/");

        Ok(Repository {
            database: Database::new(meta_dir.join(DATABASE_DIR).into_boxed_path()),
            index: Index::new(meta_dir.join(INDEX_FILE).into_boxed_path()),
            refs: Refs::new(meta_dir.clone().into_boxed_path()),
            workspace: Workspace::new(work_dir.clone().into_boxed_path()),
            config,
            work_dir: work_dir.into_boxed_path(),
            meta_dir: meta_dir.into_boxed_path(),
            bare,
            cwd_prefix,
            writer: RefCell::new(writer),
        })
    }

    /// Open the repository enclosing the process working directory
    pub fn open_current(writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::discover(&cwd, writer)
    }

    /// Whether `dir` or any ancestor is a repository root
    pub fn in_repository(dir: &Path) -> bool {
        dir.canonicalize()
            .ok()
            .and_then(|dir| Self::locate(&dir))
            .is_some()
    }

    fn locate(start: &Path) -> Option<(PathBuf, PathBuf)> {
        for dir in start.ancestors() {
            let meta_candidate = dir.join(GITLET_DIR);
            if meta_candidate.is_dir() {
                return Some((dir.to_path_buf(), meta_candidate));
            }

            let config_candidate = dir.join(CONFIG_FILE);
            if config_candidate.is_file()
                && dir.join("HEAD").is_file()
                && std::fs::read_to_string(&config_candidate)
                    .map(|content| content.contains("[core]"))
                    .unwrap_or(false)
            {
                return Some((dir.to_path_buf(), dir.to_path_buf()));
            }
        }
        None
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    pub fn is_bare(&self) -> bool {
        self.bare
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn assert_not_bare(&self) -> anyhow::Result<()> {
        if self.bare {
            anyhow::bail!("this operation must be run in a work tree");
        }
        Ok(())
    }

    /// Resolve a ref name or object hash to a commit hash
    pub fn resolve(&self, ref_or_hash: &str) -> anyhow::Result<Option<ObjectId>> {
        Revision::new(ref_or_hash).resolve(self)
    }

    /// The parents the next commit will record
    ///
    /// Mid-merge: HEAD and MERGE_HEAD. Otherwise HEAD when it resolves,
    /// else none (first commit).
    pub fn commit_parent_hashes(&self) -> anyhow::Result<Vec<ObjectId>> {
        let head = self.resolve(refs::HEAD)?;

        if let Some(merge_head) = self.resolve(refs::MERGE_HEAD)? {
            let head = head.context("mid-merge repository has no HEAD commit")?;
            return Ok(vec![head, merge_head]);
        }

        Ok(head.into_iter().collect())
    }

    /// Whether a branch is checked out in this repository's working copy
    pub fn is_checked_out(&self, branch: &str) -> anyhow::Result<bool> {
        Ok(!self.bare && self.refs.head_branch_name()?.as_deref() == Some(branch))
    }

    /// Normalize a user-supplied path to a repo-root-relative slash path
    ///
    /// Relative paths are taken from the invocation directory; absolute
    /// paths must fall inside the working copy.
    pub fn path_from_root(&self, path: &str) -> String {
        let normalized = path.replace('\\', "/");
        let normalized = normalized.trim_end_matches('/');

        let candidate = if let Some(absolute) = normalized
            .strip_prefix(&self.work_dir.to_string_lossy().replace('\\', "/").to_string())
        {
            absolute.trim_start_matches('/').to_string()
        } else if self.cwd_prefix.is_empty() {
            normalized.to_string()
        } else if normalized.is_empty() || normalized == "." {
            self.cwd_prefix.clone()
        } else {
            format!("{}/{}", self.cwd_prefix, normalized)
        };

        let mut parts = Vec::new();
        for part in candidate.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                part => parts.push(part),
            }
        }
        parts.join("/")
    }

    /// Read the repository config contents
    pub fn config_data(&self) -> anyhow::Result<ConfigData> {
        self.config.read()
    }
}
