//! Index (staging area)
//!
//! The index maps `(path, stage)` pairs to blob hashes and is persisted as
//! one line per entry:
//!
//! ```text
//! <path> <stage> <hash>
//! ```
//!
//! Stage 0 means "not in conflict". During a merge conflict a path is
//! recorded at stages 2 (receiver) and 3 (giver), and optionally 1 (base),
//! with no stage 0 entry. The file is rewritten in whole on every change.
//!
//! ## Invariants
//!
//! - a path is present either only at stage 0 or only at stages 1..3
//! - every referenced hash exists in the object store

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::hash_content;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Toc;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

/// Conflict disposition of an index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Not in conflict
    Clean,
    /// Common-ancestor version of a conflicted path
    Base,
    /// Current-branch version of a conflicted path
    Receiver,
    /// Merged-in version of a conflicted path
    Giver,
}

impl Stage {
    pub fn as_u8(&self) -> u8 {
        match self {
            Stage::Clean => 0,
            Stage::Base => 1,
            Stage::Receiver => 2,
            Stage::Giver => 3,
        }
    }

    pub fn try_parse(digit: &str) -> anyhow::Result<Self> {
        match digit {
            "0" => Ok(Stage::Clean),
            "1" => Ok(Stage::Base),
            "2" => Ok(Stage::Receiver),
            "3" => Ok(Stage::Giver),
            other => Err(anyhow::anyhow!("invalid index stage {other:?}")),
        }
    }

    pub const ALL: [Stage; 4] = [Stage::Clean, Stage::Base, Stage::Receiver, Stage::Giver];
}

/// Index entry key: path plus conflict stage
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexKey {
    pub path: String,
    pub stage: Stage,
}

impl IndexKey {
    pub fn new(path: impl Into<String>, stage: Stage) -> Self {
        IndexKey {
            path: path.into(),
            stage,
        }
    }
}

/// In-memory image of the index file
pub type Entries = BTreeMap<IndexKey, ObjectId>;

/// Index handle over the on-disk index file
///
/// The handle is stateless: every operation reads the file fresh and
/// mutations rewrite it in whole, so nested repository handles (during
/// remote calls) always observe current state.
#[derive(Debug)]
pub struct Index {
    path: Box<Path>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index { path }
    }

    /// Read all entries from disk; a missing file is an empty index
    pub fn read(&self) -> anyhow::Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = std::fs::read_to_string(&self.path).context("unable to read index")?;
        let mut entries = Entries::new();

        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            let mut tokens = line.split(' ');
            let (path, stage, hash) = match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(path), Some(stage), Some(hash)) => (path, stage, hash),
                _ => anyhow::bail!("malformed index line: {line:?}"),
            };
            entries.insert(
                IndexKey::new(path, Stage::try_parse(stage)?),
                ObjectId::try_parse(hash.to_string())?,
            );
        }

        Ok(entries)
    }

    /// Rewrite the index file from an entry map
    pub fn write(&self, entries: &Entries) -> anyhow::Result<()> {
        let mut content = String::new();
        for (key, hash) in entries {
            content.push_str(&format!("{} {} {}\n", key.path, key.stage.as_u8(), hash));
        }
        std::fs::write(&self.path, content).context("unable to write index")
    }

    pub fn has_file(&self, path: &str, stage: Stage) -> anyhow::Result<bool> {
        Ok(self.read()?.contains_key(&IndexKey::new(path, stage)))
    }

    pub fn is_file_in_conflict(&self, path: &str) -> anyhow::Result<bool> {
        self.has_file(path, Stage::Receiver)
    }

    /// Paths recorded at the conflict stages
    pub fn conflicted_paths(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .read()?
            .into_keys()
            .filter(|key| key.stage == Stage::Receiver)
            .map(|key| key.path)
            .collect())
    }

    /// Project the index to its stage 0 entries: path -> hash
    pub fn toc(&self) -> anyhow::Result<Toc> {
        Ok(self
            .read()?
            .into_iter()
            .filter(|(key, _)| key.stage == Stage::Clean)
            .map(|(key, hash)| (key.path, hash))
            .collect())
    }

    /// Hash the on-disk content of every indexed path that still exists
    pub fn working_copy_toc(&self, workspace: &Workspace) -> anyhow::Result<Toc> {
        let mut toc = Toc::new();
        for key in self.read()?.into_keys() {
            if workspace.exists(&key.path) && !workspace.is_dir(&key.path) {
                let content = workspace.read_file(&key.path)?;
                toc.insert(key.path, hash_content(&content)?);
            }
        }
        Ok(toc)
    }

    /// Indexed paths matching a repo-relative pathspec prefix
    pub fn matching_files(&self, pathspec: &str) -> anyhow::Result<Vec<String>> {
        let mut paths = self
            .read()?
            .into_keys()
            .map(|key| key.path)
            .filter(|path| path.starts_with(pathspec))
            .collect::<Vec<_>>();
        paths.dedup();
        Ok(paths)
    }

    /// Drop every stage of a path
    pub fn write_rm(&self, path: &str) -> anyhow::Result<()> {
        let mut entries = self.read()?;
        for stage in Stage::ALL {
            entries.remove(&IndexKey::new(path, stage));
        }
        self.write(&entries)
    }

    /// Record a path as resolved: drop every stage, store the content as a
    /// blob, and insert it at stage 0
    pub fn write_non_conflict(
        &self,
        path: &str,
        content: &str,
        database: &Database,
    ) -> anyhow::Result<()> {
        let mut entries = self.read()?;
        for stage in Stage::ALL {
            entries.remove(&IndexKey::new(path, stage));
        }
        entries.insert(IndexKey::new(path, Stage::Clean), database.store(content)?);
        self.write(&entries)
    }

    /// Record a conflicted path at stages 2 and 3 (and 1 when a base
    /// version exists); stage 0 is left absent
    pub fn write_conflict(
        &self,
        path: &str,
        receiver: ObjectId,
        giver: ObjectId,
        base: Option<ObjectId>,
    ) -> anyhow::Result<()> {
        let mut entries = self.read()?;
        for stage in Stage::ALL {
            entries.remove(&IndexKey::new(path, stage));
        }
        if let Some(base) = base {
            entries.insert(IndexKey::new(path, Stage::Base), base);
        }
        entries.insert(IndexKey::new(path, Stage::Receiver), receiver);
        entries.insert(IndexKey::new(path, Stage::Giver), giver);
        self.write(&entries)
    }

    /// Replace the whole index with the stage 0 image of a TOC
    pub fn replace_with_toc(&self, toc: &Toc) -> anyhow::Result<()> {
        let entries = toc
            .iter()
            .map(|(path, hash)| (IndexKey::new(path.clone(), Stage::Clean), hash.clone()))
            .collect::<Entries>();
        self.write(&entries)
    }
}
