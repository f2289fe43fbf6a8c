//! Three-way table-of-contents diff
//!
//! Diffs compare flattened trees (TOCs): for every path appearing on any
//! side, the receiver, base, and giver hashes are classified into a status.
//! For two-way diffs the base is the receiver, which can never classify as
//! CONFLICT.
//!
//! A single entry point, [`diff`], expresses every repository comparison:
//! index vs. commit, working copy vs. commit, commit vs. commit.

use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Toc;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Classification of one path across receiver, base, and giver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Add,
    Modify,
    Delete,
    Same,
    Conflict,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileStatus::Add => "A",
            FileStatus::Modify => "M",
            FileStatus::Delete => "D",
            FileStatus::Same => "SAME",
            FileStatus::Conflict => "CONFLICT",
        };
        write!(f, "{label}")
    }
}

/// One diffed path: a status plus the three optional blob hashes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub status: FileStatus,
    pub receiver: Option<ObjectId>,
    pub base: Option<ObjectId>,
    pub giver: Option<ObjectId>,
}

/// A diff: path -> entry, ordered by path
pub type TocDiff = BTreeMap<String, DiffEntry>;

fn file_status(
    receiver: Option<&ObjectId>,
    giver: Option<&ObjectId>,
    base: Option<&ObjectId>,
) -> FileStatus {
    match (receiver, giver) {
        (Some(receiver), Some(giver)) if receiver != giver => {
            if Some(receiver) != base && Some(giver) != base {
                FileStatus::Conflict
            } else {
                FileStatus::Modify
            }
        }
        _ if receiver == giver => FileStatus::Same,
        _ => match (receiver.is_some(), base.is_some(), giver.is_some()) {
            (false, false, true) | (true, false, false) => FileStatus::Add,
            _ => FileStatus::Delete,
        },
    }
}

/// Diff three TOCs; an absent base defaults to the receiver
pub fn toc_diff(receiver: &Toc, giver: &Toc, base: Option<&Toc>) -> TocDiff {
    let base = base.unwrap_or(receiver);

    let paths = receiver
        .keys()
        .chain(base.keys())
        .chain(giver.keys())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .map(|path| {
            let (r, g, b) = (receiver.get(path), giver.get(path), base.get(path));
            let entry = DiffEntry {
                status: file_status(r, g, b),
                receiver: r.cloned(),
                base: b.cloned(),
                giver: g.cloned(),
            };
            (path.clone(), entry)
        })
        .collect()
}

/// Project a diff to path -> status, dropping SAME entries
pub fn name_status(diff: &TocDiff) -> BTreeMap<String, FileStatus> {
    diff.iter()
        .filter(|(_, entry)| entry.status != FileStatus::Same)
        .map(|(path, entry)| (path.clone(), entry.status))
        .collect()
}

/// Diff two repository states
///
/// The receiver is `hash1`'s commit TOC when given, else the index TOC.
/// The giver is `hash2`'s commit TOC when given, else the working-copy TOC.
pub fn diff(
    repository: &Repository,
    hash1: Option<&ObjectId>,
    hash2: Option<&ObjectId>,
) -> anyhow::Result<TocDiff> {
    let receiver = match hash1 {
        Some(hash) => repository.database().commit_toc(hash)?,
        None => repository.index().toc()?,
    };
    let giver = match hash2 {
        Some(hash) => repository.database().commit_toc(hash)?,
        None => repository
            .index()
            .working_copy_toc(repository.workspace())?,
    };

    Ok(toc_diff(&receiver, &giver, None))
}

/// Files a checkout or merge to `hash` would clobber: paths changed both
/// between HEAD and the working copy and between HEAD and `hash`
pub fn changed_files_commit_would_overwrite(
    repository: &Repository,
    hash: &ObjectId,
) -> anyhow::Result<Vec<String>> {
    let head = repository.resolve("HEAD")?;

    let local = name_status(&diff(repository, head.as_ref(), None)?);
    let incoming = name_status(&diff(repository, head.as_ref(), Some(hash))?);

    Ok(local
        .keys()
        .filter(|path| incoming.contains_key(*path))
        .cloned()
        .collect())
}

/// Working-copy changes relative to HEAD, excluding deletions
pub fn added_or_modified_files(repository: &Repository) -> anyhow::Result<Vec<String>> {
    let head_toc = match repository.resolve("HEAD")? {
        Some(head) => repository.database().commit_toc(&head)?,
        None => Toc::new(),
    };
    let working = repository
        .index()
        .working_copy_toc(repository.workspace())?;

    Ok(name_status(&toc_diff(&head_toc, &working, None))
        .into_iter()
        .filter(|(_, status)| *status != FileStatus::Delete)
        .map(|(path, _)| path)
        .collect())
}
