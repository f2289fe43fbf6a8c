//! Three-way merge engine
//!
//! A merge reconciles the current branch (receiver) with another commit
//! (giver) relative to their common ancestor (base):
//!
//! - when the receiver is an ancestor of the giver, the branch pointer
//!   fast-forwards and no merge commit is made;
//! - otherwise `MERGE_HEAD` and `MERGE_MSG` are written, the index is
//!   rebuilt from the three-way diff, and the working copy receives the
//!   result, conflict markers included. The repository stays in the
//!   MERGING state until a commit records both parents.
//!
//! ## Ancestor selection
//!
//! The common ancestor is chosen by intersecting ancestry lists with the
//! two inputs sorted first. The choice is deterministic, but in
//! criss-cross histories it depends on that sort order and may differ from
//! a recursive merge-base computation.

use crate::areas::database::Database;
use crate::areas::index::Entries;
use crate::areas::refs::{self, to_local_ref};
use crate::areas::repository::Repository;
use crate::artifacts::diff::{toc_diff, FileStatus, TocDiff};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Toc;
use anyhow::Context;

/// Transactional state of the repository around merge
///
/// Derived from the marker files on every read; the presence of
/// `MERGE_HEAD` is the merge state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeState {
    Clean,
    Merging { giver: ObjectId, message: String },
}

impl MergeState {
    pub fn read(repository: &Repository) -> anyhow::Result<MergeState> {
        match repository.resolve(refs::MERGE_HEAD)? {
            None => Ok(MergeState::Clean),
            Some(giver) => {
                let message_path = repository.meta_dir().join(refs::MERGE_MSG);
                let message = match message_path.exists() {
                    true => std::fs::read_to_string(&message_path)
                        .context("unable to read MERGE_MSG")?,
                    false => String::new(),
                };
                Ok(MergeState::Merging { giver, message })
            }
        }
    }

    pub fn is_merging(&self) -> bool {
        matches!(self, MergeState::Merging { .. })
    }
}

/// The most recent common ancestor of two commits
///
/// The inputs are sorted for determinism, then the first commit's
/// ancestry list (itself first) is scanned for the first hash also
/// reachable from the second.
pub fn common_ancestor(
    database: &Database,
    a: &ObjectId,
    b: &ObjectId,
) -> anyhow::Result<ObjectId> {
    let mut sorted = [a.clone(), b.clone()];
    sorted.sort();
    let [first, second] = sorted;

    let mut first_side = vec![first.clone()];
    first_side.extend(database.ancestors(&first)?);

    let mut second_side = vec![second.clone()];
    second_side.extend(database.ancestors(&second)?);

    first_side
        .into_iter()
        .find(|hash| second_side.contains(hash))
        .with_context(|| format!("no common ancestor of {first} and {second}"))
}

/// Whether merging `giver` into `receiver` needs no merge commit
pub fn can_fast_forward(
    database: &Database,
    receiver: Option<&ObjectId>,
    giver: &ObjectId,
) -> anyhow::Result<bool> {
    match receiver {
        None => Ok(true),
        Some(receiver) => database.is_ancestor(giver, receiver),
    }
}

/// Whether a fetched hash does not descend from the previously recorded one
pub fn is_force_fetch(
    database: &Database,
    receiver: Option<&ObjectId>,
    giver: &ObjectId,
) -> anyhow::Result<bool> {
    match receiver {
        None => Ok(false),
        Some(receiver) => Ok(!database.is_ancestor(giver, receiver)?),
    }
}

/// The three-way diff between receiver and giver over their common ancestor
pub fn merge_diff(
    database: &Database,
    receiver: &ObjectId,
    giver: &ObjectId,
) -> anyhow::Result<TocDiff> {
    let base = common_ancestor(database, receiver, giver)?;
    Ok(toc_diff(
        &database.commit_toc(receiver)?,
        &database.commit_toc(giver)?,
        Some(&database.commit_toc(&base)?),
    ))
}

fn conflicted_paths(diff: &TocDiff) -> Vec<String> {
    diff.iter()
        .filter(|(_, entry)| entry.status == FileStatus::Conflict)
        .map(|(path, _)| path.clone())
        .collect()
}

/// Whether merging `giver` into `receiver` would conflict
pub fn has_conflicts(
    database: &Database,
    receiver: &ObjectId,
    giver: &ObjectId,
) -> anyhow::Result<bool> {
    Ok(!conflicted_paths(&merge_diff(database, receiver, giver)?).is_empty())
}

/// Fast-forward the current branch to `giver`
///
/// Points the branch ref at the giver, replaces the index with the
/// giver's TOC, and reconciles the working copy unless the repository is
/// bare. Never enters the MERGING state.
pub fn write_fast_forward_merge(
    repository: &Repository,
    receiver: Option<&ObjectId>,
    giver: &ObjectId,
) -> anyhow::Result<()> {
    let branch = repository
        .refs()
        .head_branch_name()?
        .context("cannot fast-forward a detached HEAD")?;
    repository.refs().write(&to_local_ref(&branch), giver.as_ref())?;

    let giver_toc = repository.database().commit_toc(giver)?;
    repository.index().replace_with_toc(&giver_toc)?;

    if !repository.is_bare() {
        let receiver_toc = match receiver {
            Some(receiver) => repository.database().commit_toc(receiver)?,
            None => Toc::new(),
        };
        repository
            .workspace()
            .apply_diff(&toc_diff(&receiver_toc, &giver_toc, None), repository.database())?;
    }

    Ok(())
}

/// Begin a non-fast-forward merge of `giver` into `receiver`
///
/// Enters the MERGING state: records `MERGE_HEAD` and `MERGE_MSG`,
/// rebuilds the index from the merge diff, and writes the merge result,
/// conflict markers included, to the working copy unless bare.
pub fn write_non_fast_forward_merge(
    repository: &Repository,
    receiver: &ObjectId,
    giver: &ObjectId,
    giver_ref: &str,
) -> anyhow::Result<()> {
    repository.refs().write(refs::MERGE_HEAD, giver.as_ref())?;

    let diff = merge_diff(repository.database(), receiver, giver)?;
    write_merge_msg(repository, &diff, giver_ref)?;
    write_merge_index(repository, &diff)?;

    if !repository.is_bare() {
        repository.workspace().apply_diff(&diff, repository.database())?;
    }

    Ok(())
}

fn write_merge_msg(repository: &Repository, diff: &TocDiff, giver_ref: &str) -> anyhow::Result<()> {
    let branch = repository
        .refs()
        .head_branch_name()?
        .context("cannot merge into a detached HEAD")?;

    let mut message = format!("Merge {giver_ref} into {branch}");
    let conflicts = conflicted_paths(diff);
    if !conflicts.is_empty() {
        message.push_str(&format!("\nConflicts:\n{}", conflicts.join("\n")));
    }

    std::fs::write(repository.meta_dir().join(refs::MERGE_MSG), message)
        .context("unable to write MERGE_MSG")
}

fn write_merge_index(repository: &Repository, diff: &TocDiff) -> anyhow::Result<()> {
    let index = repository.index();
    index.write(&Entries::new())?;

    for (path, entry) in diff {
        match entry.status {
            FileStatus::Conflict => {
                let receiver = entry
                    .receiver
                    .clone()
                    .context("conflicted entry carries no receiver")?;
                let giver = entry.giver.clone().context("conflicted entry carries no giver")?;
                index.write_conflict(path, receiver, giver, entry.base.clone())?;
            }
            FileStatus::Modify => {
                let giver = entry.giver.clone().context("modified entry carries no giver")?;
                let content = repository.database().load_required(&giver)?;
                index.write_non_conflict(path, &content, repository.database())?;
            }
            FileStatus::Add | FileStatus::Same => {
                let hash = entry
                    .receiver
                    .clone()
                    .or(entry.giver.clone())
                    .context("entry carries no blob")?;
                let content = repository.database().load_required(&hash)?;
                index.write_non_conflict(path, &content, repository.database())?;
            }
            FileStatus::Delete => {}
        }
    }

    Ok(())
}
