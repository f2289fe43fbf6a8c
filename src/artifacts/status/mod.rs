//! Working tree status
//!
//! A status report is assembled from four independent views and rendered
//! section by section, skipping empty ones:
//!
//! - untracked: working-copy root entries with nothing staged under them
//! - unmerged: paths at the conflict stages of the index
//! - to be committed: HEAD's TOC against the index
//! - not staged: the index against the working copy

use crate::areas::repository::{Repository, GITLET_DIR};
use crate::artifacts::diff;
use std::collections::BTreeSet;

/// Assembled status report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    branch_label: String,
    untracked: Vec<String>,
    unmerged: Vec<String>,
    to_be_committed: Vec<String>,
    not_staged: Vec<String>,
}

impl StatusReport {
    pub fn gather(repository: &Repository) -> anyhow::Result<Self> {
        let branch_label = repository
            .refs()
            .head_branch_name()?
            .unwrap_or_else(|| "detached HEAD".to_string());

        Ok(StatusReport {
            branch_label,
            untracked: untracked(repository)?,
            unmerged: repository.index().conflicted_paths()?,
            to_be_committed: to_be_committed(repository)?,
            not_staged: not_staged(repository)?,
        })
    }
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = vec![format!("On branch {}", self.branch_label)];

        let sections = [
            ("Untracked files:", &self.untracked),
            ("Unmerged paths:", &self.unmerged),
            ("Changes to be committed:", &self.to_be_committed),
            ("Changes not staged for commit:", &self.not_staged),
        ];
        for (heading, entries) in sections {
            if !entries.is_empty() {
                lines.push(String::new());
                lines.push(heading.to_string());
                lines.extend(entries.iter().cloned());
            }
        }

        write!(f, "{}", lines.join("\n"))
    }
}

/// Working-copy root entries with no staged path at or beneath them
fn untracked(repository: &Repository) -> anyhow::Result<Vec<String>> {
    let toc = repository.index().toc()?;
    let mut entries = BTreeSet::new();

    for entry in std::fs::read_dir(repository.work_dir())? {
        let name = entry?.file_name().to_string_lossy().to_string();
        if name == GITLET_DIR {
            continue;
        }

        let prefix = format!("{name}/");
        let tracked = toc
            .keys()
            .any(|path| *path == name || path.starts_with(&prefix));
        if !tracked {
            entries.insert(name);
        }
    }

    Ok(entries.into_iter().collect())
}

fn to_be_committed(repository: &Repository) -> anyhow::Result<Vec<String>> {
    let head_toc = match repository.resolve("HEAD")? {
        Some(head) => repository.database().commit_toc(&head)?,
        None => Default::default(),
    };
    let ns = diff::name_status(&diff::toc_diff(&head_toc, &repository.index().toc()?, None));
    Ok(ns.into_iter().map(|(path, status)| format!("{status} {path}")).collect())
}

fn not_staged(repository: &Repository) -> anyhow::Result<Vec<String>> {
    let ns = diff::name_status(&diff::diff(repository, None, None)?);
    Ok(ns.into_iter().map(|(path, status)| format!("{status} {path}")).collect())
}
