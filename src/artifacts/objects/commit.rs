//! Commit object
//!
//! A commit records one tree, any number of parents, a timestamp, and a
//! message:
//!
//! ```text
//! commit <tree-hash>
//! parent <hash>        (0..n lines)
//! Date:  <timestamp>
//!
//!     <message>
//! ```
//!
//! The format permits any number of parents; the merge engine only ever
//! records zero, one, or two.

use crate::artifacts::objects::object::{Object, ObjectKind};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

/// Commit object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree: ObjectId,
    parents: Vec<ObjectId>,
    date: String,
    message: String,
}

impl Commit {
    /// Create a commit stamped with the current local time
    pub fn new(tree: ObjectId, parents: Vec<ObjectId>, message: String) -> Self {
        Commit {
            tree,
            parents,
            date: chrono::Local::now().to_rfc2822(),
            message,
        }
    }

    pub fn tree(&self) -> &ObjectId {
        &self.tree
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Parse a commit from its serialized content
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut lines = content.lines();

        let first = lines.next().context("empty commit object")?;
        let tree = first
            .strip_prefix("commit ")
            .context("commit object missing commit header")?;
        let tree = ObjectId::try_parse(tree.trim().to_string())?;

        let mut parents = Vec::new();
        let mut date = String::new();
        for line in lines.by_ref() {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.trim().to_string())?);
            } else if let Some(stamp) = line.strip_prefix("Date:") {
                date = stamp.trim().to_string();
            } else if line.is_empty() {
                break;
            }
        }

        let message = lines
            .map(|line| line.strip_prefix("    ").unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Commit {
            tree,
            parents,
            date,
            message,
        })
    }

    /// The tree hash of serialized commit content: second token of the
    /// first line
    pub fn tree_hash(content: &str) -> anyhow::Result<ObjectId> {
        let token = content
            .split_whitespace()
            .nth(1)
            .context("commit object missing tree hash")?;
        ObjectId::try_parse(token.to_string())
    }

    /// The parent hashes of serialized commit content: the hash token of
    /// every line beginning with `parent`
    pub fn parent_hashes(content: &str) -> anyhow::Result<Vec<ObjectId>> {
        content
            .lines()
            .filter_map(|line| line.strip_prefix("parent "))
            .map(|hash| ObjectId::try_parse(hash.trim().to_string()))
            .collect()
    }
}

impl Object for Commit {
    fn serialize(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("commit {}", self.tree));
        for parent in &self.parents {
            lines.push(format!("parent {}", parent));
        }
        lines.push(format!("Date:  {}", self.date));
        lines.push(String::new());
        for line in self.message.lines() {
            lines.push(format!("    {line}"));
        }

        lines.join("\n") + "\n"
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Commit
    }
}
