//! Reference namespace
//!
//! References are small files under the repository metadata directory that
//! name commits:
//!
//! - `HEAD`: `ref: refs/heads/<name>` when attached to a branch, or a bare
//!   commit hash when detached
//! - `refs/heads/<name>`: a local branch head
//! - `refs/remotes/<remote>/<name>`: the last-known head of a remote branch
//! - `MERGE_HEAD`: the giver of an in-progress merge; its presence is the
//!   merge state
//! - `MERGE_MSG`: the pre-staged message for the merge about to be finalized
//! - `FETCH_HEAD`: one line per fetch, `<hash> branch <branch> of <url>`
//!
//! A qualified ref matches the branch or remote-tracking patterns or is one
//! of the three special names. An unqualified name is always read as a
//! local branch.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const HEAD: &str = "HEAD";
pub const MERGE_HEAD: &str = "MERGE_HEAD";
pub const FETCH_HEAD: &str = "FETCH_HEAD";
pub const MERGE_MSG: &str = "MERGE_MSG";

const LOCAL_REF_PATTERN: &str = "^refs/heads/[A-Za-z-]+$";
const REMOTE_REF_PATTERN: &str = "^refs/remotes/[A-Za-z-]+/[A-Za-z-]+$";
const SYMREF_PATTERN: &str = "ref: (refs/heads/.+)";

fn local_ref_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(LOCAL_REF_PATTERN).expect("valid regex"))
}

fn remote_ref_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(REMOTE_REF_PATTERN).expect("valid regex"))
}

fn symref_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(SYMREF_PATTERN).expect("valid regex"))
}

/// Qualified name of a local branch ref
pub fn to_local_ref(name: &str) -> String {
    format!("refs/heads/{name}")
}

/// Qualified name of a remote-tracking ref
pub fn to_remote_ref(remote: &str, name: &str) -> String {
    format!("refs/remotes/{remote}/{name}")
}

/// References manager rooted at the repository metadata directory
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Whether `name` is a qualified ref
    pub fn is_ref(name: &str) -> bool {
        local_ref_regex().is_match(name)
            || remote_ref_regex().is_match(name)
            || [HEAD, FETCH_HEAD, MERGE_HEAD].contains(&name)
    }

    /// Resolve a name to the ref it ultimately denotes
    ///
    /// `HEAD` follows one symbolic indirection to its branch ref; a
    /// detached `HEAD` resolves to the literal `HEAD`. Other qualified
    /// refs pass through; a bare name becomes `refs/heads/<name>`.
    pub fn terminal_ref(&self, name: &str) -> anyhow::Result<String> {
        if name == HEAD && !self.is_head_detached()? {
            let head = self.read_raw(HEAD)?.context("HEAD file missing")?;
            let captures = symref_regex()
                .captures(&head)
                .context("HEAD is attached but names no branch")?;
            return Ok(captures[1].trim().to_string());
        }

        if Self::is_ref(name) {
            return Ok(name.to_string());
        }

        Ok(to_local_ref(name))
    }

    /// Whether a qualified ref has a file on disk
    pub fn exists(&self, name: &str) -> bool {
        Self::is_ref(name) && self.ref_path(name).exists()
    }

    /// Read the hash stored in a ref file, if present
    pub fn read_hash(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        match self.read_raw(name)? {
            None => Ok(None),
            Some(content) => Ok(Some(ObjectId::try_parse(content.trim().to_string())?)),
        }
    }

    /// Overwrite a qualified ref with new content
    pub fn write(&self, name: &str, content: &str) -> anyhow::Result<()> {
        if !Self::is_ref(name) {
            anyhow::bail!("cannot write ref {name}");
        }

        let path = self.ref_path(name);
        std::fs::create_dir_all(path.parent().context("ref path has no parent")?)
            .with_context(|| format!("unable to create ref directory for {name}"))?;
        std::fs::write(&path, format!("{}\n", content.trim_end()))
            .with_context(|| format!("unable to write ref {name}"))
    }

    /// Remove a qualified ref's file
    pub fn rm(&self, name: &str) -> anyhow::Result<()> {
        if !Self::is_ref(name) {
            anyhow::bail!("cannot remove ref {name}");
        }

        let path = self.ref_path(name);
        if path.exists() {
            std::fs::remove_file(&path).with_context(|| format!("unable to remove ref {name}"))?;
        }
        Ok(())
    }

    /// The branch name `HEAD` is attached to, if any
    pub fn head_branch_name(&self) -> anyhow::Result<Option<String>> {
        if self.is_head_detached()? {
            return Ok(None);
        }

        let head = self.read_raw(HEAD)?.context("HEAD file missing")?;
        Ok(symref_regex()
            .captures(&head)
            .map(|captures| captures[1].trim_start_matches("refs/heads/").trim().to_string()))
    }

    /// Whether `HEAD` holds a bare hash instead of a branch ref
    pub fn is_head_detached(&self) -> anyhow::Result<bool> {
        let head = self.read_raw(HEAD)?.context("HEAD file missing")?;
        Ok(!head.contains("refs"))
    }

    /// Local branch heads, sorted by branch name
    pub fn local_heads(&self) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let heads_dir = self.path.join("refs").join("heads");
        let mut heads = BTreeMap::new();

        if !heads_dir.exists() {
            return Ok(heads);
        }

        for entry in std::fs::read_dir(&heads_dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(hash) = self.read_hash(&to_local_ref(&name))? {
                heads.insert(name, hash);
            }
        }

        Ok(heads)
    }

    /// Append a fetch record to `FETCH_HEAD`
    pub fn record_fetch(&self, hash: &ObjectId, branch: &str, url: &str) -> anyhow::Result<()> {
        let path = self.ref_path(FETCH_HEAD);
        let mut content = match path.exists() {
            true => std::fs::read_to_string(&path).context("unable to read FETCH_HEAD")?,
            false => String::new(),
        };
        content.push_str(&format!("{hash} branch {branch} of {url}\n"));
        std::fs::write(&path, content).context("unable to write FETCH_HEAD")
    }

    /// The most recently fetched hash recorded for `branch` in `FETCH_HEAD`
    pub fn fetch_head_branch_to_merge(&self, branch: &str) -> anyhow::Result<Option<ObjectId>> {
        let content = match self.read_raw(FETCH_HEAD)? {
            None => return Ok(None),
            Some(content) => content,
        };

        let marker = format!(" branch {branch} of ");
        content
            .lines()
            .filter(|line| line.contains(&marker))
            .last()
            .and_then(|line| line.split(' ').next())
            .map(|hash| ObjectId::try_parse(hash.to_string()))
            .transpose()
    }

    fn read_raw(&self, name: &str) -> anyhow::Result<Option<String>> {
        let path = self.ref_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path).with_context(|| {
            format!("unable to read ref {name}")
        })?))
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.path.to_path_buf(), |path, part| path.join(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("HEAD", true)]
    #[case("FETCH_HEAD", true)]
    #[case("MERGE_HEAD", true)]
    #[case("refs/heads/master", true)]
    #[case("refs/heads/a-long-name", true)]
    #[case("refs/remotes/origin/master", true)]
    #[case("MERGE_MSG", false)]
    #[case("master", false)]
    #[case("refs/heads/", false)]
    #[case("refs/heads/with/slash", false)]
    #[case("refs/remotes/origin", false)]
    fn qualified_ref_grammar(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(Refs::is_ref(name), expected);
    }

    fn temp_refs() -> (assert_fs::TempDir, Refs) {
        let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        (dir, refs)
    }

    #[test]
    fn terminal_ref_follows_attached_head() {
        let (_dir, refs) = temp_refs();
        refs.write(HEAD, "ref: refs/heads/master").unwrap();

        assert_eq!(refs.terminal_ref(HEAD).unwrap(), "refs/heads/master");
        assert_eq!(refs.head_branch_name().unwrap().as_deref(), Some("master"));
        assert!(!refs.is_head_detached().unwrap());
    }

    #[test]
    fn terminal_ref_keeps_detached_head_literal() {
        let (_dir, refs) = temp_refs();
        let hash = "a".repeat(40);
        refs.write(HEAD, &hash).unwrap();

        assert_eq!(refs.terminal_ref(HEAD).unwrap(), HEAD);
        assert!(refs.is_head_detached().unwrap());
        assert_eq!(refs.head_branch_name().unwrap(), None);
    }

    #[test]
    fn bare_names_resolve_to_local_branches() {
        let (_dir, refs) = temp_refs();
        refs.write(HEAD, "ref: refs/heads/master").unwrap();
        assert_eq!(refs.terminal_ref("feat").unwrap(), "refs/heads/feat");
    }

    #[test]
    fn fetch_records_accumulate_and_latest_wins() {
        let (_dir, refs) = temp_refs();
        let old = ObjectId::try_parse("a".repeat(40)).unwrap();
        let new = ObjectId::try_parse("b".repeat(40)).unwrap();

        refs.record_fetch(&old, "master", "../src").unwrap();
        refs.record_fetch(&new, "master", "../src").unwrap();
        refs.record_fetch(&old, "feat", "../src").unwrap();

        assert_eq!(
            refs.fetch_head_branch_to_merge("master").unwrap(),
            Some(new)
        );
        assert_eq!(refs.fetch_head_branch_to_merge("feat").unwrap(), Some(old));
        assert_eq!(refs.fetch_head_branch_to_merge("other").unwrap(), None);
    }
}
