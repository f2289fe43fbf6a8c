//! checkout: move HEAD to another commit and reconcile the working copy
//!
//! Refuses to proceed when a working-copy change would be clobbered by the
//! incoming tree. Checking out a bare hash detaches HEAD.

use crate::areas::refs::{self, to_local_ref};
use crate::areas::repository::Repository;
use crate::artifacts::diff;
use crate::artifacts::objects::object::ObjectKind;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        let to_hash = match self.resolve(target)? {
            Some(hash) => hash,
            None => anyhow::bail!("{target} did not match any file(s) known to Gitlet"),
        };
        if self.database().kind_of(&to_hash)? != ObjectKind::Commit {
            anyhow::bail!("reference is not a tree: {target}");
        }

        if self.is_current_checkout(target)? {
            writeln!(self.writer(), "Already on {target}")?;
            return Ok(());
        }

        let clobbered = diff::changed_files_commit_would_overwrite(self, &to_hash)?;
        if !clobbered.is_empty() {
            anyhow::bail!("local changes would be lost\n{}\n", clobbered.join("\n"));
        }

        // checking out a name that is itself a stored object detaches HEAD
        let detaching = ObjectId::try_parse(target.to_string())
            .map(|oid| self.database().exists(&oid))
            .unwrap_or(false);

        let head = self.resolve(refs::HEAD)?;
        self.workspace()
            .apply_diff(&diff::diff(self, head.as_ref(), Some(&to_hash))?, self.database())?;
        self.index()
            .replace_with_toc(&self.database().commit_toc(&to_hash)?)?;

        if detaching {
            self.refs().write(refs::HEAD, to_hash.as_ref())?;
            writeln!(
                self.writer(),
                "Note: checking out {to_hash}\nYou are in detached HEAD state."
            )?;
        } else {
            self.refs()
                .write(refs::HEAD, &format!("ref: {}", to_local_ref(target)))?;
            writeln!(self.writer(), "Switched to branch {target}")?;
        }

        Ok(())
    }

    fn is_current_checkout(&self, target: &str) -> anyhow::Result<bool> {
        if self.refs().head_branch_name()?.as_deref() == Some(target) {
            return Ok(true);
        }

        // a detached HEAD holds the bare hash itself
        let head_path = self.meta_dir().join(refs::HEAD);
        let head_content = std::fs::read_to_string(head_path)?;
        Ok(head_content.trim() == target)
    }
}
