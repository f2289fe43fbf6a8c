//! merge: reconcile the current branch with another commit
//!
//! Fast-forwards when possible; otherwise enters the MERGING state and,
//! when the three-way diff is conflict-free, finalizes the merge commit
//! immediately.

use crate::areas::refs;
use crate::areas::repository::Repository;
use crate::artifacts::diff;
use crate::artifacts::merge;
use crate::artifacts::objects::object::ObjectKind;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub fn merge(&mut self, target: &str) -> anyhow::Result<()> {
        let receiver = self.resolve(refs::HEAD)?;

        if self.refs().is_head_detached()? {
            anyhow::bail!("unsupported");
        }

        let giver = match self.resolve(target)? {
            Some(hash) if self.database().kind_of(&hash)? == ObjectKind::Commit => hash,
            _ => anyhow::bail!("{target}: expected commit type"),
        };

        if self.database().is_up_to_date(receiver.as_ref(), &giver)? {
            writeln!(self.writer(), "Already up-to-date")?;
            return Ok(());
        }

        let clobbered = diff::changed_files_commit_would_overwrite(self, &giver)?;
        if !clobbered.is_empty() {
            anyhow::bail!("local changes would be lost\n{}\n", clobbered.join("\n"));
        }

        if merge::can_fast_forward(self.database(), receiver.as_ref(), &giver)? {
            merge::write_fast_forward_merge(self, receiver.as_ref(), &giver)?;
            writeln!(self.writer(), "Fast-forward")?;
            return Ok(());
        }

        let receiver = receiver.context("non-fast-forward merge requires an existing HEAD commit")?;
        merge::write_non_fast_forward_merge(self, &receiver, &giver, target)?;

        if merge::has_conflicts(self.database(), &receiver, &giver)? {
            writeln!(
                self.writer(),
                "Automatic merge failed. Fix conflicts and commit the result."
            )?;
            return Ok(());
        }

        self.commit(None)
    }
}
