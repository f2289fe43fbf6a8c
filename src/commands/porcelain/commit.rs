//! commit: record the index as a snapshot
//!
//! Mid-merge, the pre-staged MERGE_MSG becomes the message and the commit
//! records both HEAD and MERGE_HEAD as parents, leaving the MERGING state.

use crate::areas::refs;
use crate::areas::repository::Repository;
use crate::artifacts::merge::MergeState;
use crate::artifacts::objects::commit::Commit;
use std::io::Write;

impl Repository {
    pub fn commit(&mut self, message: Option<&str>) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        let tree_hash = self.write_tree_object()?;
        let head_description = match self.refs().head_branch_name()? {
            Some(branch) => branch,
            None => "detached HEAD".to_string(),
        };

        if let Some(head) = self.resolve(refs::HEAD)? {
            let head_content = self.database().load_required(&head)?;
            if tree_hash == Commit::tree_hash(&head_content)? {
                anyhow::bail!(
                    "# On {head_description}\nnothing to commit, working directory clean"
                );
            }
        }

        let state = MergeState::read(self)?;
        if state.is_merging() {
            let conflicted = self.index().conflicted_paths()?;
            if !conflicted.is_empty() {
                let listing = conflicted
                    .iter()
                    .map(|path| format!("U {path}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                anyhow::bail!("{listing}\ncannot commit because you have unmerged files");
            }
        }

        let message = match &state {
            MergeState::Merging { message, .. } => message.clone(),
            MergeState::Clean => match message {
                Some(message) => message.to_string(),
                None => anyhow::bail!("no commit message given (use -m)"),
            },
        };

        let commit = Commit::new(tree_hash, self.commit_parent_hashes()?, message.clone());
        let hash = self.database().store_object(&commit)?;
        self.update_ref(refs::HEAD, hash.as_ref())?;

        if state.is_merging() {
            std::fs::remove_file(self.meta_dir().join(refs::MERGE_MSG)).ok();
            self.refs().rm(refs::MERGE_HEAD)?;
            writeln!(self.writer(), "Merge made by the three-way strategy.")?;
        } else {
            writeln!(
                self.writer(),
                "[{head_description} {hash}] {}",
                message.lines().next().unwrap_or("")
            )?;
        }

        Ok(())
    }
}
