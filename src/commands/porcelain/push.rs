//! push: publish a branch to a remote repository
//!
//! Refuses to update the branch the remote has checked out, and refuses
//! non-fast-forward updates unless forced. Objects are copied wholesale
//! before either side's refs move.

use crate::areas::refs::{to_local_ref, to_remote_ref};
use crate::areas::repository::Repository;
use crate::areas::transport::with_repository_at;
use crate::artifacts::merge;
use std::io::Write;

impl Repository {
    pub fn push(&mut self, remote: &str, branch: &str, force: bool) -> anyhow::Result<()> {
        let config = self.config_data()?;
        let url = match config.remote_url(remote) {
            Some(url) => url.to_string(),
            None => anyhow::bail!("{remote} does not appear to be a git repository"),
        };
        let remote_path = self.remote_disk_path(&url);

        let (checked_out, receiver) = with_repository_at(&remote_path, |peer| {
            Ok((peer.is_checked_out(branch)?, peer.resolve(branch)?))
        })?;
        if checked_out {
            anyhow::bail!("refusing to update checked out branch {branch}");
        }

        let giver = match self.resolve(branch)? {
            Some(hash) => hash,
            None => anyhow::bail!("{branch} does not match any known branch"),
        };

        if self.database().is_up_to_date(receiver.as_ref(), &giver)? {
            writeln!(self.writer(), "Already up-to-date")?;
            return Ok(());
        }

        if !force && !merge::can_fast_forward(self.database(), receiver.as_ref(), &giver)? {
            anyhow::bail!("failed to push some refs to {url}");
        }

        let objects = self.database().all_objects()?;
        let count = objects.len();
        with_repository_at(&remote_path, |peer| {
            for object in &objects {
                peer.database().store(object)?;
            }
            peer.update_ref(&to_local_ref(branch), giver.as_ref())
        })?;
        self.update_ref(&to_remote_ref(remote, branch), giver.as_ref())?;

        writeln!(
            self.writer(),
            "To {url}\nCount {count}\n{branch} -> {branch}"
        )?;
        Ok(())
    }
}
